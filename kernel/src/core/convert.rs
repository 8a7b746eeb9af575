/*!

Equality: syntactic α-equality (`eq`) and βR-convertibility (`eq_modulo`),
spec.md §4.5/§4.6.

`eq` never touches the machine; it is a pure structural walk under `unfold`.
`eq_modulo` is the conversion procedure the type-checker (external) and the
matcher's non-linear case both call — `Term`'s `PartialEq` impl below is
`eq`, not `eq_modulo`: tests and internal code that write `a == b` are always
asking for syntactic equality, never convertibility.

*/

use std::collections::VecDeque;
use std::rc::Rc;

use crate::core::machine::{whnf_stk, Stack};
use crate::core::config::Config;
use crate::core::term::{apply, unfold, Term};
use crate::core::var::Var;

/// Syntactic α-equality (spec.md §4.6). Pattern/environment placeholders are
/// a programmer error here: this function is only ever called on terms that
/// have left rule LHS/RHS context (invariant 1).
pub fn eq(a: &Term, b: &Term) -> bool {
    let a = unfold(a);
    let b = unfold(b);
    match (&a, &b) {
        (Term::Type, Term::Type) => true,
        (Term::Kind, Term::Kind) => true,
        (Term::Vari(x), Term::Vari(y)) => x == y,
        (Term::Symb(s1), Term::Symb(s2)) => Rc::ptr_eq(s1, s2),
        (Term::Prod(a1, b1), Term::Prod(a2, b2)) => eq(a1, a2) && b1.eq_under(b2, eq),
        (Term::Abst(a1, b1), Term::Abst(a2, b2)) => eq(a1, a2) && b1.eq_under(b2, eq),
        (Term::Appl(f1, u1), Term::Appl(f2, u2)) => eq(f1, f2) && eq(u1, u2),
        (Term::Meta(m1, e1), Term::Meta(m2, e2)) => {
            Rc::ptr_eq(m1, m2) && e1.len() == e2.len() && e1.iter().zip(e2).all(|(x, y)| eq(x, y))
        }
        (Term::Patt(..), _) | (_, Term::Patt(..)) => {
            unreachable!("pattern placeholder outside rule left-hand-side context")
        }
        (Term::TEnv(..), _) | (_, Term::TEnv(..)) => {
            unreachable!("environment placeholder outside rule right-hand-side context")
        }
        _ => false,
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        eq(self, other)
    }
}

/// βR-convertibility (spec.md §4.5): a worklist of term pairs, each
/// discharged by syntactic equality, machine reduction, spine
/// synchronization, and (for the remaining heads) structural decomposition.
pub fn eq_modulo(a: &Term, b: &Term) -> bool {
    let mut worklist: VecDeque<(Term, Term)> = VecDeque::new();
    worklist.push_back((a.clone(), b.clone()));

    while let Some((x, y)) = worklist.pop_front() {
        if eq(&x, &y) {
            continue;
        }

        let (ah0, mut sa) = whnf_stk(&x, Stack::new(), Config::default());
        let (bh0, mut sb) = whnf_stk(&y, Stack::new(), Config::default());

        // Synchronize spines outermost argument (stack back) first: if the
        // spines have unequal length, whatever is left over after one side
        // empties must be a contiguous innermost prefix of the original
        // stack, since that's the only slice `apply` can validly re-wrap
        // onto the bare whnf head below.
        while !sa.is_empty() && !sb.is_empty() {
            let ca = sa.pop_back().unwrap();
            let cb = sb.pop_back().unwrap();
            worklist.push_front((ca.borrow().clone(), cb.borrow().clone()));
        }

        let ah = apply(ah0, sa.iter().map(|c| c.borrow().clone()));
        let bh = apply(bh0, sb.iter().map(|c| c.borrow().clone()));

        if eq(&ah, &bh) {
            continue;
        }

        match (unfold(&ah), unfold(&bh)) {
            (Term::Abst(a1, b1), Term::Abst(a2, b2)) | (Term::Prod(a1, b1), Term::Prod(a2, b2)) => {
                worklist.push_front((*a1, *a2));
                let x = Var::fresh(b1.name_hint());
                let body1 = b1.subst(Term::Vari(x.clone()));
                let body2 = b2.subst(Term::Vari(x));
                worklist.push_front((body1, body2));
            }
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::binder::Binder;

    #[test]
    fn eq_is_reflexive_on_simple_terms() {
        let t = Term::appl(Term::Type, Term::Kind);
        assert!(eq(&t, &t));
    }

    #[test]
    fn eq_modulo_beta_reduces() {
        let x = Var::fresh(kernel_abs::intern("x"));
        let body = Term::Vari(x.clone());
        let b = Binder::bind_var(&x, &body, kernel_abs::intern("x"));
        let redex = Term::appl(Term::abst(Term::Type, b), Term::Kind);
        assert!(eq_modulo(&redex, &Term::Kind));
        assert!(!eq(&redex, &Term::Kind));
    }
}
