/*!

The term model (spec.md §3, §4.2): the nine-variant `Term` enum and the
`unfold`/`head_and_args`/`apply` helpers every other module matches through.

*/

use std::collections::HashSet;
use std::fmt;

use kernel_abs::IString;

use crate::core::binder::Binder;
use crate::core::meta::MetaPtr;
use crate::core::symbol::SymbolPtr;
use crate::core::var::{Var, VarId};

/// Either a still-unfilled rule right-hand-side slot index, or an already
/// filled multi-binder (spec.md §3 "Environment placeholder"). Filled values
/// are not produced by this engine's own rule firing (see `DESIGN.md`), but
/// `unfold` still resolves them defensively, matching the data model as
/// specified.
#[derive(Clone)]
pub enum EnvSlot {
    Unfilled(usize),
    Filled(crate::core::binder::MBinder),
}

/// The nine term variants from spec.md §3.
#[derive(Clone)]
pub enum Term {
    /// A reference to a binder-bound name, identified by kernel-managed identity.
    Vari(Var),
    /// The universe of types.
    Type,
    /// The universe of kinds (the type of `Type`).
    Kind,
    /// A shared handle to a named constant or definable symbol.
    Symb(SymbolPtr),
    /// A dependent product `(A, B)`: `A` is the domain, `B` a binder over the codomain.
    Prod(Box<Term>, Binder),
    /// A λ-abstraction `(A, t)`: domain annotation plus a binder over the body.
    Abst(Box<Term>, Binder),
    /// Unary application; n-ary applications are left-nested.
    Appl(Box<Term>, Box<Term>),
    /// A metavariable occurrence: a handle plus an environment of values for
    /// the meta's free variables.
    Meta(MetaPtr, Vec<Term>),
    /// A pattern placeholder. Appears only in rule left-hand sides.
    Patt(Option<usize>, IString, Vec<Var>),
    /// An environment placeholder. Appears only in rule right-hand sides.
    TEnv(EnvSlot, Vec<Term>),
}

impl Term {
    #[inline(always)]
    pub fn appl(f: Term, a: Term) -> Term {
        Term::Appl(Box::new(f), Box::new(a))
    }

    #[inline(always)]
    pub fn prod(domain: Term, codomain: Binder) -> Term {
        Term::Prod(Box::new(domain), codomain)
    }

    #[inline(always)]
    pub fn abst(domain: Term, body: Binder) -> Term {
        Term::Abst(Box::new(domain), body)
    }
}

/// `unfold(t)`: resolves a filled metavariable or environment placeholder to
/// its value and recurses; all other variants are returned unchanged. Every
/// piece of reduction/matching/conversion code matches on `unfold(t)`, never
/// on a raw `Term`.
pub fn unfold(t: &Term) -> Term {
    match t {
        Term::Meta(m, env) => match m.value() {
            Some(mb) => unfold(&mb.apply(env)),
            None => t.clone(),
        },
        Term::TEnv(EnvSlot::Filled(mb), env) => unfold(&mb.apply(env)),
        _ => t.clone(),
    }
}

/// Strips a left-nested application into `(head, args)`, with `args` in
/// left-to-right application order.
pub fn head_and_args(t: &Term) -> (Term, Vec<Term>) {
    let mut args = Vec::new();
    let mut head = t.clone();
    loop {
        match unfold(&head) {
            Term::Appl(f, a) => {
                args.push(*a);
                head = *f;
            }
            other => {
                head = other;
                break;
            }
        }
    }
    args.reverse();
    (head, args)
}

/// The inverse of `head_and_args`: rebuilds a left-nested application.
pub fn apply(head: Term, args: impl IntoIterator<Item = Term>) -> Term {
    args.into_iter().fold(head, Term::appl)
}

/// Returns the free kernel variable identities occurring in `t`, opening
/// binders (with a throwaway fresh variable) rather than descending into
/// their unopened closures. A variable introduced by one of those openings is
/// bound within the subterm it was opened for, not free — `bound` tracks the
/// ids opened by enclosing binders on the path to the current node, so a
/// nested binder's own opened variable is never mistaken for a free one of
/// the outer term. Does not descend into other metavariables' stored values —
/// only the direct environment arrays of `Meta`/`TEnv` nodes are walked,
/// matching `occurs`'s contract in spec.md §6.
pub fn free_vars(t: &Term) -> HashSet<VarId> {
    let mut out = HashSet::new();
    free_vars_into(t, &HashSet::new(), &mut out);
    out
}

fn free_vars_into(t: &Term, bound: &HashSet<VarId>, out: &mut HashSet<VarId>) {
    match t {
        Term::Vari(x) => {
            if !bound.contains(&x.id()) {
                out.insert(x.id());
            }
        }
        Term::Type | Term::Kind | Term::Symb(_) => {}
        Term::Prod(a, b) | Term::Abst(a, b) => {
            free_vars_into(a, bound, out);
            let (x, body) = b.open();
            let mut inner_bound = bound.clone();
            inner_bound.insert(x.id());
            free_vars_into(&body, &inner_bound, out);
        }
        Term::Appl(f, a) => {
            free_vars_into(f, bound, out);
            free_vars_into(a, bound, out);
        }
        Term::Meta(_, env) => {
            for e in env {
                free_vars_into(e, bound, out);
            }
        }
        Term::Patt(_, _, env) => {
            for v in env {
                if !bound.contains(&v.id()) {
                    out.insert(v.id());
                }
            }
        }
        Term::TEnv(_, env) => {
            for e in env {
                free_vars_into(e, bound, out);
            }
        }
    }
}

/// Returns whether `args` is a sequence of pairwise-distinct variables
/// (spec.md §6 `distinct_vars`).
pub fn distinct_vars(args: &[Term]) -> bool {
    let mut seen = HashSet::new();
    for a in args {
        match a {
            Term::Vari(x) => {
                if !seen.insert(x.id()) {
                    return false;
                }
            }
            _ => return false,
        }
    }
    true
}

/// Unwraps a variable term. A programmer error (panic) if `t` is not a
/// `Vari` (spec.md §6 `to_var`, §7 "Programmer error").
pub fn to_var(t: &Term) -> Var {
    match t {
        Term::Vari(x) => x.clone(),
        _ => panic!("to_var: term is not a variable"),
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Vari(x) => write!(f, "{:?}", x),
            Term::Type => write!(f, "Type"),
            Term::Kind => write!(f, "Kind"),
            Term::Symb(s) => write!(f, "{}", s.name()),
            Term::Prod(a, b) => write!(f, "Π{}:{:?}. {:?}", b.name_hint(), a, b.subst(Term::Vari(Var::fresh(b.name_hint())))),
            Term::Abst(a, b) => write!(f, "λ{}:{:?}. {:?}", b.name_hint(), a, b.subst(Term::Vari(Var::fresh(b.name_hint())))),
            Term::Appl(g, a) => write!(f, "({:?} {:?})", g, a),
            Term::Meta(m, env) => write!(f, "?{}[{:?}]", m.display_name(), env),
            Term::Patt(idx, name, env) => write!(f, "${}{:?}[{:?}]", name, idx, env),
            Term::TEnv(EnvSlot::Unfilled(i), env) => write!(f, "${{{}}}[{:?}]", i, env),
            Term::TEnv(EnvSlot::Filled(_), env) => write!(f, "${{filled}}[{:?}]", env),
        }
    }
}
