/*!

The abstract machine (spec.md §4.3): a term plus a stack of mutable argument
cells, reduced to weak-head normal form by `whnf_stk`.

Mutability of a cell exists solely for *sharing*: once the matcher forces a
cell to whnf, the cell is updated in place so that a later inspection of the
same argument (e.g. a non-linear pattern's back-reference) reuses the forced
value instead of re-reducing it (spec.md §4.4 "Sharing", §8 invariant 6).

*/

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use kernel_abs::log::trace;

use crate::core::config::{Config, DebugFlag};
use crate::core::term::{apply, unfold, Term};

/// A mutable argument slot on the reduction stack.
pub type Cell = Rc<RefCell<Term>>;

pub fn new_cell(t: Term) -> Cell {
    Rc::new(RefCell::new(t))
}

/// The machine's argument stack. The front of the deque is the leftmost
/// (innermost, nearest) argument.
pub type Stack = VecDeque<Cell>;

/// Forces a cell to weak-head normal form, mutating it in place so the
/// sharing invariant holds, and returns the resulting term.
pub fn force_cell(cell: &Cell, config: Config) -> Term {
    let current = cell.borrow().clone();
    let whnf_term = whnf_with(&current, config);
    *cell.borrow_mut() = whnf_term.clone();
    whnf_term
}

/// `whnf_stk(t, stk)`: reduces the leftmost position of `t` applied to `stk`,
/// returning the resulting head and the (possibly extended/shrunk) stack.
pub fn whnf_stk(t: &Term, mut stk: Stack, config: Config) -> (Term, Stack) {
    let head = unfold(t);
    match head {
        Term::Appl(f, u) => {
            stk.push_front(new_cell(*u));
            whnf_stk(&f, stk, config)
        }
        Term::Abst(domain, body_binder) => {
            if let Some(cell) = stk.pop_front() {
                let arg = cell.borrow().clone();
                let body = body_binder.subst(arg);
                whnf_stk(&body, stk, config)
            } else {
                (Term::Abst(domain, body_binder), stk)
            }
        }
        Term::Symb(ref s) => {
            if config.enabled(DebugFlag::TraceReduction) {
                trace!(symbol = %s.name(), stack_len = stk.len(), "whnf_stk: trying rules");
            }
            match crate::core::matcher::try_rules(s, &stk, config) {
                Some((t_new, stk_new)) => whnf_stk(&t_new, stk_new, config),
                None => (head, stk),
            }
        }
        other => (other, stk),
    }
}

fn whnf_with(t: &Term, config: Config) -> Term {
    let (h, stk) = whnf_stk(t, Stack::new(), config);
    apply(h, stk.iter().map(|c| c.borrow().clone()))
}

/// `whnf(t)`: the weak-head normal form of `t`.
pub fn whnf(t: &Term) -> Term {
    whnf_with(t, Config::default())
}

pub fn whnf_cfg(t: &Term, config: Config) -> Term {
    whnf_with(t, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::binder::Binder;
    use crate::core::var::Var;

    #[test]
    fn beta_reduction() {
        // (\x. x) Type -> Type
        let x = Var::fresh(kernel_abs::intern("x"));
        let b = Binder::bind_var(&x, &Term::Vari(x.clone()), kernel_abs::intern("x"));
        let redex = Term::appl(Term::abst(Term::Kind, b), Term::Type);
        let result = whnf(&redex);
        assert!(matches!(result, Term::Type));
    }

    #[test]
    fn force_cell_reuses_the_first_result() {
        // spec.md §8 invariant 6: forcing a cell a second time must not
        // re-run whatever produced its value the first time.
        use crate::core::binder::MBinder;
        use crate::core::symbol::Symbol;
        use crate::core::term::EnvSlot;
        use std::cell::Cell as StdCell;

        let evaluations = Rc::new(StdCell::new(0u32));
        let evaluations_inner = evaluations.clone();
        let probe_sym = Symbol::new_constant(
            kernel_abs::intern("probe_result"),
            kernel_abs::intern("test"),
            0,
            Term::Type,
        );
        let probe_result = Term::Symb(probe_sym);
        let mb = MBinder::from_thunk(0, move || {
            evaluations_inner.set(evaluations_inner.get() + 1);
            probe_result.clone()
        });
        let probe_term = Term::TEnv(EnvSlot::Filled(mb), vec![]);

        let cell = new_cell(probe_term);
        let config = Config::default();
        let first = force_cell(&cell, config);
        let second = force_cell(&cell, config);

        assert_eq!(evaluations.get(), 1);
        assert!(matches!(first, Term::Symb(_)));
        assert!(matches!(second, Term::Symb(_)));
    }
}
