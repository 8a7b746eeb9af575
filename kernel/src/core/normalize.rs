/*!

Derived normalization strategies built on `whnf` (spec.md §4.6): `hnf`
recurses into the head only, `snf` recurses everywhere including under
binders. `eval` is the configurable entry point external callers use,
honoring the zero-step-bound short circuit and logging the positive-bound
limitation (spec.md §4.6, §7 "Evaluation limit unsupported").

*/

use kernel_abs::log::warn;

use crate::core::binder::Binder;
use crate::core::config::{EvalConfig, Strategy};
use crate::core::term::Term;

pub fn whnf(t: &Term) -> Term {
    crate::core::machine::whnf(t)
}

/// `hnf(t)`: `whnf(t)`, then recursively normalizes the head of any
/// remaining application spine.
pub fn hnf(t: &Term) -> Term {
    match whnf(t) {
        Term::Appl(h, u) => Term::appl(hnf(&h), *u),
        other => other,
    }
}

/// `snf(t)`: `whnf(t)`, then recurses into every subterm, opening and
/// rebinding under binders and normalizing each metavariable environment
/// entry.
pub fn snf(t: &Term) -> Term {
    match whnf(t) {
        atomic @ (Term::Vari(_) | Term::Type | Term::Kind | Term::Symb(_) | Term::Patt(..)) => atomic,
        Term::Prod(a, b) => Term::prod(snf(&a), snf_binder(&b)),
        Term::Abst(a, b) => Term::abst(snf(&a), snf_binder(&b)),
        Term::Appl(f, u) => Term::appl(snf(&f), snf(&u)),
        Term::Meta(m, env) => Term::Meta(m, env.iter().map(snf).collect()),
        Term::TEnv(slot, env) => Term::TEnv(slot, env.iter().map(snf).collect()),
    }
}

fn snf_binder(b: &Binder) -> Binder {
    let (x, body) = b.open();
    Binder::bind_var(&x, &snf(&body), b.name_hint())
}

/// The configurable entry point: dispatches to a strategy, honoring the
/// step-bound short circuit. A zero bound always returns `t` unchanged; any
/// positive bound is currently unsupported for every strategy and logs a
/// warning rather than failing (spec.md §4.6, an acknowledged gap, not a
/// silent one).
pub fn eval(config: EvalConfig, t: &Term) -> Term {
    if let Some(steps) = config.steps {
        if steps == 0 {
            return t.clone();
        }
        warn!(
            strategy = ?config.strategy,
            steps,
            "eval: positive step bounds are not implemented; returning the input unchanged"
        );
        return t.clone();
    }
    match config.strategy {
        Strategy::Whnf => whnf(t),
        Strategy::Hnf => hnf(t),
        Strategy::Snf => snf(t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::var::Var;

    #[test]
    fn zero_step_bound_is_identity() {
        let t = Term::appl(Term::Type, Term::Kind);
        let cfg = EvalConfig::with_steps(Strategy::Whnf, 0);
        assert_eq!(eval(cfg, &t), t);
    }

    #[test]
    fn hnf_recurses_only_into_head() {
        let x = Var::fresh(kernel_abs::intern("x"));
        let b = Binder::bind_var(&x, &Term::Vari(x.clone()), kernel_abs::intern("x"));
        let inner_redex = Term::appl(Term::abst(Term::Type, b), Term::Kind);
        let t = Term::appl(inner_redex, Term::Type);
        let result = hnf(&t);
        assert_eq!(result, Term::appl(Term::Kind, Term::Type));
    }
}
