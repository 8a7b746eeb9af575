/*!

Higher-order pattern matching of a rewrite rule against a machine stack
(spec.md §4.4).

`try_rules` is what `whnf_stk`'s `Symb` arm calls: it walks a symbol's rules
in declaration order (rule order is user-visible, never reordered) and
returns the first one whose left-hand side matches, substituted into its
right-hand side. `match_term` is the per-argument primitive, tried in the
priority order §4.4 specifies — pattern placeholders before structural
inspection, so a matched subterm is never forced unless a clause actually
needs its value.

*/

use kernel_abs::{log::trace, IString};
use smallvec::{smallvec, SmallVec};

use crate::core::binder::{Binder, MBinder};
use crate::core::config::{Config, DebugFlag};
use crate::core::convert::eq_modulo;
use crate::core::machine::{force_cell, Cell, Stack};
use crate::core::symbol::SymbolPtr;
use crate::core::term::{EnvSlot, Term};
use crate::core::var::Var;

fn name_hints_of(vars: &[Var]) -> Vec<IString> {
    vars.iter().map(Var::name_hint).collect()
}

fn vars_as_terms(vars: &[Var]) -> Vec<Term> {
    vars.iter().cloned().map(Term::Vari).collect()
}

/// Matches a single left-hand-side pattern `p` against `cell`, mutating
/// `env` on success. See spec.md §4.4 for the case-by-case contract.
fn match_term(env: &mut [Option<MBinder>], p: &Term, cell: &Cell, config: Config) -> bool {
    match p {
        Term::Patt(Some(i), _, e) if env[*i].is_none() => {
            if e.is_empty() {
                // Linear, no-environment case: bind the deferred cell value
                // without forcing it.
                let cell = cell.clone();
                env[*i] = Some(MBinder::from_thunk(0, move || cell.borrow().clone()));
                true
            } else {
                // Linear, with-environment case: force, then require the
                // result to mention no free variable outside `e`.
                let forced = force_cell(cell, config);
                let b = MBinder::bind_vars(e, &forced, name_hints_of(e));
                if b.is_closed() {
                    env[*i] = Some(b);
                    true
                } else {
                    false
                }
            }
        }
        Term::Patt(Some(i), _, e) => {
            // Non-linear repeat: the slot already holds a value from an
            // earlier occurrence; this occurrence must agree with it modulo
            // conversion.
            let forced = force_cell(cell, config);
            let b = env[*i].as_ref().expect("checked Some above");
            let expected = b.apply(&vars_as_terms(e));
            eq_modulo(&expected, &forced)
        }
        Term::Patt(None, _, e) => {
            if e.is_empty() {
                true
            } else {
                let forced = force_cell(cell, config);
                MBinder::bind_vars(e, &forced, name_hints_of(e)).is_closed()
            }
        }
        _ => match_structural(env, p, cell, config),
    }
}

fn match_structural(env: &mut [Option<MBinder>], p: &Term, cell: &Cell, config: Config) -> bool {
    let forced = force_cell(cell, config);
    match (p, &forced) {
        (Term::Abst(_, b1), Term::Abst(_, b2)) => {
            let x = Var::fresh(b1.name_hint());
            let body1 = b1.subst(Term::Vari(x.clone()));
            let body2 = b2.subst(Term::Vari(x));
            match_term(env, &body1, &crate::core::machine::new_cell(body2), config)
        }
        (Term::Appl(f1, u1), Term::Appl(f2, u2)) => {
            match_term(env, f1, &crate::core::machine::new_cell((**f2).clone()), config)
                && match_term(env, u1, &crate::core::machine::new_cell((**u2).clone()), config)
        }
        (Term::Vari(x1), Term::Vari(x2)) => x1 == x2,
        (Term::Symb(s1), Term::Symb(s2)) => std::rc::Rc::ptr_eq(s1, s2),
        _ => false,
    }
}

/// Replaces every `TEnv(Unfilled(i), e)` node in a rule's right-hand-side
/// template with `env[i].apply(e)`, as if `rhs` were the literal multi-binder
/// spec.md §3 describes (see `crate::core::symbol::Rule`'s doc comment).
pub fn instantiate_rhs(t: &Term, env: &[Option<MBinder>]) -> Term {
    match t {
        Term::Vari(_) | Term::Type | Term::Kind | Term::Symb(_) => t.clone(),
        Term::Prod(a, b) => Term::Prod(Box::new(instantiate_rhs(a, env)), instantiate_binder(b, env)),
        Term::Abst(a, b) => Term::Abst(Box::new(instantiate_rhs(a, env)), instantiate_binder(b, env)),
        Term::Appl(f, a) => {
            Term::Appl(Box::new(instantiate_rhs(f, env)), Box::new(instantiate_rhs(a, env)))
        }
        Term::Meta(m, e) => Term::Meta(m.clone(), e.iter().map(|x| instantiate_rhs(x, env)).collect()),
        Term::Patt(_, _, _) => unreachable!("pattern placeholder in rule right-hand side"),
        Term::TEnv(EnvSlot::Unfilled(i), e) => {
            let args: Vec<Term> = e.iter().map(|x| instantiate_rhs(x, env)).collect();
            let mb = env[*i]
                .as_ref()
                .expect("rule well-formedness: every RHS slot is bound by some LHS pattern");
            mb.apply(&args)
        }
        Term::TEnv(EnvSlot::Filled(mb), e) => {
            let args: Vec<Term> = e.iter().map(|x| instantiate_rhs(x, env)).collect();
            mb.apply(&args)
        }
    }
}

fn instantiate_binder(b: &Binder, env: &[Option<MBinder>]) -> Binder {
    let (x, body) = b.open();
    let new_body = instantiate_rhs(&body, env);
    Binder::bind_var(&x, &new_body, b.name_hint())
}

/// Tries every rule attached to `s`, in declaration order, against `stk`.
/// Returns the new machine state on the first match.
pub fn try_rules(s: &SymbolPtr, stk: &Stack, config: Config) -> Option<(Term, Stack)> {
    'rules: for rule in s.rules().iter() {
        if rule.arity() > stk.len() {
            continue;
        }
        // Rule environments are almost always tiny (a handful of pattern
        // variables); a `SmallVec` avoids a heap allocation per match
        // attempt in the common case, the same tradeoff the rest of the
        // pack makes for small binding environments.
        let mut env: SmallVec<[Option<MBinder>; 4]> = smallvec![None; rule.rhs_arity];
        for (i, pat) in rule.lhs.iter().enumerate() {
            if !match_term(&mut env, pat, &stk[i], config) {
                continue 'rules;
            }
        }
        let t_new = instantiate_rhs(&rule.rhs, &env);
        let remaining: Stack = stk.iter().skip(rule.arity()).cloned().collect();
        if config.enabled(DebugFlag::TraceMatching) {
            trace!(symbol = %s.name(), arity = rule.arity(), "rule fired");
        }
        return Some((t_new, remaining));
    }
    None
}
