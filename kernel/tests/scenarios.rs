//! End-to-end scenarios and mechanically-testable invariants (spec.md §8),
//! driven entirely through the public `kernel::api` surface.

use kernel::api::*;
use kernel_abs::intern;

fn constant(name: &str) -> SymbolPtr {
    Symbol::new_constant(intern(name), intern("scenarios"), 0, Term::Type)
}

fn definable(name: &str, arity: u32) -> SymbolPtr {
    Symbol::new_definable(intern(name), intern("scenarios"), arity, Term::Type)
}

/// A linear pattern placeholder bound to RHS slot `i`, with no environment
/// restriction.
fn pv(i: usize) -> Term {
    Term::Patt(Some(i), intern("p"), vec![])
}

/// An anonymous wildcard pattern placeholder.
fn wild() -> Term {
    Term::Patt(None, intern("_"), vec![])
}

fn tenv(i: usize) -> Term {
    Term::TEnv(EnvSlot::Unfilled(i), vec![])
}

fn app(head: &SymbolPtr, args: Vec<Term>) -> Term {
    apply(Term::Symb(head.clone()), args)
}

// ---- Scenario 1: addition --------------------------------------------

#[test]
fn scenario_addition() {
    let _n = constant("N");
    let zero = constant("0");
    let s = constant("s");
    let add = definable("add", 2);

    // add 0 ?x -> ?x
    add.add_rule(Rule::new(vec![Term::Symb(zero.clone()), pv(0)], tenv(0), 1))
        .unwrap();
    // add (s ?x) ?y -> s (add ?x ?y)
    add.add_rule(
        Rule::new(
            vec![Term::appl(Term::Symb(s.clone()), pv(0)), pv(1)],
            Term::appl(Term::Symb(s.clone()), app(&add, vec![tenv(0), tenv(1)])),
            2,
        ),
    )
    .unwrap();

    let succ = |t: Term| Term::appl(Term::Symb(s.clone()), t);
    let two = succ(succ(Term::Symb(zero.clone())));
    let four = succ(succ(succ(succ(Term::Symb(zero.clone())))));

    let result = snf(&app(&add, vec![two.clone(), two]));
    assert_eq!(result, four);
}


// ---- Scenario 2: first-order `plus` -----------------------------------

#[test]
fn scenario_plus_rule_ordering() {
    let zero = constant("0b");
    let s = constant("sb");
    let plus = definable("plus", 2);
    let succ = |t: Term| Term::appl(Term::Symb(s.clone()), t);

    // plus 0 (s ?m) -> s ?m
    plus.add_rule(Rule::new(
        vec![Term::Symb(zero.clone()), Term::appl(Term::Symb(s.clone()), pv(0))],
        succ(tenv(0)),
        1,
    ))
    .unwrap();
    // plus ?n 0 -> ?n
    plus.add_rule(Rule::new(vec![pv(0), Term::Symb(zero.clone())], tenv(0), 1))
        .unwrap();
    // plus (s ?n) (s ?m) -> s (s (plus ?n ?m))
    plus.add_rule(Rule::new(
        vec![
            Term::appl(Term::Symb(s.clone()), pv(0)),
            Term::appl(Term::Symb(s.clone()), pv(1)),
        ],
        succ(succ(app(&plus, vec![tenv(0), tenv(1)]))),
        2,
    ))
    .unwrap();

    let z = Term::Symb(zero.clone());
    assert_eq!(snf(&app(&plus, vec![z.clone(), z.clone()])), z);
    assert_eq!(snf(&app(&plus, vec![z.clone(), succ(z.clone())])), succ(z.clone()));
    assert_eq!(
        snf(&app(&plus, vec![succ(z.clone()), succ(succ(z.clone()))])),
        succ(succ(succ(z)))
    );
}

// ---- Scenario 3: universe decoding -------------------------------------

#[test]
fn scenario_universe_decoding() {
    let _u = constant("U");
    let nat = constant("nat");
    let n = constant("N3");
    let t = definable("T", 1);

    // T nat -> N
    t.add_rule(Rule::new(vec![Term::Symb(nat.clone())], Term::Symb(n.clone()), 0))
        .unwrap();

    assert!(eq_modulo(&app(&t, vec![Term::Symb(nat)]), &Term::Symb(n)));
}

// ---- Scenario 4: beta reduction -----------------------------------------

#[test]
fn scenario_beta_reduction() {
    let n = constant("N4");
    let zero = constant("04");
    let s = constant("s4");
    let succ = |t: Term| Term::appl(Term::Symb(s.clone()), t);

    let x = Var::fresh(intern("x"));
    let body = succ(succ(Term::Vari(x.clone())));
    let lambda = Term::abst(Term::Symb(n.clone()), Binder::bind_var(&x, &body, intern("x")));
    let redex = Term::appl(lambda, Term::Symb(zero.clone()));

    assert_eq!(snf(&redex), succ(succ(Term::Symb(zero))));
}

// ---- Scenario 5: non-linear rule ----------------------------------------

#[test]
fn scenario_non_linear_rule() {
    let _n = constant("N5");
    let zero = constant("05");
    let s = constant("s5");
    let eqs = definable("eqs", 2);
    let succ = |t: Term| Term::appl(Term::Symb(s.clone()), t);

    // eqs ?n ?n -> s 0
    eqs.add_rule(Rule::new(vec![pv(0), pv(0)], succ(Term::Symb(zero.clone())), 1))
        .unwrap();

    assert!(eq_modulo(
        &app(&eqs, vec![succ(Term::Symb(zero.clone())), succ(Term::Symb(zero.clone()))]),
        &succ(Term::Symb(zero.clone()))
    ));

    // x and y both of "type e 0"; x -> y; eqs x y -> s 0 via non-linear
    // matching modulo conversion, not syntactic identity.
    let x = definable("x5", 0);
    let y = definable("y5", 0);
    x.add_rule(Rule::new(vec![], Term::Symb(y.clone()), 0)).unwrap();

    assert!(eq_modulo(
        &app(&eqs, vec![Term::Symb(x), Term::Symb(y)]),
        &succ(Term::Symb(zero))
    ));
}

// ---- Scenario 6: higher-order pattern (nat_ind) --------------------------

#[test]
fn scenario_higher_order_nat_ind() {
    let zero = constant("06");
    let s = constant("s6");
    let p = constant("p6");
    let u0 = constant("u06");
    let v = constant("v6");
    let nat_ind = definable("nat_ind6", 4);
    let succ = |t: Term| Term::appl(Term::Symb(s.clone()), t);

    // nat_ind _ ?u _ 0 -> ?u
    nat_ind
        .add_rule(Rule::new(
            vec![wild(), pv(0), wild(), Term::Symb(zero.clone())],
            tenv(0),
            1,
        ))
        .unwrap();
    // nat_ind ?p ?u ?v (s ?n) -> ?v ?n (nat_ind ?p ?u ?v ?n)
    nat_ind
        .add_rule(Rule::new(
            vec![pv(0), pv(1), pv(2), Term::appl(Term::Symb(s.clone()), pv(3))],
            apply(tenv(2), vec![tenv(3), app(&nat_ind, vec![tenv(0), tenv(1), tenv(2), tenv(3)])]),
            4,
        ))
        .unwrap();

    // arg0 = λn. p n
    let n_var = Var::fresh(intern("n"));
    let arg0_body = Term::appl(Term::Symb(p.clone()), Term::Vari(n_var.clone()));
    let arg0 = Term::abst(Term::Type, Binder::bind_var(&n_var, &arg0_body, intern("n")));

    // arg2 = λn h. v n h
    let n2 = Var::fresh(intern("n"));
    let h = Var::fresh(intern("h"));
    let inner_body = apply(Term::Symb(v.clone()), vec![Term::Vari(n2.clone()), Term::Vari(h.clone())]);
    let inner = Term::abst(Term::Type, Binder::bind_var(&h, &inner_body, intern("h")));
    let arg2 = Term::abst(Term::Type, Binder::bind_var(&n2, &inner, intern("n")));

    let two = succ(succ(Term::Symb(zero.clone())));
    let call = app(&nat_ind, vec![arg0, Term::Symb(u0.clone()), arg2, two]);

    let expected = apply(
        Term::Symb(v.clone()),
        vec![
            succ(Term::Symb(zero.clone())),
            apply(Term::Symb(v), vec![Term::Symb(zero), Term::Symb(u0)]),
        ],
    );

    assert_eq!(snf(&call), expected);
}

// ---- Scenario 7: env-restricted pattern whose match is itself a binder --

#[test]
fn scenario_env_restricted_pattern_under_binder() {
    let zero = constant("09");
    let d = definable("hof9", 1);

    let x = Var::fresh(intern("x"));
    let h_patt = Term::Patt(Some(0), intern("h"), vec![x.clone()]);
    let lhs_arg = Term::abst(Term::Type, Binder::bind_var(&x, &h_patt, intern("x")));
    // d (λx. ?h[x]) -> ?h[0]
    d.add_rule(Rule::new(
        vec![lhs_arg],
        Term::TEnv(EnvSlot::Unfilled(0), vec![Term::Symb(zero)]),
        1,
    ))
    .unwrap();

    // The matched argument's body never mentions the outer `x`, so the
    // closure `?h` captures over `x` is itself a closed term — it must still
    // match the with-environment case even though it contains its own
    // (unrelated) binder.
    let y = Var::fresh(intern("y"));
    let identity = Term::abst(Term::Type, Binder::bind_var(&y, &Term::Vari(y.clone()), intern("y")));
    let matched_arg = Term::abst(Term::Type, Binder::bind_var(&x, &identity, intern("x")));

    let result = whnf(&app(&d, vec![matched_arg]));

    let y2 = Var::fresh(intern("y"));
    let expected = Term::abst(Term::Type, Binder::bind_var(&y2, &Term::Vari(y2.clone()), intern("y")));
    assert_eq!(result, expected);
}

// ---- Mechanically-testable invariants ------------------------------------

#[test]
fn invariant_eq_reflexive() {
    let t = Term::appl(Term::Type, Term::Kind);
    assert!(eq(&t, &t));
}

#[test]
fn invariant_eq_implies_eq_modulo() {
    let t = Term::appl(Term::Type, Term::Kind);
    let u = Term::appl(Term::Type, Term::Kind);
    assert!(eq(&t, &u));
    assert!(eq_modulo(&t, &u));
}

#[test]
fn invariant_whnf_idempotent() {
    let x = Var::fresh(intern("x"));
    let body = Term::Vari(x.clone());
    let lambda = Term::abst(Term::Type, Binder::bind_var(&x, &body, intern("x")));
    let redex = Term::appl(lambda, Term::Kind);
    let once = whnf(&redex);
    let twice = whnf(&once);
    assert_eq!(once, twice);
}

#[test]
fn invariant_rule_ordering_first_match_wins() {
    let a = constant("A7");
    let b = constant("B7");
    let f = definable("f7", 1);

    // Both rules match any argument; declaration order must decide.
    f.add_rule(Rule::new(vec![wild()], Term::Symb(a.clone()), 0)).unwrap();
    f.add_rule(Rule::new(vec![wild()], Term::Symb(b), 0)).unwrap();

    let c = constant("C7");
    assert_eq!(whnf(&app(&f, vec![Term::Symb(c)])), Term::Symb(a));
}

#[test]
fn invariant_non_linearity_requires_conversion_equality() {
    let zero = constant("08");
    let s = constant("s8");
    let f = definable("f8", 2);
    let g_sym = constant("g8");
    let succ = |t: Term| Term::appl(Term::Symb(s.clone()), t);

    // f ?x ?x -> g ?x
    f.add_rule(Rule::new(vec![pv(0), pv(0)], app(&g_sym, vec![tenv(0)]), 1))
        .unwrap();

    // q8 is not syntactically `succ 0`, but reduces to it; the rule must
    // still fire because matching a repeated hole uses `eq_modulo`, not `eq`.
    let q8 = definable("q8", 0);
    let expected = succ(Term::Symb(zero));
    q8.add_rule(Rule::new(vec![], expected.clone(), 0)).unwrap();

    assert!(!eq(&Term::Symb(q8.clone()), &expected));
    assert!(eq_modulo(
        &app(&f, vec![expected.clone(), Term::Symb(q8)]),
        &app(&g_sym, vec![expected])
    ));
}
