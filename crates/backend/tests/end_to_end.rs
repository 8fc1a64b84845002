//! End-to-end tests for the translation pipeline.
//!
//! Each test builds engine expression trees, translates them with a fresh
//! `TranslationContext`, and checks the assembled SMT-LIB text.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use symex_smt_backend::{
    Arg, Ast, Backend, BackendConfig, BackendError, Op, SmtLibBackend, TranslationContext,
};
use symex_smt_smtlib::Term;
use symex_smt_smtlib::sort::Sort;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn translate_all(backend: &SmtLibBackend, roots: &[Ast]) -> Result<Vec<Term>, BackendError> {
    let mut ctx = TranslationContext::new();
    backend.translate_all(roots, &mut ctx)
}

/// `len(s) > 2 && s[1..=2] == "ab" && s.startswith(prefix)` over a few symbols.
fn sample_constraints() -> Vec<Ast> {
    let s = Ast::string_s("s", 64);
    let len = Ast::op(Op::StrLen, [Arg::from(s.clone()), 32i128.into()]);
    vec![
        Ast::op(Op::Gt, [len, Ast::bvv(2, 32)]),
        Ast::op(
            Op::Eq,
            [
                Ast::op(Op::StrSubstr, [Ast::bvv(1, 32), Ast::bvv(2, 32), s.clone()]),
                Ast::string_v("ab"),
            ],
        ),
        Ast::op(Op::StrPrefixOf, [Ast::string_s("prefix", 8), s]),
    ]
}

// ---------------------------------------------------------------------------
// Script shape
// ---------------------------------------------------------------------------

#[test]
fn string_equality_full_model() {
    init_tracing();
    let backend = SmtLibBackend::new();
    let roots = [Ast::op(Op::Eq, [Ast::string_s("s", 8), Ast::string_v("bar")])];
    let constraints = translate_all(&backend, &roots).unwrap();

    let script = backend.full_model_script(&constraints, &[]).unwrap();
    assert_eq!(
        script,
        "(set-logic ALL)\n\
         (set-option :produce-models true)\n\
         (declare-fun s () String)\n\
         (assert (= s \"bar\"))\n\
         (check-sat)\n\
         (get-model)\n"
    );
}

#[test]
fn sample_satisfiability_script() {
    init_tracing();
    let backend = SmtLibBackend::new();
    let constraints = translate_all(&backend, &sample_constraints()).unwrap();

    let script = backend.satisfiability_script(&constraints, &[]).unwrap();
    assert_eq!(
        script,
        "(set-logic ALL)\n\
         (declare-fun prefix () String)\n\
         (declare-fun s () String)\n\
         (assert (> (str.len s) 2))\n\
         (assert (= (str.substr s 1 2) \"ab\"))\n\
         (assert (str.prefixof prefix s))\n\
         (check-sat)\n"
    );
}

#[test]
fn extra_constraints_are_asserted_first() {
    let backend = SmtLibBackend::new();
    let constraints = translate_all(&backend, &sample_constraints()).unwrap();
    let extra = translate_all(
        &backend,
        &[Ast::op(Op::StrContains, [Ast::string_s("s", 64), Ast::string_v("z")])],
    )
    .unwrap();

    let script = backend.satisfiability_script(&constraints, &extra).unwrap();
    let asserts: Vec<_> = script
        .lines()
        .filter(|line| line.starts_with("(assert"))
        .collect();
    assert_eq!(asserts.len(), 4);
    assert_eq!(asserts[0], "(assert (str.contains s \"z\"))");
}

#[test]
fn free_symbols_declared_once_in_name_order() {
    let backend = SmtLibBackend::new();
    let sym = |name: &str| Ast::bvs(name, 32);
    let roots = [
        Ast::op(Op::Eq, [sym("z"), sym("x")]),
        Ast::op(Op::Lt, [sym("y"), sym("z")]),
        Ast::op(Op::Ge, [sym("x"), Ast::bvv(0, 32)]),
        Ast::op(
            Op::Eq,
            [Ast::op(Op::Add, [sym("z"), sym("y"), sym("x")]), Ast::bvv(0, 32)],
        ),
    ];
    let constraints = translate_all(&backend, &roots).unwrap();
    let script = backend.satisfiability_script(&constraints, &[]).unwrap();

    let decls: Vec<_> = script
        .lines()
        .filter(|line| line.starts_with("(declare-fun"))
        .collect();
    assert_eq!(
        decls,
        vec![
            "(declare-fun x () Int)",
            "(declare-fun y () Int)",
            "(declare-fun z () Int)",
        ]
    );
}

#[test]
fn configured_logic_without_sharing() {
    let backend = SmtLibBackend::with_config(
        BackendConfig::from_json(r#"{"logic": "QF_SLIA", "daggify": false}"#).unwrap(),
    )
    .unwrap();
    let s = Ast::string_s("s", 8);
    let len = Ast::op(Op::StrLen, [Arg::from(s), 32i128.into()]);
    let roots = [Ast::op(Op::Eq, [len.clone(), len])];
    let constraints = translate_all(&backend, &roots).unwrap();

    let script = backend.satisfiability_script(&constraints, &[]).unwrap();
    assert!(script.starts_with("(set-logic QF_SLIA)\n"));
    assert!(script.contains("(assert (= (str.len s) (str.len s)))\n"));
}

// ---------------------------------------------------------------------------
// Sort consistency
// ---------------------------------------------------------------------------

/// Panics unless every operator in `term` sees operands of the sorts it takes.
fn assert_well_sorted(term: &Term) {
    match term {
        Term::Eq(a, b) => assert_eq!(a.sort(), b.sort(), "mixed sorts in {term}"),
        Term::IntAdd(a, b)
        | Term::IntSub(a, b)
        | Term::IntLt(a, b)
        | Term::IntLe(a, b)
        | Term::IntGt(a, b)
        | Term::IntGe(a, b) => {
            assert_eq!(a.sort(), Some(Sort::Int), "non-integer operand in {term}");
            assert_eq!(b.sort(), Some(Sort::Int), "non-integer operand in {term}");
        }
        Term::Ite(c, t, e) => {
            assert_eq!(c.sort(), Some(Sort::Bool), "non-boolean condition in {term}");
            assert_eq!(t.sort(), e.sort(), "mixed branches in {term}");
        }
        Term::StrSubstr(_, start, count) => {
            assert_eq!(start.sort(), Some(Sort::Int), "non-integer offset in {term}");
            assert_eq!(count.sort(), Some(Sort::Int), "non-integer count in {term}");
        }
        _ => {}
    }
    for child in term.children() {
        assert_well_sorted(child);
    }
}

fn translate_one(ast: &Ast) -> Term {
    let mut ctx = TranslationContext::new();
    SmtLibBackend::new().translate(ast, &mut ctx).unwrap()
}

fn str_len() -> Ast {
    Ast::op(Op::StrLen, [Arg::from(Ast::string_s("s", 64)), 32i128.into()])
}

fn str_index_of() -> Ast {
    Ast::op(
        Op::StrIndexOf,
        [Arg::from(Ast::string_s("s", 64)), Ast::string_v("a").into(), 32i128.into()],
    )
}

#[test]
fn nested_arithmetic_is_integer_sorted() {
    let c = || Ast::bool_s("c");
    let sum = Ast::op(Op::Add, [Ast::bvv(1, 32), Ast::bvv(2, 32)]);
    let diff = Ast::op(Op::Sub, [Ast::bvv(5, 32), Ast::bvv(1, 32)]);
    let choice = Ast::op(Op::If, [c(), Ast::bvv(1, 32), Ast::bvv(2, 32)]);
    let nested = Ast::op(
        Op::If,
        [c(), Ast::bvv(3, 32), Ast::op(Op::Add, [Ast::bvs("x", 32), Ast::bvv(1, 32)])],
    );
    let cases = [
        (Ast::op(Op::Eq, [str_len(), sum]), "(= (str.len s) (+ 1 2))"),
        (Ast::op(Op::Eq, [Ast::bvs("x", 32), diff]), "(= x (- 5 1))"),
        (Ast::op(Op::Eq, [str_len(), choice]), "(= (str.len s) (ite c 1 2))"),
        (
            Ast::op(Op::If, [c(), Ast::bvs("y", 32), Ast::bvv(2, 32)]),
            "(ite c y 2)",
        ),
        (
            Ast::op(
                Op::Lt,
                [
                    str_index_of(),
                    Ast::op(Op::Sub, [nested, Ast::bvv(0xffff_ffff, 32)]),
                ],
            ),
            "(< (str.indexof s \"a\" 0) (- (ite c 3 (+ x 1)) (- 1)))",
        ),
    ];
    for (ast, expected) in cases {
        let term = translate_one(&ast);
        assert_well_sorted(&term);
        assert_eq!(term.to_string(), expected);
    }
}

/// Integer-valued expressions mixing literals, emulated symbols and string
/// lengths under `+`, `-` and `ite`.
fn arb_numeric() -> impl Strategy<Value = Ast> {
    let leaf = prop_oneof![
        any::<i32>().prop_map(|n| Ast::bvv(i128::from(n), 32)),
        prop::sample::select(vec!["x", "y"]).prop_map(|name| Ast::bvs(name, 32)),
        Just(str_len()),
        Just(str_index_of()),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Ast::op(Op::Add, [a, b])),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Ast::op(Op::Sub, [a, b])),
            (inner.clone(), inner).prop_map(|(a, b)| Ast::op(Op::If, [Ast::bool_s("c"), a, b])),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn comparisons_are_well_sorted(
        a in arb_numeric(),
        b in arb_numeric(),
        op in prop::sample::select(vec![Op::Eq, Op::Ne, Op::Lt, Op::Ge]),
    ) {
        let term = translate_one(&Ast::op(op, [a, b]));
        assert_well_sorted(&term);
    }

    #[test]
    fn substring_bounds_are_well_sorted(start in arb_numeric(), end in arb_numeric()) {
        let ast = Ast::op(Op::StrSubstr, [start, end, Ast::string_s("s", 64)]);
        assert_well_sorted(&translate_one(&ast));
    }
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn independent_contexts_produce_identical_text() {
    let backend = SmtLibBackend::new();
    let first = translate_all(&backend, &sample_constraints()).unwrap();
    let second = translate_all(&backend, &sample_constraints()).unwrap();
    assert_eq!(
        backend.full_model_script(&first, &[]).unwrap(),
        backend.full_model_script(&second, &[]).unwrap()
    );
}

#[test]
fn parallel_translation_is_deterministic() {
    let backend = Arc::new(SmtLibBackend::new());
    let expected = {
        let constraints = translate_all(&backend, &sample_constraints()).unwrap();
        backend.full_model_script(&constraints, &[]).unwrap()
    };

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let backend = Arc::clone(&backend);
            thread::spawn(move || {
                let constraints = translate_all(&backend, &sample_constraints()).unwrap();
                backend.full_model_script(&constraints, &[]).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn unsupported_operation_produces_no_script() {
    init_tracing();
    let backend = SmtLibBackend::new();
    let mut roots = sample_constraints();
    roots.push(Ast::op(
        Op::Eq,
        [
            Ast::op(Op::LShR, [Ast::bvs("x", 32), Ast::bvv(1, 32)]),
            Ast::bvv(0, 32),
        ],
    ));

    let err = translate_all(&backend, &roots).unwrap_err();
    assert_eq!(
        err,
        BackendError::UnsupportedOperation {
            op: "LShR".to_string()
        }
    );
}

#[test]
fn unknown_operation_name_is_unsupported() {
    let err = Ast::from_name("fpToFP", vec![]).unwrap_err();
    assert_eq!(err.to_string(), "unsupported operation: fpToFP");
}

#[test]
fn satisfiable_directs_to_solving_backend() {
    let backend = SmtLibBackend::new();
    let constraints = translate_all(&backend, &sample_constraints()).unwrap();
    let err = backend.satisfiable(&constraints, &[]).unwrap_err();
    assert!(matches!(err, BackendError::BackendUnavailable(_)), "{err:?}");
}
