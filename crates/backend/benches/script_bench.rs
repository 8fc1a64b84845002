//! Benchmarks for translation and script assembly.
//!
//! Benchmark groups:
//! - `translate_*`: expression trees -> terms
//! - `script_*`: translated constraints -> SMT-LIB text

use criterion::{Criterion, criterion_group, criterion_main};
use symex_smt_backend::{Arg, Ast, Backend, BackendConfig, Op, SmtLibBackend, TranslationContext};

// ---------------------------------------------------------------------------
// Constraint constructors
// ---------------------------------------------------------------------------

/// `s == "bar"`
fn make_equality() -> Vec<Ast> {
    vec![Ast::op(Op::Eq, [Ast::string_s("s", 8), Ast::string_v("bar")])]
}

/// A path condition of `depth` string checks sharing `len(s)`.
fn make_path_condition(depth: i128) -> Vec<Ast> {
    let s = Ast::string_s("s", 64);
    let len = Ast::op(Op::StrLen, [Arg::from(s.clone()), 32i128.into()]);
    (0..depth)
        .map(|i| {
            let needle = Ast::string_s(&format!("n{i}"), 8);
            Ast::op(
                Op::And,
                [
                    Ast::op(Op::Gt, [len.clone(), Ast::bvv(i, 32)]),
                    Ast::op(
                        Op::Eq,
                        [
                            Ast::op(
                                Op::Add,
                                [
                                    Ast::op(
                                        Op::StrIndexOf,
                                        [Arg::from(s.clone()), needle.into(), 32i128.into()],
                                    ),
                                    Ast::bvv(1, 32),
                                ],
                            ),
                            len.clone(),
                        ],
                    ),
                ],
            )
        })
        .collect()
}

fn translate(backend: &SmtLibBackend, roots: &[Ast]) -> Vec<symex_smt_smtlib::Term> {
    let mut ctx = TranslationContext::new();
    match backend.translate_all(roots, &mut ctx) {
        Ok(terms) => terms,
        Err(e) => panic!("benchmark constraints must translate: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Translation benchmarks
// ---------------------------------------------------------------------------

fn bench_translate_equality(c: &mut Criterion) {
    let backend = SmtLibBackend::new();
    let roots = make_equality();
    c.bench_function("translate_equality", |b| {
        b.iter(|| translate(&backend, &roots));
    });
}

fn bench_translate_path_condition(c: &mut Criterion) {
    let backend = SmtLibBackend::new();
    let roots = make_path_condition(64);
    c.bench_function("translate_path_condition_64", |b| {
        b.iter(|| translate(&backend, &roots));
    });
}

// ---------------------------------------------------------------------------
// Script benchmarks
// ---------------------------------------------------------------------------

fn bench_script_full_model(c: &mut Criterion) {
    let backend = SmtLibBackend::new();
    let constraints = translate(&backend, &make_path_condition(64));
    c.bench_function("script_full_model_64", |b| {
        b.iter(|| backend.full_model_script(&constraints, &[]));
    });
}

fn bench_script_without_sharing(c: &mut Criterion) {
    let backend = match SmtLibBackend::with_config(BackendConfig::new().with_daggify(false)) {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("invalid configuration, skipping bench: {e}");
            return;
        }
    };
    let constraints = translate(&backend, &make_path_condition(64));
    c.bench_function("script_full_model_64_no_sharing", |b| {
        b.iter(|| backend.full_model_script(&constraints, &[]));
    });
}

// ---------------------------------------------------------------------------
// Criterion groups and main
// ---------------------------------------------------------------------------

criterion_group!(
    translate_benches,
    bench_translate_equality,
    bench_translate_path_condition,
);

criterion_group!(
    script_benches,
    bench_script_full_model,
    bench_script_without_sharing,
);

criterion_main!(translate_benches, script_benches);
