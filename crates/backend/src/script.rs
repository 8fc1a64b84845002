//! Script Builder: complete SMT-LIB queries from translated assertions.
//!
//! Both query shapes share one layout:
//!
//! ```text
//! (set-logic ALL)
//! (set-option :produce-models true)   ; full-model only
//! (declare-fun x () Int)              ; one per free symbol, sorted by name
//! (assert ...)                        ; one per assertion, in order
//! (check-sat)
//! (get-model)                         ; full-model only
//! ```
//!
//! Declarations are derived from the assertions themselves, not from a
//! translation context, so the text depends only on the assertion values.

use symex_smt_smtlib::command::Command;
use symex_smt_smtlib::dag::share_subterms;
use symex_smt_smtlib::script::Script;
use symex_smt_smtlib::term::Term;
use symex_smt_smtlib::{Symbol, free_symbols_of};

use crate::config::BackendConfig;
use crate::context::Declaration;
use crate::error::BackendError;

/// Which query to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// `(check-sat)` only.
    Satisfiability,
    /// Produces models and ends with `(get-model)`.
    FullModel,
}

/// A collaborator holding the default, ordered set of constraints.
pub trait ConstraintSet {
    fn constraints(&self) -> &[Term];
}

impl ConstraintSet for [Term] {
    fn constraints(&self) -> &[Term] {
        self
    }
}

impl ConstraintSet for Vec<Term> {
    fn constraints(&self) -> &[Term] {
        self
    }
}

impl<const N: usize> ConstraintSet for [Term; N] {
    fn constraints(&self) -> &[Term] {
        self
    }
}

/// Declarations for every free symbol of `assertions`, sorted by name.
pub fn free_declarations(assertions: &[Term]) -> Result<Vec<Declaration>, BackendError> {
    let symbols: Vec<Symbol> = free_symbols_of(assertions)?;
    Ok(symbols.into_iter().map(Declaration::from).collect())
}

/// Assemble the command list for `assertions`.
pub fn build_script(
    assertions: &[Term],
    kind: QueryKind,
    config: &BackendConfig,
) -> Result<Script, BackendError> {
    let declarations = free_declarations(assertions)?;

    let mut script = Script::new();
    script.push(Command::SetLogic(config.logic.clone()));
    if kind == QueryKind::FullModel {
        script.push(Command::produce_models());
    }
    script.extend(declarations.iter().map(Declaration::to_command));
    script.extend(assertions.iter().map(|term| {
        let term = if config.daggify {
            share_subterms(term)
        } else {
            term.clone()
        };
        Command::Assert(term)
    }));
    script.push(Command::CheckSat);
    if kind == QueryKind::FullModel {
        script.push(Command::GetModel);
    }

    tracing::debug!(
        ?kind,
        declarations = declarations.len(),
        assertions = assertions.len(),
        "Built SMT-LIB script"
    );
    Ok(script)
}

/// `extra` first, then the source's own constraints.
fn merged<S: ConstraintSet + ?Sized>(source: &S, extra: &[Term]) -> Vec<Term> {
    extra
        .iter()
        .chain(source.constraints())
        .cloned()
        .collect()
}

/// Satisfiability query over `extra` followed by `source`'s constraints.
pub fn satisfiability_script<S: ConstraintSet + ?Sized>(
    source: &S,
    extra: &[Term],
    config: &BackendConfig,
) -> Result<String, BackendError> {
    let assertions = merged(source, extra);
    Ok(build_script(&assertions, QueryKind::Satisfiability, config)?.to_smtlib())
}

/// Full-model query over `extra` followed by `source`'s constraints.
pub fn full_model_script<S: ConstraintSet + ?Sized>(
    source: &S,
    extra: &[Term],
    config: &BackendConfig,
) -> Result<String, BackendError> {
    let assertions = merged(source, extra);
    Ok(build_script(&assertions, QueryKind::FullModel, config)?.to_smtlib())
}
