//! Backends turning engine expression trees into solver queries.
//!
//! The `Backend` trait is the seam used by the solver orchestration layer.
//! `SmtLibBackend` produces SMT-LIB text only and cannot decide
//! satisfiability itself; callers needing a verdict must feed its scripts to a
//! solving backend.

use symex_smt_smtlib::term::Term;

use crate::ast::Ast;
use crate::config::BackendConfig;
use crate::context::TranslationContext;
use crate::dispatch;
use crate::error::BackendError;
use crate::script::{self, ConstraintSet};

/// Trait abstracting over translation backends.
pub trait Backend {
    /// Human-readable backend name, used in logs and errors.
    fn name(&self) -> &'static str;

    /// Translate one expression tree, recording its declarations in `ctx`.
    fn translate(&self, ast: &Ast, ctx: &mut TranslationContext) -> Result<Term, BackendError>;

    /// Translate a sequence of roots in order, stopping at the first failure.
    fn translate_all(
        &self,
        roots: &[Ast],
        ctx: &mut TranslationContext,
    ) -> Result<Vec<Term>, BackendError> {
        roots.iter().map(|ast| self.translate(ast, ctx)).collect()
    }

    /// SMT-LIB text asking whether `extra` and `source`'s constraints hold together.
    fn satisfiability_script(
        &self,
        source: &dyn ConstraintSet,
        extra: &[Term],
    ) -> Result<String, BackendError>;

    /// Like [`Backend::satisfiability_script`], also requesting a model.
    fn full_model_script(
        &self,
        source: &dyn ConstraintSet,
        extra: &[Term],
    ) -> Result<String, BackendError>;

    /// Decide satisfiability of `extra` and `source`'s constraints.
    fn satisfiable(&self, source: &dyn ConstraintSet, extra: &[Term])
    -> Result<bool, BackendError>;
}

/// Text-only SMT-LIB backend.
///
/// Immutable after construction; share it freely across threads and give
/// every translation pass its own [`TranslationContext`].
#[derive(Debug, Clone, Default)]
pub struct SmtLibBackend {
    config: BackendConfig,
}

impl SmtLibBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend after validating `config`.
    pub fn with_config(config: BackendConfig) -> Result<Self, BackendError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}

impl Backend for SmtLibBackend {
    fn name(&self) -> &'static str {
        "smtlib"
    }

    fn translate(&self, ast: &Ast, ctx: &mut TranslationContext) -> Result<Term, BackendError> {
        dispatch::translate(ast, ctx)
    }

    fn satisfiability_script(
        &self,
        source: &dyn ConstraintSet,
        extra: &[Term],
    ) -> Result<String, BackendError> {
        script::satisfiability_script(source, extra, &self.config)
    }

    fn full_model_script(
        &self,
        source: &dyn ConstraintSet,
        extra: &[Term],
    ) -> Result<String, BackendError> {
        script::full_model_script(source, extra, &self.config)
    }

    fn satisfiable(
        &self,
        _source: &dyn ConstraintSet,
        _extra: &[Term],
    ) -> Result<bool, BackendError> {
        tracing::debug!(backend = self.name(), "Refusing satisfiability query");
        Err(BackendError::BackendUnavailable(format!(
            "the {} backend only emits query text; use a solving backend",
            self.name()
        )))
    }
}
