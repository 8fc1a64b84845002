//! # symex-smt-backend
//!
//! Translation of symbolic-execution expression trees into SMT-LIB queries.
//!
//! An [`Ast`] is translated into a [`Term`](symex_smt_smtlib::Term) by a
//! sealed dispatch over its [`Op`]. Symbols met along the way are recorded in
//! a per-pass [`TranslationContext`]. Translated constraints are then
//! assembled into satisfiability or full-model scripts.
//!
//! ## Usage
//!
//! ```
//! use symex_smt_backend::{Ast, Backend, Op, SmtLibBackend, TranslationContext};
//!
//! let backend = SmtLibBackend::new();
//! let mut ctx = TranslationContext::new();
//! let eq = Ast::op(Op::Eq, [Ast::string_s("s", 8), Ast::string_v("bar")]);
//! let constraints = vec![backend.translate(&eq, &mut ctx).unwrap()];
//!
//! let script = backend.full_model_script(&constraints, &[]).unwrap();
//! assert_eq!(
//!     script,
//!     "(set-logic ALL)\n\
//!      (set-option :produce-models true)\n\
//!      (declare-fun s () String)\n\
//!      (assert (= s \"bar\"))\n\
//!      (check-sat)\n\
//!      (get-model)\n"
//! );
//! ```
//!
//! Fully concrete string operations are evaluated directly by [`strings`].

pub mod ast;
pub mod backend;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod normalize;
pub mod script;
pub mod strings;

pub use ast::{Arg, Ast, Literal, Op, Tier};
pub use backend::{Backend, SmtLibBackend};
pub use config::BackendConfig;
pub use context::{Declaration, TranslationContext};
pub use error::BackendError;
pub use script::{ConstraintSet, QueryKind};
pub use strings::{BitVecValue, StringValue};
