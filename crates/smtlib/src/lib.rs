//! # symex-smt-smtlib
//!
//! SMT-LIB v2 building blocks for the translation backend: sorts, terms
//! (including the strings theory), commands and scripts, with `Display`
//! implementations producing solver-ready text.
//!
//! ```
//! use symex_smt_smtlib::command::Command;
//! use symex_smt_smtlib::script::Script;
//! use symex_smt_smtlib::sort::Sort;
//! use symex_smt_smtlib::term::{Symbol, Term};
//!
//! let s = Term::Var(Symbol::new("s", Sort::String));
//! let mut script = Script::new();
//! script.push(Command::DeclareFun("s".into(), Sort::String));
//! script.push(Command::Assert(Term::Eq(
//!     Box::new(s),
//!     Box::new(Term::StrLit("bar".into())),
//! )));
//! assert_eq!(
//!     script.to_smtlib(),
//!     "(declare-fun s () String)\n(assert (= s \"bar\"))\n"
//! );
//! ```

pub mod command;
pub mod dag;
mod formatter;
pub mod script;
pub mod sort;
pub mod term;

pub use term::{Symbol, SymbolConflict, Term, free_symbols_of};
