use std::collections::HashMap;

use symex_smt_smtlib::command::Command;
use symex_smt_smtlib::sort::Sort;
use symex_smt_smtlib::term::{Symbol, Term};

use crate::error::BackendError;

/// A symbol introduced by a leaf operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Declaration {
    pub name: String,
    pub sort: Sort,
}

impl Declaration {
    pub fn new(name: impl Into<String>, sort: Sort) -> Self {
        Self {
            name: name.into(),
            sort,
        }
    }

    /// The term referring to this symbol.
    pub fn term(&self) -> Term {
        Term::Var(Symbol::new(self.name.clone(), self.sort))
    }

    /// `(declare-fun name () Sort)`
    pub fn to_command(&self) -> Command {
        Command::DeclareFun(self.name.clone(), self.sort)
    }
}

impl From<Symbol> for Declaration {
    fn from(sym: Symbol) -> Self {
        Self {
            name: sym.name,
            sort: sym.sort,
        }
    }
}

/// Per-pass translation state: the declarations introduced so far.
///
/// Create one context per translation pass and never share it between
/// concurrent passes. After an error the context must be discarded; pending
/// declarations are not rolled back.
#[derive(Debug, Default)]
pub struct TranslationContext {
    pending: Vec<Declaration>,
    sorts: HashMap<String, Sort>,
}

impl TranslationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration.
    ///
    /// Returns `Ok(true)` if the name is new, `Ok(false)` if it was already
    /// declared with the same sort, and an error if the sort differs.
    pub fn declare(&mut self, decl: Declaration) -> Result<bool, BackendError> {
        match self.sorts.get(&decl.name) {
            Some(existing) if *existing != decl.sort => Err(BackendError::SortConflict {
                name: decl.name,
                declared: *existing,
                requested: decl.sort,
            }),
            Some(_) => Ok(false),
            None => {
                tracing::trace!(name = %decl.name, sort = %decl.sort, "Declaring symbol");
                self.sorts.insert(decl.name.clone(), decl.sort);
                self.pending.push(decl);
                Ok(true)
            }
        }
    }

    /// Declarations in introduction order.
    pub fn pending(&self) -> &[Declaration] {
        &self.pending
    }

    pub fn sort_of(&self, name: &str) -> Option<Sort> {
        self.sorts.get(name).copied()
    }

    pub fn into_declarations(self) -> Vec<Declaration> {
        self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
