use crate::sort::Sort;
use crate::term::Term;

/// A command of a query script.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `(set-logic LOGIC)`
    SetLogic(String),
    /// `(set-option :key value)`
    SetOption(String, String),
    /// `(declare-fun name () sort)`: a nullary function, i.e. a free symbol.
    DeclareFun(String, Sort),
    /// `(assert term)`
    Assert(Term),
    /// `(check-sat)`
    CheckSat,
    /// `(get-model)`
    GetModel,
}

impl Command {
    /// `(set-option :produce-models true)`
    pub fn produce_models() -> Self {
        Command::SetOption("produce-models".to_string(), "true".to_string())
    }
}
