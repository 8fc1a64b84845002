//! Input expression trees handed over by the symbolic-execution engine.
//!
//! An [`Ast`] node is an operation from the closed [`Op`] vocabulary applied to
//! an ordered list of arguments, each either a nested node or a concrete
//! [`Literal`]. Nodes are immutable once built.

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::BackendError;

/// Which handler tier translates an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Takes literal arguments directly; may introduce a symbol.
    Leaf,
    /// Combines already-translated children; never has side effects.
    Raw,
}

/// The operation vocabulary shared with the expression-tree producer.
///
/// Wire names are the engine's operation names; `Op::from_str` maps them back.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum Op {
    // === Leaves ===
    StringV,
    StringS,
    BoolV,
    BoolS,
    #[strum(serialize = "BVV")]
    BvV,
    #[strum(serialize = "BVS")]
    BvS,

    // === Arithmetic ===
    #[strum(serialize = "__add__")]
    Add,
    #[strum(serialize = "__sub__")]
    Sub,
    #[strum(serialize = "__mul__")]
    Mul,
    #[strum(serialize = "__floordiv__")]
    FloorDiv,
    #[strum(serialize = "__mod__")]
    Mod,

    // === Comparison ===
    #[strum(serialize = "__eq__")]
    Eq,
    #[strum(serialize = "__ne__")]
    Ne,
    #[strum(serialize = "__lt__")]
    Lt,
    #[strum(serialize = "__le__")]
    Le,
    #[strum(serialize = "__gt__")]
    Gt,
    #[strum(serialize = "__ge__")]
    Ge,

    // === Boolean ===
    Or,
    And,
    Not,
    If,

    // === Bitwise / bitvector structure ===
    #[strum(serialize = "__and__")]
    BitAnd,
    #[strum(serialize = "__or__")]
    BitOr,
    #[strum(serialize = "__xor__")]
    BitXor,
    #[strum(serialize = "__invert__")]
    Invert,
    #[strum(serialize = "__lshift__")]
    Shl,
    #[strum(serialize = "__rshift__")]
    Shr,
    LShR,
    Extract,
    Concat,
    ZeroExt,
    SignExt,
    Reverse,

    // === Strings ===
    StrConcat,
    StrSubstr,
    StrExtract,
    StrLen,
    StrReplace,
    StrContains,
    StrPrefixOf,
    StrSuffixOf,
    StrIndexOf,
    StrToInt,
}

impl Op {
    /// Engine-side name of the operation.
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn tier(self) -> Tier {
        match self {
            Op::StringV | Op::StringS | Op::BoolV | Op::BoolS | Op::BvV | Op::BvS => Tier::Leaf,
            _ => Tier::Raw,
        }
    }

    /// Look up an engine operation name.
    ///
    /// Names outside the vocabulary are reported as unsupported operations.
    pub fn parse(name: &str) -> Result<Op, BackendError> {
        Op::from_str(name).map_err(|_| BackendError::unsupported(name))
    }
}

/// A concrete argument value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Str(String),
    Int(i128),
    Bool(bool),
}

/// One argument of an [`Ast`] node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arg {
    Node(Ast),
    Lit(Literal),
}

impl From<Ast> for Arg {
    fn from(node: Ast) -> Self {
        Arg::Node(node)
    }
}

impl From<Literal> for Arg {
    fn from(lit: Literal) -> Self {
        Arg::Lit(lit)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Lit(Literal::Str(s.to_string()))
    }
}

impl From<i128> for Arg {
    fn from(n: i128) -> Self {
        Arg::Lit(Literal::Int(n))
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Lit(Literal::Bool(b))
    }
}

/// An operation node of a symbolic expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ast {
    pub op: Op,
    pub args: Vec<Arg>,
}

impl Ast {
    pub fn new(op: Op, args: Vec<Arg>) -> Self {
        Self { op, args }
    }

    /// Build a node from an engine operation name.
    pub fn from_name(name: &str, args: Vec<Arg>) -> Result<Self, BackendError> {
        Ok(Self::new(Op::parse(name)?, args))
    }

    /// Build a node from an operation and argument-convertible values.
    pub fn op(op: Op, args: impl IntoIterator<Item = impl Into<Arg>>) -> Self {
        Self::new(op, args.into_iter().map(Into::into).collect())
    }

    /// Concrete string: `StringV(value, length)`.
    pub fn string_v(value: &str) -> Self {
        let len = value.chars().count() as i128;
        Self::new(Op::StringV, vec![value.into(), len.into()])
    }

    /// String symbol: `StringS(name, length)`.
    pub fn string_s(name: &str, length: i128) -> Self {
        Self::new(Op::StringS, vec![name.into(), length.into()])
    }

    pub fn bool_v(value: bool) -> Self {
        Self::new(Op::BoolV, vec![value.into()])
    }

    pub fn bool_s(name: &str) -> Self {
        Self::new(Op::BoolS, vec![name.into()])
    }

    /// Concrete bitvector: `BVV(value, width)`.
    pub fn bvv(value: i128, width: u32) -> Self {
        Self::new(Op::BvV, vec![value.into(), i128::from(width).into()])
    }

    /// Bitvector symbol: `BVS(name, width)`.
    pub fn bvs(name: &str, width: u32) -> Self {
        Self::new(Op::BvS, vec![name.into(), i128::from(width).into()])
    }

    /// Returns `true` if any leaf of the tree introduces a symbol.
    pub fn is_symbolic(&self) -> bool {
        matches!(self.op, Op::StringS | Op::BoolS | Op::BvS)
            || self.args.iter().any(|arg| match arg {
                Arg::Node(node) => node.is_symbolic(),
                Arg::Lit(_) => false,
            })
    }
}
