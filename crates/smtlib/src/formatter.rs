//! SMT-LIB2 text formatting for AST types.
//!
//! Implements `Display` for [`Sort`], [`Term`], [`Command`], and [`Script`],
//! producing SMT-LIB 2.6 output (including the strings theory) that solvers
//! such as Z3 and CVC5 accept.

use std::fmt;

use crate::command::Command;
use crate::script::Script;
use crate::sort::Sort;
use crate::term::Term;

// ---------------------------------------------------------------------------
// Sort
// ---------------------------------------------------------------------------

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Bool => write!(f, "Bool"),
            Sort::Int => write!(f, "Int"),
            Sort::String => write!(f, "String"),
            Sort::BitVec(width) => write!(f, "(_ BitVec {width})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Term
// ---------------------------------------------------------------------------

/// Format a bitvector literal. Negative values are converted to their
/// two's-complement unsigned representation for the given bit-width.
fn fmt_bv_lit(value: i128, width: u32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let bits = value as u128;
    let unsigned = if width >= 128 {
        bits
    } else {
        bits & ((1u128 << width) - 1)
    };
    write!(f, "(_ bv{unsigned} {width})")
}

/// Format a string literal.
///
/// `"` is doubled; anything outside printable ASCII, and `\` itself, is
/// written as a `\u{..}` escape so the solver never sees a stray escape.
/// Solvers only accept escapes up to `\u{2ffff}`; callers reject wider
/// characters before building the literal.
fn fmt_str_lit(value: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "\"")?;
    for c in value.chars() {
        match c {
            '"' => write!(f, "\"\"")?,
            '\\' => write!(f, "\\u{{5c}}")?,
            ' '..='~' => write!(f, "{c}")?,
            _ => write!(f, "\\u{{{:x}}}", c as u32)?,
        }
    }
    write!(f, "\"")
}

/// Write a binary SMT-LIB operator: `(op lhs rhs)`.
fn fmt_binop(op: &str, lhs: &Term, rhs: &Term, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({op} {lhs} {rhs})")
}

/// Write a unary SMT-LIB operator: `(op arg)`.
fn fmt_unop(op: &str, arg: &Term, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({op} {arg})")
}

/// Write an n-ary operator: `(op t1 t2 ...)`.
fn fmt_nary(op: &str, terms: &[Term], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({op}")?;
    for t in terms {
        write!(f, " {t}")?;
    }
    write!(f, ")")
}

/// Write let-bindings: `((x term) (y term) ...)`.
fn fmt_let_bindings(bindings: &[(String, Term)], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "(")?;
    for (i, (name, term)) in bindings.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "({name} {term})")?;
    }
    write!(f, ")")
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // --- Literals ---
            Term::BoolLit(true) => write!(f, "true"),
            Term::BoolLit(false) => write!(f, "false"),
            Term::IntLit(n) => {
                if *n < 0 {
                    // SMT-LIB represents negative integers as `(- N)`
                    write!(f, "(- {})", n.unsigned_abs())
                } else {
                    write!(f, "{n}")
                }
            }
            Term::BitVecLit(value, width) => fmt_bv_lit(*value, *width, f),
            Term::StrLit(value) => fmt_str_lit(value, f),

            // --- Variables ---
            Term::Var(sym) => write!(f, "{}", sym.name),
            Term::Local(name) => write!(f, "{name}"),

            // --- Boolean operations ---
            Term::Not(inner) => fmt_unop("not", inner, f),
            Term::And(terms) => match terms.as_slice() {
                [] => write!(f, "true"),
                [single] => write!(f, "{single}"),
                _ => fmt_nary("and", terms, f),
            },
            Term::Or(terms) => match terms.as_slice() {
                [] => write!(f, "false"),
                [single] => write!(f, "{single}"),
                _ => fmt_nary("or", terms, f),
            },

            // --- Core ---
            Term::Eq(lhs, rhs) => fmt_binop("=", lhs, rhs, f),
            Term::Ite(cond, then_branch, else_branch) => {
                write!(f, "(ite {cond} {then_branch} {else_branch})")
            }
            Term::Let(bindings, body) => {
                write!(f, "(let ")?;
                fmt_let_bindings(bindings, f)?;
                write!(f, " {body})")
            }

            // --- Integer arithmetic ---
            Term::IntAdd(a, b) => fmt_binop("+", a, b, f),
            Term::IntSub(a, b) => fmt_binop("-", a, b, f),
            Term::IntLt(a, b) => fmt_binop("<", a, b, f),
            Term::IntLe(a, b) => fmt_binop("<=", a, b, f),
            Term::IntGt(a, b) => fmt_binop(">", a, b, f),
            Term::IntGe(a, b) => fmt_binop(">=", a, b, f),

            // --- Bitvector ---
            Term::BvULt(a, b) => fmt_binop("bvult", a, b, f),
            Term::BvULe(a, b) => fmt_binop("bvule", a, b, f),
            Term::BvUGt(a, b) => fmt_binop("bvugt", a, b, f),
            Term::BvUGe(a, b) => fmt_binop("bvuge", a, b, f),

            // --- Strings ---
            Term::StrConcat(terms) => match terms.as_slice() {
                [] => write!(f, "\"\""),
                [single] => write!(f, "{single}"),
                _ => fmt_nary("str.++", terms, f),
            },
            Term::StrLen(s) => fmt_unop("str.len", s, f),
            Term::StrSubstr(s, offset, len) => write!(f, "(str.substr {s} {offset} {len})"),
            Term::StrReplace(s, pattern, replacement) => {
                write!(f, "(str.replace {s} {pattern} {replacement})")
            }
            Term::StrContains(s, sub) => fmt_binop("str.contains", s, sub, f),
            Term::StrPrefixOf(prefix, s) => fmt_binop("str.prefixof", prefix, s, f),
            Term::StrSuffixOf(suffix, s) => fmt_binop("str.suffixof", suffix, s, f),
            Term::StrIndexOf(s, sub, start) => write!(f, "(str.indexof {s} {sub} {start})"),
            Term::StrToInt(s) => fmt_unop("str.to_int", s, f),
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetLogic(logic) => write!(f, "(set-logic {logic})"),
            Command::SetOption(key, value) => write!(f, "(set-option :{key} {value})"),
            Command::DeclareFun(name, sort) => write!(f, "(declare-fun {name} () {sort})"),
            Command::Assert(term) => write!(f, "(assert {term})"),
            Command::CheckSat => write!(f, "(check-sat)"),
            Command::GetModel => write!(f, "(get-model)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.commands().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{cmd}")?;
        }
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
