//! Operation dispatch: translation of [`Ast`] nodes into SMT-LIB [`Term`]s.
//!
//! Operations are handled in two tiers:
//!
//! - **Leaf** operations (`StringV`, `StringS`, `BoolV`, `BoolS`, `BVV`, `BVS`)
//!   read their literal arguments directly. Symbol-introducing leaves return
//!   the [`Declaration`] alongside the term; [`translate`] records it in the
//!   [`TranslationContext`].
//! - **Raw** operations combine children that were already translated,
//!   depth-first and left to right. They are pure.
//!
//! Bitvector symbols are emulated as unbounded integers and bitvector
//! literals are kept as literals. Addition and subtraction are integer
//! operations. Other binary operators and `ite` branches pass their operands
//! through [`normalize`] so that bitvector values facing integer-domain
//! operands become integers. Bitwise and structural bitvector operations, multiplication and
//! division have no translation and fail with `UnsupportedOperation`.

use symex_smt_smtlib::sort::Sort;
use symex_smt_smtlib::term::Term;

use crate::ast::{Arg, Ast, Literal, Op, Tier};
use crate::context::{Declaration, TranslationContext};
use crate::error::BackendError;
use crate::normalize::{normalize, normalize_position, to_int};

/// Widest bitvector accepted by `BVV`/`BVS`.
pub const MAX_BV_WIDTH: u32 = 128;

/// Last code point of the SMT-LIB 2.6 string alphabet.
pub const MAX_STRING_CHAR: char = '\u{2FFFF}';

/// Whether the SMT-LIB translation has a handler for `op`.
pub fn supports(op: Op) -> bool {
    !matches!(
        op,
        Op::Mul
            | Op::FloorDiv
            | Op::Mod
            | Op::BitAnd
            | Op::BitOr
            | Op::BitXor
            | Op::Invert
            | Op::Shl
            | Op::Shr
            | Op::LShR
            | Op::Extract
            | Op::Concat
            | Op::ZeroExt
            | Op::SignExt
            | Op::Reverse
    )
}

/// Translate a node and all of its descendants.
///
/// Declarations introduced by symbol leaves are appended to `ctx` as they are
/// met. On error nothing is returned and `ctx` must be discarded.
///
/// Translation recurses once per tree level, so nesting depth is bounded by
/// the caller's stack. Engine path conditions are wide rather than deep; run
/// on a thread with a larger stack if trees nest many thousands of levels.
pub fn translate(ast: &Ast, ctx: &mut TranslationContext) -> Result<Term, BackendError> {
    tracing::trace!(op = %ast.op, args = ast.args.len(), "Translating node");
    if !supports(ast.op) {
        tracing::warn!(op = %ast.op, "No SMT-LIB translation for operation");
        return Err(BackendError::unsupported(ast.op.name()));
    }
    match ast.op.tier() {
        Tier::Leaf => {
            let (term, decl) = translate_leaf(ast.op, &ast.args)?;
            if let Some(decl) = decl {
                ctx.declare(decl)?;
            }
            Ok(term)
        }
        Tier::Raw => {
            let children = ast
                .args
                .iter()
                .map(|arg| translate_arg(arg, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            translate_raw(ast.op, children)
        }
    }
}

/// Translate one argument of a raw operation.
///
/// Bare literals (e.g. the width argument of `StrLen`) become SMT-LIB literals.
fn translate_arg(arg: &Arg, ctx: &mut TranslationContext) -> Result<Term, BackendError> {
    match arg {
        Arg::Node(node) => translate(node, ctx),
        Arg::Lit(Literal::Str(s)) => Ok(Term::StrLit(s.clone())),
        Arg::Lit(Literal::Int(n)) => Ok(Term::IntLit(*n)),
        Arg::Lit(Literal::Bool(b)) => Ok(Term::BoolLit(*b)),
    }
}

// ---------------------------------------------------------------------------
// Leaf handlers
// ---------------------------------------------------------------------------

/// Translate a leaf operation from its literal arguments.
///
/// The declaration, if any, is returned rather than recorded.
pub fn translate_leaf(
    op: Op,
    args: &[Arg],
) -> Result<(Term, Option<Declaration>), BackendError> {
    match op {
        Op::StringV => {
            arity_between(op, args.len(), 1, 2)?;
            let content = str_arg(op, &args[0])?;
            if let Some(c) = content.chars().find(|c| *c > MAX_STRING_CHAR) {
                return Err(BackendError::malformed(
                    op.name(),
                    format!("character U+{:X} is outside the SMT-LIB string alphabet", c as u32),
                ));
            }
            Ok((Term::StrLit(content.to_string()), None))
        }
        Op::StringS => {
            arity_between(op, args.len(), 1, 2)?;
            let decl = Declaration::new(symbol_arg(op, &args[0])?, Sort::String);
            Ok((decl.term(), Some(decl)))
        }
        Op::BoolV => {
            arity_between(op, args.len(), 1, 1)?;
            match &args[0] {
                Arg::Lit(Literal::Bool(b)) => Ok((Term::BoolLit(*b), None)),
                other => Err(BackendError::malformed(
                    op.name(),
                    format!("expected a boolean, got {other:?}"),
                )),
            }
        }
        Op::BoolS => {
            arity_between(op, args.len(), 1, 1)?;
            let decl = Declaration::new(symbol_arg(op, &args[0])?, Sort::Bool);
            Ok((decl.term(), Some(decl)))
        }
        Op::BvV => {
            arity_between(op, args.len(), 2, 2)?;
            let value = int_arg(op, &args[0])?;
            let width = width_arg(op, &args[1])?;
            Ok((Term::BitVecLit(value, width), None))
        }
        Op::BvS => {
            arity_between(op, args.len(), 2, 2)?;
            let name = symbol_arg(op, &args[0])?;
            width_arg(op, &args[1])?;
            let decl = Declaration::new(name, Sort::Int);
            Ok((decl.term(), Some(decl)))
        }
        _ => Err(BackendError::unsupported(op.name())),
    }
}

fn str_arg(op: Op, arg: &Arg) -> Result<&str, BackendError> {
    match arg {
        Arg::Lit(Literal::Str(s)) => Ok(s),
        other => Err(BackendError::malformed(
            op.name(),
            format!("expected a string, got {other:?}"),
        )),
    }
}

fn int_arg(op: Op, arg: &Arg) -> Result<i128, BackendError> {
    match arg {
        Arg::Lit(Literal::Int(n)) => Ok(*n),
        other => Err(BackendError::malformed(
            op.name(),
            format!("expected an integer, got {other:?}"),
        )),
    }
}

fn width_arg(op: Op, arg: &Arg) -> Result<u32, BackendError> {
    let width = int_arg(op, arg)?;
    match u32::try_from(width) {
        Ok(w) if (1..=MAX_BV_WIDTH).contains(&w) => Ok(w),
        _ => Err(BackendError::malformed(
            op.name(),
            format!("bitvector width {width} outside 1..={MAX_BV_WIDTH}"),
        )),
    }
}

fn symbol_arg(op: Op, arg: &Arg) -> Result<String, BackendError> {
    let name = str_arg(op, arg)?;
    if !is_valid_symbol(name) {
        return Err(BackendError::malformed(
            op.name(),
            format!("`{name}` is not a valid symbol name"),
        ));
    }
    Ok(name.to_string())
}

const RESERVED: &[&str] = &[
    "par", "NUMERAL", "DECIMAL", "STRING", "_", "!", "as", "let", "exists", "forall", "match",
    "true", "false",
];

/// Whether `name` can be emitted as an unquoted SMT-LIB simple symbol.
///
/// Names starting with `.` or `@` are reserved for solvers.
pub fn is_valid_symbol(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };
    if first.is_ascii_digit() || first == '.' || first == '@' || RESERVED.contains(&name) {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || "~!@$%^&*_-+=<>.?/".contains(c))
}

// ---------------------------------------------------------------------------
// Raw handlers
// ---------------------------------------------------------------------------

/// Combine already-translated children under `op`.
pub fn translate_raw(op: Op, children: Vec<Term>) -> Result<Term, BackendError> {
    match op {
        // --- Arithmetic ---
        // Always integer arithmetic: bitvector symbols are emulated as `Int`.
        Op::Add | Op::Sub => {
            let mut operands = at_least(op, children, 2)?.into_iter().map(to_int);
            let mut acc = operands
                .next()
                .ok_or_else(|| arity_error(op, "at least 2".to_string(), 0))?;
            for next in operands {
                let (l, r) = (Box::new(acc), Box::new(next));
                acc = if op == Op::Add {
                    Term::IntAdd(l, r)
                } else {
                    Term::IntSub(l, r)
                };
            }
            Ok(acc)
        }

        // --- Comparison ---
        Op::Eq | Op::Ne => {
            let [a, b] = exact::<2>(op, children)?;
            let (a, b) = normalize(a, b);
            let eq = Term::Eq(Box::new(a), Box::new(b));
            Ok(if op == Op::Eq {
                eq
            } else {
                Term::Not(Box::new(eq))
            })
        }
        Op::Lt | Op::Le | Op::Gt | Op::Ge => {
            let [a, b] = exact::<2>(op, children)?;
            let (a, b) = normalize(a, b);
            let bv = both_bitvec(&a, &b);
            let (a, b) = (Box::new(a), Box::new(b));
            Ok(match (op, bv) {
                (Op::Lt, true) => Term::BvULt(a, b),
                (Op::Le, true) => Term::BvULe(a, b),
                (Op::Gt, true) => Term::BvUGt(a, b),
                (_, true) => Term::BvUGe(a, b),
                (Op::Lt, false) => Term::IntLt(a, b),
                (Op::Le, false) => Term::IntLe(a, b),
                (Op::Gt, false) => Term::IntGt(a, b),
                (_, false) => Term::IntGe(a, b),
            })
        }

        // --- Boolean ---
        Op::Or => Ok(Term::Or(at_least(op, children, 1)?)),
        Op::And => Ok(Term::And(at_least(op, children, 1)?)),
        Op::Not => {
            let [a] = exact::<1>(op, children)?;
            Ok(Term::Not(Box::new(a)))
        }
        Op::If => {
            let [c, t, e] = exact::<3>(op, children)?;
            let (t, e) = normalize(t, e);
            Ok(Term::Ite(Box::new(c), Box::new(t), Box::new(e)))
        }

        // --- Strings ---
        Op::StrConcat => Ok(Term::StrConcat(at_least(op, children, 1)?)),
        Op::StrSubstr => {
            // (start, end, s) with an inclusive end
            let [start, end, s] = exact::<3>(op, children)?;
            let start = normalize_position(start);
            let end = normalize_position(end);
            let count = match (&start, &end) {
                (Term::IntLit(a), Term::IntLit(b)) => {
                    Term::IntLit(b.saturating_sub(*a).saturating_add(1))
                }
                _ => Term::IntAdd(
                    Box::new(Term::IntSub(Box::new(end), Box::new(start.clone()))),
                    Box::new(Term::IntLit(1)),
                ),
            };
            Ok(Term::StrSubstr(Box::new(s), Box::new(start), Box::new(count)))
        }
        Op::StrExtract => {
            // (start, count, s)
            let [start, count, s] = exact::<3>(op, children)?;
            Ok(Term::StrSubstr(
                Box::new(s),
                Box::new(normalize_position(start)),
                Box::new(normalize_position(count)),
            ))
        }
        Op::StrLen => {
            let s = first_of(op, children, 1, 2)?;
            Ok(Term::StrLen(Box::new(s)))
        }
        Op::StrReplace => {
            let [s, pattern, replacement] = exact::<3>(op, children)?;
            Ok(Term::StrReplace(
                Box::new(s),
                Box::new(pattern),
                Box::new(replacement),
            ))
        }
        Op::StrContains => {
            let [s, sub] = exact::<2>(op, children)?;
            Ok(Term::StrContains(Box::new(s), Box::new(sub)))
        }
        Op::StrPrefixOf => {
            let [prefix, s] = exact::<2>(op, children)?;
            Ok(Term::StrPrefixOf(Box::new(prefix), Box::new(s)))
        }
        Op::StrSuffixOf => {
            let [suffix, s] = exact::<2>(op, children)?;
            Ok(Term::StrSuffixOf(Box::new(suffix), Box::new(s)))
        }
        Op::StrIndexOf => {
            // (s, sub[, width]); the search always starts at 0
            arity_between(op, children.len(), 2, 3)?;
            let mut it = children.into_iter();
            let (Some(s), Some(sub)) = (it.next(), it.next()) else {
                return Err(BackendError::unsupported(op.name()));
            };
            Ok(Term::StrIndexOf(
                Box::new(s),
                Box::new(sub),
                Box::new(Term::IntLit(0)),
            ))
        }
        Op::StrToInt => {
            let s = first_of(op, children, 1, 2)?;
            Ok(Term::StrToInt(Box::new(s)))
        }

        // --- Leaves are not combinators; the rest has no translation ---
        Op::StringV
        | Op::StringS
        | Op::BoolV
        | Op::BoolS
        | Op::BvV
        | Op::BvS
        | Op::Mul
        | Op::FloorDiv
        | Op::Mod
        | Op::BitAnd
        | Op::BitOr
        | Op::BitXor
        | Op::Invert
        | Op::Shl
        | Op::Shr
        | Op::LShR
        | Op::Extract
        | Op::Concat
        | Op::ZeroExt
        | Op::SignExt
        | Op::Reverse => Err(BackendError::unsupported(op.name())),
    }
}

fn both_bitvec(a: &Term, b: &Term) -> bool {
    a.is_bv_valued() && b.is_bv_valued()
}

fn arity_error(op: Op, expected: String, found: usize) -> BackendError {
    BackendError::Arity {
        op: op.name().to_string(),
        expected,
        found,
    }
}

fn arity_between(op: Op, found: usize, min: usize, max: usize) -> Result<(), BackendError> {
    if (min..=max).contains(&found) {
        return Ok(());
    }
    let expected = if min == max {
        min.to_string()
    } else {
        format!("{min} to {max}")
    };
    Err(arity_error(op, expected, found))
}

fn exact<const N: usize>(op: Op, children: Vec<Term>) -> Result<[Term; N], BackendError> {
    let found = children.len();
    children
        .try_into()
        .map_err(|_| arity_error(op, N.to_string(), found))
}

fn at_least(op: Op, children: Vec<Term>, min: usize) -> Result<Vec<Term>, BackendError> {
    if children.len() < min {
        return Err(arity_error(op, format!("at least {min}"), children.len()));
    }
    Ok(children)
}

/// First child of an operation whose trailing arguments (widths) are ignored.
fn first_of(op: Op, children: Vec<Term>, min: usize, max: usize) -> Result<Term, BackendError> {
    arity_between(op, children.len(), min, max)?;
    children
        .into_iter()
        .next()
        .ok_or_else(|| arity_error(op, min.to_string(), 0))
}
