//! Operand sort reconciliation for binary operators.
//!
//! String lengths and indices are unbounded integers in the strings theory,
//! while the engine's concrete numbers are fixed-width bitvector literals.
//! `(= (str.len s) (_ bv5 32))` is ill-sorted, so a bitvector-valued operand
//! facing an integer-domain operand is rewritten to the integer with the same
//! signed value. No other coercion is performed.
//!
//! Bitvector symbols are declared `Int` and arithmetic is integer arithmetic,
//! so the only bitvector-valued terms the dispatcher builds are literals and
//! `ite`s whose branches are both bitvector-valued.

use symex_smt_smtlib::sort::Sort;
use symex_smt_smtlib::term::Term;

/// Reconcile the sorts of a binary operator's operands.
///
/// If exactly one side is bitvector-valued and the other side is rooted at a
/// string operation or has sort `Int`, the bitvector side is replaced in place
/// by its integer reading (see [`to_int`]). Otherwise both operands are
/// returned unchanged. Swapping the arguments swaps the result.
pub fn normalize(left: Term, right: Term) -> (Term, Term) {
    if left.is_bv_valued() && in_int_domain(&right) {
        let int = to_int(left.clone());
        tracing::trace!(%left, %int, "Normalized bitvector operand");
        return (int, right);
    }
    if right.is_bv_valued() && in_int_domain(&left) {
        let int = to_int(right.clone());
        tracing::trace!(%right, %int, "Normalized bitvector operand");
        return (left, int);
    }
    (left, right)
}

/// Reconcile an integer position argument of a string operation.
///
/// Offsets and lengths of `str.substr` face the enclosing string operation
/// rather than a sibling operand, so they are always read as integers.
pub fn normalize_position(position: Term) -> Term {
    if !position.is_bv_valued() {
        return position;
    }
    let int = to_int(position.clone());
    tracing::trace!(%position, %int, "Normalized string position");
    int
}

/// Integer reading of a term.
///
/// Bitvector literals become `IntLit(signed value)` and `ite` branches are
/// converted recursively. Every other term is returned as is.
pub fn to_int(term: Term) -> Term {
    match term {
        Term::BitVecLit(value, width) => Term::IntLit(signed_value(value, width)),
        Term::Ite(c, t, e) => Term::Ite(c, Box::new(to_int(*t)), Box::new(to_int(*e))),
        other => other,
    }
}

/// Whether a term belongs to the unbounded-integer emulation domain.
fn in_int_domain(term: &Term) -> bool {
    !term.is_bv_valued() && (term.is_string_op() || term.sort() == Some(Sort::Int))
}

/// Two's-complement signed reading of `value` truncated to `width` bits.
pub(crate) fn signed_value(value: i128, width: u32) -> i128 {
    if width == 0 {
        return 0;
    }
    if width >= 128 {
        return value;
    }
    let bits = (value as u128) & ((1u128 << width) - 1);
    if (bits >> (width - 1)) & 1 == 1 {
        bits as i128 - (1i128 << width)
    } else {
        bits as i128
    }
}
