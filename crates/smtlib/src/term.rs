use std::collections::BTreeMap;
use std::fmt;

use crate::sort::Sort;

/// A declared symbol: a name together with its fixed sort.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    pub name: String,
    pub sort: Sort,
}

impl Symbol {
    pub fn new(name: impl Into<String>, sort: Sort) -> Self {
        Self {
            name: name.into(),
            sort,
        }
    }
}

/// The same symbol name was found with two different sorts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolConflict {
    pub name: String,
    pub first: Sort,
    pub second: Sort,
}

impl fmt::Display for SymbolConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "symbol `{}` used with sort {} and sort {}",
            self.name, self.first, self.second
        )
    }
}

impl std::error::Error for SymbolConflict {}

/// SMT-LIB term (expression) representation.
///
/// Terms are immutable once built; every operation returns a new term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    // === Literals ===
    /// Boolean literal
    BoolLit(bool),
    /// Integer literal (unbounded)
    IntLit(i128),
    /// Bitvector literal with value and width
    BitVecLit(i128, u32),
    /// String literal (unescaped contents)
    StrLit(String),

    // === Variables ===
    /// Reference to a declared symbol
    Var(Symbol),
    /// Reference to a `let`-bound name (never declared)
    Local(String),

    // === Boolean operations ===
    /// Logical NOT
    Not(Box<Term>),
    /// Logical AND (n-ary)
    And(Vec<Term>),
    /// Logical OR (n-ary)
    Or(Vec<Term>),

    // === Core ===
    /// Equality: `(= a b)`
    Eq(Box<Term>, Box<Term>),
    /// If-then-else: `(ite cond then else)`
    Ite(Box<Term>, Box<Term>, Box<Term>),
    /// `(let ((x t) ...) body)`
    Let(Vec<(String, Term)>, Box<Term>),

    // === Integer arithmetic ===
    /// `(+ a b)`
    IntAdd(Box<Term>, Box<Term>),
    /// `(- a b)`
    IntSub(Box<Term>, Box<Term>),
    /// `(< a b)`
    IntLt(Box<Term>, Box<Term>),
    /// `(<= a b)`
    IntLe(Box<Term>, Box<Term>),
    /// `(> a b)`
    IntGt(Box<Term>, Box<Term>),
    /// `(>= a b)`
    IntGe(Box<Term>, Box<Term>),

    // === Bitvector comparison (unsigned) ===
    /// `(bvult a b)`
    BvULt(Box<Term>, Box<Term>),
    /// `(bvule a b)`
    BvULe(Box<Term>, Box<Term>),
    /// `(bvugt a b)`
    BvUGt(Box<Term>, Box<Term>),
    /// `(bvuge a b)`
    BvUGe(Box<Term>, Box<Term>),

    // === Strings ===
    /// `(str.++ a b ...)`
    StrConcat(Vec<Term>),
    /// `(str.len s)`
    StrLen(Box<Term>),
    /// `(str.substr s offset length)`
    StrSubstr(Box<Term>, Box<Term>, Box<Term>),
    /// `(str.replace s pattern replacement)`, first occurrence only
    StrReplace(Box<Term>, Box<Term>, Box<Term>),
    /// `(str.contains s sub)`
    StrContains(Box<Term>, Box<Term>),
    /// `(str.prefixof prefix s)`
    StrPrefixOf(Box<Term>, Box<Term>),
    /// `(str.suffixof suffix s)`
    StrSuffixOf(Box<Term>, Box<Term>),
    /// `(str.indexof s sub start)`
    StrIndexOf(Box<Term>, Box<Term>, Box<Term>),
    /// `(str.to_int s)`
    StrToInt(Box<Term>),
}

impl Term {
    /// Direct children, left to right.
    pub fn children(&self) -> Vec<&Term> {
        match self {
            Term::BoolLit(_)
            | Term::IntLit(_)
            | Term::BitVecLit(_, _)
            | Term::StrLit(_)
            | Term::Var(_)
            | Term::Local(_) => Vec::new(),

            Term::Not(a) | Term::StrLen(a) | Term::StrToInt(a) => vec![a.as_ref()],

            Term::And(ts) | Term::Or(ts) | Term::StrConcat(ts) => ts.iter().collect(),

            Term::Eq(a, b)
            | Term::IntAdd(a, b)
            | Term::IntSub(a, b)
            | Term::IntLt(a, b)
            | Term::IntLe(a, b)
            | Term::IntGt(a, b)
            | Term::IntGe(a, b)
            | Term::BvULt(a, b)
            | Term::BvULe(a, b)
            | Term::BvUGt(a, b)
            | Term::BvUGe(a, b)
            | Term::StrContains(a, b)
            | Term::StrPrefixOf(a, b)
            | Term::StrSuffixOf(a, b) => vec![a.as_ref(), b.as_ref()],

            Term::Ite(a, b, c)
            | Term::StrSubstr(a, b, c)
            | Term::StrReplace(a, b, c)
            | Term::StrIndexOf(a, b, c) => vec![a.as_ref(), b.as_ref(), c.as_ref()],

            Term::Let(bindings, body) => bindings
                .iter()
                .map(|(_, t)| t)
                .chain(std::iter::once(body.as_ref()))
                .collect(),
        }
    }

    /// Returns `true` for literals, symbols and let-bound names.
    pub fn is_atom(&self) -> bool {
        self.children().is_empty()
    }

    /// Returns `true` if the term infers to a bitvector sort.
    pub fn is_bv_valued(&self) -> bool {
        self.sort().is_some_and(|s| s.is_bitvec())
    }

    /// Returns `true` if the term is rooted at a strings-theory operator.
    pub fn is_string_op(&self) -> bool {
        matches!(
            self,
            Term::StrConcat(_)
                | Term::StrLen(_)
                | Term::StrSubstr(_, _, _)
                | Term::StrReplace(_, _, _)
                | Term::StrContains(_, _)
                | Term::StrPrefixOf(_, _)
                | Term::StrSuffixOf(_, _)
                | Term::StrIndexOf(_, _, _)
                | Term::StrToInt(_)
        )
    }

    /// Best-effort sort inference.
    ///
    /// Returns `None` only for let-bound names whose sort is not tracked.
    pub fn sort(&self) -> Option<Sort> {
        match self {
            Term::BoolLit(_) => Some(Sort::Bool),
            Term::IntLit(_) => Some(Sort::Int),
            Term::BitVecLit(_, width) => Some(Sort::BitVec(*width)),
            Term::StrLit(_) => Some(Sort::String),
            Term::Var(sym) => Some(sym.sort),
            Term::Local(_) => None,

            Term::Not(_)
            | Term::And(_)
            | Term::Or(_)
            | Term::Eq(_, _)
            | Term::IntLt(_, _)
            | Term::IntLe(_, _)
            | Term::IntGt(_, _)
            | Term::IntGe(_, _)
            | Term::BvULt(_, _)
            | Term::BvULe(_, _)
            | Term::BvUGt(_, _)
            | Term::BvUGe(_, _)
            | Term::StrContains(_, _)
            | Term::StrPrefixOf(_, _)
            | Term::StrSuffixOf(_, _) => Some(Sort::Bool),

            Term::Ite(_, then_branch, else_branch) => {
                then_branch.sort().or_else(|| else_branch.sort())
            }
            Term::Let(_, body) => body.sort(),

            Term::IntAdd(_, _)
            | Term::IntSub(_, _)
            | Term::StrLen(_)
            | Term::StrIndexOf(_, _, _)
            | Term::StrToInt(_) => Some(Sort::Int),

            Term::StrConcat(_) | Term::StrSubstr(_, _, _) | Term::StrReplace(_, _, _) => {
                Some(Sort::String)
            }
        }
    }

    /// Collect every declared symbol reachable from this term into `acc`.
    ///
    /// Fails if a name is already present in `acc` with another sort.
    pub fn collect_symbols(
        &self,
        acc: &mut BTreeMap<String, Sort>,
    ) -> Result<(), SymbolConflict> {
        let mut stack = vec![self];
        while let Some(term) = stack.pop() {
            if let Term::Var(sym) = term {
                match acc.get(&sym.name) {
                    Some(existing) if *existing != sym.sort => {
                        return Err(SymbolConflict {
                            name: sym.name.clone(),
                            first: *existing,
                            second: sym.sort,
                        });
                    }
                    Some(_) => {}
                    None => {
                        acc.insert(sym.name.clone(), sym.sort);
                    }
                }
            }
            stack.extend(term.children());
        }
        Ok(())
    }

    /// Free symbols of this term, deduplicated and sorted by name.
    pub fn free_symbols(&self) -> Result<Vec<Symbol>, SymbolConflict> {
        free_symbols_of(std::iter::once(self))
    }
}

/// Union of the free symbols of several terms, deduplicated and sorted by name.
pub fn free_symbols_of<'a>(
    terms: impl IntoIterator<Item = &'a Term>,
) -> Result<Vec<Symbol>, SymbolConflict> {
    let mut acc = BTreeMap::new();
    for term in terms {
        term.collect_symbols(&mut acc)?;
    }
    Ok(acc
        .into_iter()
        .map(|(name, sort)| Symbol { name, sort })
        .collect())
}
