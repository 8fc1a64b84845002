//! Subterm sharing for asserted terms.
//!
//! Compound subterms that occur more than once in a term are bound once with
//! `let` and referenced by name afterwards, which keeps the text of
//! translations with repeated string operations linear in the size of the DAG
//! rather than the size of the tree.
//!
//! Bindings are named `_def_N` in post-order of first occurrence, so the output
//! for a given term is always the same. Names that collide with a free symbol
//! of the term are skipped.

use std::collections::{HashMap, HashSet};

use crate::term::Term;

/// Rewrite `term` so that every repeated compound subterm is `let`-bound once.
///
/// Terms without repeated compound subterms are returned unchanged.
pub fn share_subterms(term: &Term) -> Term {
    let mut counts: HashMap<&Term, usize> = HashMap::new();
    let mut order: Vec<&Term> = Vec::new();
    count_occurrences(term, &mut counts, &mut order);

    let shared: Vec<&Term> = order
        .into_iter()
        .filter(|t| counts.get(t).copied().unwrap_or(0) > 1)
        .collect();
    if shared.is_empty() {
        return term.clone();
    }

    let taken = symbol_names(term);
    let mut names: HashMap<&Term, String> = HashMap::with_capacity(shared.len());
    let mut next = 0usize;
    for t in &shared {
        let name = loop {
            let candidate = format!("_def_{next}");
            next += 1;
            if !taken.contains(candidate.as_str()) {
                break candidate;
            }
        };
        names.insert(*t, name);
    }
    tracing::trace!(shared = shared.len(), "Sharing repeated subterms");

    let bindings: Vec<(String, Term)> = shared
        .iter()
        .map(|t| (names[t].clone(), rebuild(t, &mut |c| rewrite(c, &names))))
        .collect();

    let mut body = rewrite(term, &names);
    for binding in bindings.into_iter().rev() {
        body = Term::Let(vec![binding], Box::new(body));
    }
    body
}

/// Count compound subterms. A subterm is descended into only on its first
/// occurrence; `order` records first occurrences in post-order.
fn count_occurrences<'a>(
    term: &'a Term,
    counts: &mut HashMap<&'a Term, usize>,
    order: &mut Vec<&'a Term>,
) {
    if term.is_atom() {
        return;
    }
    if let Some(n) = counts.get_mut(term) {
        *n += 1;
        return;
    }
    counts.insert(term, 1);
    for child in term.children() {
        count_occurrences(child, counts, order);
    }
    order.push(term);
}

fn symbol_names(term: &Term) -> HashSet<&str> {
    let mut names = HashSet::new();
    let mut stack = vec![term];
    while let Some(t) = stack.pop() {
        match t {
            Term::Var(sym) => {
                names.insert(sym.name.as_str());
            }
            Term::Local(name) => {
                names.insert(name.as_str());
            }
            _ => {}
        }
        stack.extend(t.children());
    }
    names
}

fn rewrite(term: &Term, names: &HashMap<&Term, String>) -> Term {
    if let Some(name) = names.get(term) {
        return Term::Local(name.clone());
    }
    rebuild(term, &mut |c| rewrite(c, names))
}

/// Rebuild `term` with each direct child replaced by `f(child)`.
fn rebuild(term: &Term, f: &mut impl FnMut(&Term) -> Term) -> Term {
    let mut bx = |t: &Term| Box::new(f(t));
    match term {
        Term::BoolLit(_)
        | Term::IntLit(_)
        | Term::BitVecLit(_, _)
        | Term::StrLit(_)
        | Term::Var(_)
        | Term::Local(_) => term.clone(),

        Term::Not(a) => Term::Not(bx(a)),
        Term::StrLen(a) => Term::StrLen(bx(a)),
        Term::StrToInt(a) => Term::StrToInt(bx(a)),

        Term::And(ts) => Term::And(ts.iter().map(|t| *bx(t)).collect()),
        Term::Or(ts) => Term::Or(ts.iter().map(|t| *bx(t)).collect()),
        Term::StrConcat(ts) => Term::StrConcat(ts.iter().map(|t| *bx(t)).collect()),

        Term::Eq(a, b) => Term::Eq(bx(a), bx(b)),
        Term::IntAdd(a, b) => Term::IntAdd(bx(a), bx(b)),
        Term::IntSub(a, b) => Term::IntSub(bx(a), bx(b)),
        Term::IntLt(a, b) => Term::IntLt(bx(a), bx(b)),
        Term::IntLe(a, b) => Term::IntLe(bx(a), bx(b)),
        Term::IntGt(a, b) => Term::IntGt(bx(a), bx(b)),
        Term::IntGe(a, b) => Term::IntGe(bx(a), bx(b)),
        Term::BvULt(a, b) => Term::BvULt(bx(a), bx(b)),
        Term::BvULe(a, b) => Term::BvULe(bx(a), bx(b)),
        Term::BvUGt(a, b) => Term::BvUGt(bx(a), bx(b)),
        Term::BvUGe(a, b) => Term::BvUGe(bx(a), bx(b)),
        Term::StrContains(a, b) => Term::StrContains(bx(a), bx(b)),
        Term::StrPrefixOf(a, b) => Term::StrPrefixOf(bx(a), bx(b)),
        Term::StrSuffixOf(a, b) => Term::StrSuffixOf(bx(a), bx(b)),

        Term::Ite(a, b, c) => Term::Ite(bx(a), bx(b), bx(c)),
        Term::StrSubstr(a, b, c) => Term::StrSubstr(bx(a), bx(b), bx(c)),
        Term::StrReplace(a, b, c) => Term::StrReplace(bx(a), bx(b), bx(c)),
        Term::StrIndexOf(a, b, c) => Term::StrIndexOf(bx(a), bx(b), bx(c)),

        Term::Let(bindings, body) => Term::Let(
            bindings
                .iter()
                .map(|(name, t)| (name.clone(), *bx(t)))
                .collect(),
            bx(body),
        ),
    }
}
