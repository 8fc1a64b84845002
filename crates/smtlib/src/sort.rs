/// SMT-LIB sort (type) representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sort {
    /// Boolean sort
    Bool,
    /// Mathematical integer sort
    Int,
    /// Unicode string sort (SMT-LIB 2.6 strings theory)
    String,
    /// Fixed-width bitvector: `(_ BitVec n)`
    BitVec(u32),
}

impl Sort {
    /// Returns `true` for `(_ BitVec n)` sorts.
    pub fn is_bitvec(&self) -> bool {
        matches!(self, Sort::BitVec(_))
    }
}
