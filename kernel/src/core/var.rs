/*!

Kernel-managed variable identities (spec.md §4.1, "Equality of variables").

A bound variable is never compared by name. Every call to `Binder::open`/
`MBinder::open_many` mints a fresh [`VarId`] from a process-wide counter; two
[`Var`]s are equal iff they carry the same id, regardless of their (purely
cosmetic) name hint. This is what makes the capture-avoidance argument in
§4.1 "Rationale" go through: two openings of the same binder can never be
confused with each other because they produce different ids, and a variable
can never be mistaken for one captured by an unrelated binder.

*/

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use kernel_abs::IString;

/// A kernel-managed variable identity. Freshly allocated on every binder
/// opening; never reused.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u64);

impl VarId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        VarId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A bound variable occurrence: an identity plus a display name hint.
///
/// `name_hint` is purely cosmetic — it is what a pretty-printer shows and
/// what `Binder::open` uses as a base for picking a fresh hint, but it plays
/// no role in equality, hashing, or matching.
#[derive(Clone, Eq)]
pub struct Var {
    id: VarId,
    name_hint: IString,
}

impl Var {
    /// Mints a fresh variable identity. Used internally by `Binder::open`/
    /// `MBinder::open_many`, and exposed so a caller building a term bottom-up
    /// (an elaborator translating a surface `λx. body`, for instance) can
    /// obtain a variable to bind before any binder exists to open.
    pub fn fresh(name_hint: IString) -> Self {
        Var { id: VarId::fresh(), name_hint }
    }

    #[inline(always)]
    pub fn id(&self) -> VarId {
        self.id
    }

    #[inline(always)]
    pub fn name_hint(&self) -> IString {
        self.name_hint
    }
}

impl PartialEq for Var {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl std::hash::Hash for Var {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.name_hint, self.id)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name_hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_vars_are_distinct_even_with_same_hint() {
        let x = Var::fresh(kernel_abs::intern("x"));
        let y = Var::fresh(kernel_abs::intern("x"));
        assert_ne!(x, y);
    }
}
