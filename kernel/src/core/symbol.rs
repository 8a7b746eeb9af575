/*!

Symbols and rewrite rules (spec.md §3 "Symbol"/"Rewrite rule", §6 "Symbol
registry operations").

A `Symbol` is a shared handle: two occurrences refer to the same symbol iff
their handles are the same `Rc` allocation (invariant 3, checked via
`Rc::ptr_eq`). The teacher (`mod2_lib::api::symbol::Symbol`) gets this same
sharing property from a raw `*mut Symbol` behind `unsafe impl Send + Sync`;
we get it from an ordinary `Rc`, trading the teacher's hand-rolled GC arena
for the standard library's reference counting — a deliberate simplification
recorded in `DESIGN.md`, since this engine has no garbage collector and no
cross-thread sharing to support (spec.md §5).

*/

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use kernel_abs::IString;

use crate::core::term::{EnvSlot, Term};

pub type SymbolPtr = Rc<Symbol>;

pub struct Symbol {
    name: IString,
    path: IString,
    is_constant: bool,
    /// Display-only arity hint; the real arity of a symbol is determined by
    /// its declared type, not tracked here.
    display_arity: u32,
    ty: RefCell<Term>,
    rules: RefCell<Vec<Rc<Rule>>>,
}

impl Symbol {
    /// Creates a constant symbol (spec.md §3 invariant 5: `rules` stays empty).
    pub fn new_constant(name: IString, path: IString, display_arity: u32, ty: Term) -> SymbolPtr {
        Rc::new(Symbol {
            name,
            path,
            is_constant: true,
            display_arity,
            ty: RefCell::new(ty),
            rules: RefCell::new(Vec::new()),
        })
    }

    /// Creates a definable symbol that may later have rewrite rules attached.
    pub fn new_definable(name: IString, path: IString, display_arity: u32, ty: Term) -> SymbolPtr {
        Rc::new(Symbol {
            name,
            path,
            is_constant: false,
            display_arity,
            ty: RefCell::new(ty),
            rules: RefCell::new(Vec::new()),
        })
    }

    #[inline(always)]
    pub fn name(&self) -> IString {
        self.name
    }

    #[inline(always)]
    pub fn path(&self) -> IString {
        self.path
    }

    #[inline(always)]
    pub fn is_constant(&self) -> bool {
        self.is_constant
    }

    #[inline(always)]
    pub fn display_arity(&self) -> u32 {
        self.display_arity
    }

    pub fn ty(&self) -> Term {
        self.ty.borrow().clone()
    }

    pub fn set_type(&self, ty: Term) {
        *self.ty.borrow_mut() = ty;
    }

    /// Appends a rewrite rule to this symbol. Forbidden on constant symbols
    /// (spec.md §3 invariant 5, §7).
    pub fn add_rule(&self, rule: Rule) -> Result<(), crate::core::error::CoreError> {
        if self.is_constant {
            return Err(crate::core::error::CoreError::AddRuleToConstant(self.name.to_string()));
        }
        self.rules.borrow_mut().push(Rc::new(rule));
        Ok(())
    }

    /// Rules attached to this symbol, in declaration order.
    pub fn rules(&self) -> Vec<Rc<Rule>> {
        self.rules.borrow().clone()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.path, self.name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A rewrite rule attached to a symbol (spec.md §3 "Rewrite rule").
///
/// `rhs` is a plain `Term` template built using ordinary constructors plus
/// `Term::TEnv(EnvSlot::Unfilled(i), e)` nodes wherever matched pattern
/// variable `i` is used; `rhs_arity` is the number of distinct slot indices
/// the template references. Firing a rule (see `crate::core::matcher`)
/// substitutes the template's `TEnv` nodes with the matched environment, as
/// if `rhs` were the multi-binder spec.md §3 describes — see `DESIGN.md` for
/// why we don't wrap it in a literal `MBinder`.
pub struct Rule {
    pub lhs: Vec<Term>,
    pub rhs: Term,
    pub rhs_arity: usize,
}

impl Rule {
    pub fn new(lhs: Vec<Term>, rhs: Term, rhs_arity: usize) -> Rule {
        Rule { lhs, rhs, rhs_arity }
    }

    #[inline(always)]
    pub fn arity(&self) -> usize {
        self.lhs.len()
    }
}

#[allow(dead_code)]
pub(crate) fn env_slot_unfilled(i: usize) -> EnvSlot {
    EnvSlot::Unfilled(i)
}
