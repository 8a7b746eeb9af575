#![allow(unused_imports)]
/*!

The stable external interface (spec.md §6): everything a surface parser, an
elaborator, a bidirectional type-checker, or a command shell built on top of
this engine needs, re-exported from one place. Everything reachable only
through `crate::core` is an implementation detail.

*/

pub use crate::core::binder::{lift, unbox, Binder, MBinder, TBox};
pub use crate::core::config::{Config, DebugFlag, EvalConfig, Strategy};
pub use crate::core::convert::{eq, eq_modulo};
pub use crate::core::error::{CommandError, CommandOutcome, CoreError, SourcePos};
pub use crate::core::meta::{
    exists, find, instantiate, new_internal_meta, new_user_meta, occurs, MetaKey, MetaName,
    MetaPtr, Metavariable,
};
pub use crate::core::normalize::{eval, hnf, snf, whnf};
pub use crate::core::symbol::{Rule, Symbol, SymbolPtr};
pub use crate::core::term::{apply, distinct_vars, head_and_args, to_var, unfold, EnvSlot, Term};
pub use crate::core::var::{Var, VarId};

/// `unset(m)`: whether `m`'s value cell is still empty (spec.md §4.7).
#[inline(always)]
pub fn unset(m: &MetaPtr) -> bool {
    m.unset()
}
