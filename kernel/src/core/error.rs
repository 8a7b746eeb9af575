/*!

Error kinds the core distinguishes (spec.md §7).

Most failure modes in this engine are not errors at all: a rule that fails
to match simply yields the next candidate (§7 "Match failure", never
surfaced), and `eq_modulo` returning `false` is an ordinary result, not a
thrown error. `CoreError` exists for the handful of failures that *are*
surfaced to a caller — metavariable name collisions and double
instantiation, and adding a rule to a constant symbol. Following the
teacher's own style for this kind of internal error (see
`mod2_lib::core::sort::kind::KindError`), this is a hand-written enum with a
manual `Display`/`std::error::Error` impl rather than a derive-macro error
crate; "Programmer error" conditions (pattern/env placeholders outside
LHS/RHS context, `to_var` on a non-variable) remain `panic!`/`assert!`, not
`CoreError` variants, because they indicate a bug rather than a recoverable
condition.

*/

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// `new_user_meta` called with a name that already exists.
    MetaNameExists(String),
    /// `instantiate` called on a metavariable that already has a value.
    MetaAlreadyInstantiated,
    /// `add_rule` called on a symbol declared `is_constant`.
    AddRuleToConstant(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::MetaNameExists(name) => {
                write!(f, "a metavariable named `{name}` already exists")
            }
            CoreError::MetaAlreadyInstantiated => {
                write!(f, "metavariable is already instantiated")
            }
            CoreError::AddRuleToConstant(name) => {
                write!(f, "cannot add a rewrite rule to constant symbol `{name}`")
            }
        }
    }
}

impl std::error::Error for CoreError {}

/// A source position placeholder for the command-handler boundary (spec.md
/// §6, §7 "Command processing error"). The concrete protocol (command
/// kinds, positions) belongs to the external command shell; the core only
/// fixes the shape a driver's result type would have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourcePos {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    pub position: Option<SourcePos>,
    pub message: String,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{}:{}: {}", pos.line, pos.column, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for CommandError {}

/// The result shape an external command handler would return: either a new
/// state or a `CommandError`.
pub type CommandOutcome<T> = Result<T, CommandError>;
