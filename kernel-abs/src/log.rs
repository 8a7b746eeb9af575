/*!

Re-exports the logging backend so the rest of the workspace never names
`tracing` directly, the way `mod2-abs`'s `log` module hides its backend behind
a small set of macros. Unlike the teacher's module we don't wrap `tracing`'s
macros in our own — there's only one consumer (the engine) and one backend —
but keeping the re-export here means a future swap stays a one-file change.

*/

pub use tracing::{debug, error, info, span, trace, warn, Level};
