/*!

Debug-hook flags (spec.md §6 "Debug hooks") and the evaluation-request shape
(spec.md §4.6 "Configuration"). Both are small `Copy` structs threaded into
the few call sites that need them; their presence only gates `tracing`
events, never engine semantics.

*/

use enumflags2::{bitflags, BitFlags};

#[bitflags]
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DebugFlag {
    TraceReduction,
    TraceMatching,
    TraceConversion,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    flags: BitFlags<DebugFlag>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, flag: DebugFlag) -> Self {
        self.flags |= flag;
        self
    }

    #[inline(always)]
    pub fn enabled(&self, flag: DebugFlag) -> bool {
        self.flags.contains(flag)
    }
}

/// Which normal form a call to `eval` should compute.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Strategy {
    #[default]
    Whnf,
    Hnf,
    Snf,
}

/// An evaluation request: a strategy plus an optional positive step bound.
/// A zero bound returns the input unchanged. Positive bounds are currently
/// unsupported for every strategy — the engine logs a warning and returns
/// the input unchanged (spec.md §4.6, an acknowledged limitation rather than
/// a guarantee; see "Open questions" in spec.md §9).
#[derive(Clone, Copy, Debug, Default)]
pub struct EvalConfig {
    pub strategy: Strategy,
    pub steps: Option<u32>,
}

impl EvalConfig {
    pub fn new(strategy: Strategy) -> Self {
        EvalConfig { strategy, steps: None }
    }

    pub fn with_steps(strategy: Strategy, steps: u32) -> Self {
        EvalConfig { strategy, steps: Some(steps) }
    }
}
