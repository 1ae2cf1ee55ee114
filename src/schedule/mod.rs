//! Time-based deferrals: cancellable timers, debounce windows and the
//! one-time readiness gate.

pub(crate) mod debounce;
pub(crate) mod gate;
pub(crate) mod timers;
