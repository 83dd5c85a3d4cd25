/// Exit decision engine
///
/// Pure functions only: no clock, no I/O. Callers inject the calendar date.
mod exit;
mod lockdown;
mod types;

pub use exit::ExitPolicy;
pub use lockdown::LockdownWindow;
pub use types::{ExitContext, ExitDecision, ExitReason, Tier, TierFlags};
