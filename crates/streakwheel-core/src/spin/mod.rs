//! Spin gating: who may spin the wheel, and when.

mod gate;
mod shared;

pub use gate::{format_cooldown, GateSettings, SpinGate, SpinMode, SpinState, SpinStatus};
pub use shared::SharedSpinGate;
