//! Fan control: curve evaluation, sysfs actuation, and the stateful
//! controller that ties them together.
//!
//! The pieces are layered so each is testable on its own:
//!
//! - [`curve::evaluate`] is a pure step function over breakpoints
//! - [`sysfs::ActuatorWriter`] is the seam to the hardware interface
//! - [`fan::FanController`] holds the write-suppression state

pub mod curve;
pub mod fan;
pub mod sysfs;

pub use curve::{CurveBreakpoint, evaluate};
pub use fan::{FanController, MAX_LEVEL};
pub use sysfs::{ActuatorWriter, SysfsWriter};
