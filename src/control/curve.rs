//! Temperature-to-speed breakpoint curve

use serde::{Deserialize, Serialize};

/// One step of the control curve: at `temperature` and above, run the fan
/// at `speed` percent (until the next breakpoint takes over).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveBreakpoint {
    /// Temperature threshold in Celsius
    pub temperature: f64,

    /// Fan speed percentage (0-100)
    pub speed: f64,
}

/// Map a temperature to a target speed percentage.
///
/// The curve must be sorted ascending by temperature (enforced at config
/// load). The result is the speed of the highest breakpoint whose
/// temperature does not exceed the input - a step function, not
/// interpolation. Below the first breakpoint, and for an empty curve, the
/// result is 0.
pub fn evaluate(curve: &[CurveBreakpoint], temperature: f64) -> f64 {
    let mut target = 0.0;

    for point in curve {
        if temperature >= point.temperature {
            target = point.speed;
        } else {
            // Sorted input: everything past here is above the reading.
            break;
        }
    }

    target
}
