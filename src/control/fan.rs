//! Stateful fan controller
//!
//! Combines the curve evaluator with an actuator writer and remembers the
//! last level it successfully wrote so unchanged targets cost no I/O.
//!
//! State machine per instance:
//!
//! ```text
//! Unknown ──write ok──▶ Written(level) ──target change──▶ Written(other)
//!    ▲                        │    ▲└──── suppressed self-loop
//!    └────────write failed────┘
//! ```
//!
//! A failed write resets the state to Unknown so the next cycle retries
//! even if the computed level is unchanged. Failure is never sticky.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::curve::{self, CurveBreakpoint};
use super::sysfs::ActuatorWriter;

/// Resolution of the actuator: levels are integers in 0..=MAX_LEVEL.
pub const MAX_LEVEL: u32 = 255;

/// Token written to the enable path to switch the actuator into manual mode.
const MANUAL_MODE: &str = "1";

pub struct FanController<W: ActuatorWriter> {
    curve: Vec<CurveBreakpoint>,
    control_path: Option<PathBuf>,
    enable_path: Option<PathBuf>,
    writer: W,

    /// Last level successfully written; None means the hardware state is
    /// unknown and the next computed level must be written unconditionally.
    last_level: Option<u32>,
}

impl<W: ActuatorWriter> FanController<W> {
    pub fn new(
        curve: Vec<CurveBreakpoint>,
        control_path: Option<PathBuf>,
        enable_path: Option<PathBuf>,
        writer: W,
    ) -> Self {
        Self {
            curve,
            control_path,
            enable_path,
            writer,
            last_level: None,
        }
    }

    /// The level most recently written with success, if any.
    pub fn last_level(&self) -> Option<u32> {
        self.last_level
    }

    /// Switch the actuator into manual control mode.
    ///
    /// Some drivers silently revert to automatic mode, so this is also
    /// re-asserted before every level change.
    pub fn assert_manual_mode(&mut self) -> bool {
        self.writer.write(self.enable_path.as_deref(), MANUAL_MODE)
    }

    /// Convert a speed percentage to an integer actuator level.
    ///
    /// Ceiling rounding: the controller never under-drives a requested
    /// speed through integer truncation.
    pub fn level_for_speed(speed_percent: f64) -> u32 {
        let raw = (speed_percent / 100.0 * MAX_LEVEL as f64).ceil();
        (raw.max(0.0) as u32).min(MAX_LEVEL)
    }

    /// Evaluate the curve for `temperature` and drive the actuator.
    ///
    /// Called once per poll interval. All failure modes are non-fatal:
    /// a failed mode write is a warning, a failed level write clears the
    /// remembered level so the next cycle retries.
    pub fn adjust(&mut self, temperature: f64) {
        if self.curve.is_empty() || self.control_path.is_none() {
            debug!("fan curve empty or control path unset, skipping adjustment");
            return;
        }

        let target_speed = curve::evaluate(&self.curve, temperature);
        let level = Self::level_for_speed(target_speed);

        if Some(level) == self.last_level {
            debug!(
                "cpu temp {temperature:.1}C: target level {level} unchanged, suppressing write"
            );
            return;
        }

        info!(
            "cpu temp {temperature:.1}C: setting fan to {target_speed:.0}% (level {level})"
        );

        if !self.assert_manual_mode() {
            warn!("failed to assert manual fan mode, level write may be ignored");
        }

        if self.writer.write(self.control_path.as_deref(), &level.to_string()) {
            self.last_level = Some(level);
        } else {
            // Hardware state is now unknown; force a retry next cycle.
            self.last_level = None;
        }
    }
}
