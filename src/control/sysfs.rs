//! Actuator write path
//!
//! Hardware writes go through the [`ActuatorWriter`] trait so the fan
//! controller can be exercised against a mock. The real implementation
//! writes textual tokens to sysfs attribute files.

use std::fs;
use std::path::Path;

use tracing::{debug, error};

/// Write access to the hardware control interface.
///
/// `write` signals failure through its return value, never by panicking
/// or returning an error type: a missing path, a permission problem and
/// any other I/O failure all collapse to `false` so callers apply one
/// uniform branch.
pub trait ActuatorWriter: Send {
    fn write(&mut self, path: Option<&Path>, value: &str) -> bool;
}

/// Writes values to sysfs attribute files (hwmon pwm, cooling_device, ...)
#[derive(Debug, Default)]
pub struct SysfsWriter;

impl ActuatorWriter for SysfsWriter {
    fn write(&mut self, path: Option<&Path>, value: &str) -> bool {
        let Some(path) = path else {
            debug!("no sysfs path configured, skipping write");
            return false;
        };

        match fs::write(path, value) {
            Ok(()) => {
                debug!("wrote '{}' to {}", value, path.display());
                true
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                error!("sysfs path not found: {}", path.display());
                false
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                error!(
                    "permission denied writing '{}' to {} (check hwmon group membership or udev rules)",
                    value,
                    path.display()
                );
                false
            }
            Err(e) => {
                error!("failed to write '{}' to {}: {e}", value, path.display());
                false
            }
        }
    }
}

/// Read a sysfs attribute file and trim the trailing newline.
pub fn read_trimmed(path: &Path) -> std::io::Result<String> {
    fs::read_to_string(path).map(|s| s.trim().to_string())
}
