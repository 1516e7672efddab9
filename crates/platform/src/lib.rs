//! Battery readings for batwatch.
//!
//! This crate exposes a single, platform-agnostic view of the host battery:
//! a [`BatteryReading`] snapshot produced on demand by a [`BatterySensor`].
//! [`SystemBattery`] is the real sensor, backed by `starship-battery`, with
//! sysfs power-supply detection on Linux.
//!
//! # Example
//!
//! ```ignore
//! use batwatch_platform::{BatterySensor, SystemBattery};
//!
//! let mut sensor = SystemBattery::new()?;
//! let reading = sensor.read()?;
//! println!("Charge: {:.1}% ({})", reading.percent, reading.power_source());
//! ```

mod battery;
mod system;
mod types;

#[cfg(target_os = "linux")]
mod linux;

pub use battery::{BatteryReading, BatterySensor};
pub use system::SystemBattery;
pub use types::{ChargeState, PowerSource};
