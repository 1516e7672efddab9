//! Battery reading snapshot and the sensor trait.

use std::time::Duration;

use color_eyre::eyre::Result;

use crate::types::PowerSource;

/// A single battery snapshot.
///
/// Readings are taken on demand and carry no identity beyond the moment they
/// were taken.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatteryReading {
    /// Current charge level as a percentage (0-100).
    pub percent: f32,

    /// Whether external power is connected.
    pub power_plugged: bool,

    /// Estimated time until empty. `None` when unknown, which is always the
    /// case while plugged in.
    pub time_remaining: Option<Duration>,
}

impl BatteryReading {
    pub fn new(percent: f32, power_plugged: bool, time_remaining: Option<Duration>) -> Self {
        Self {
            percent,
            power_plugged,
            time_remaining,
        }
    }

    /// Where the host is currently drawing power from.
    pub fn power_source(&self) -> PowerSource {
        if self.power_plugged {
            PowerSource::Ac
        } else {
            PowerSource::Battery
        }
    }

    /// Remaining time in whole seconds, if known.
    pub fn seconds_remaining(&self) -> Option<u64> {
        self.time_remaining.map(|d| d.as_secs())
    }
}

/// Something that can produce battery readings.
///
/// An `Err` means no reading is available right now, for example because the
/// host has no battery or the OS refused the query.
pub trait BatterySensor {
    /// Take a fresh reading.
    fn read(&mut self) -> Result<BatteryReading>;
}
