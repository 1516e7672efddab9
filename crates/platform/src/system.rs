use std::time::Duration;

use color_eyre::eyre::{eyre, Result};
use starship_battery::units::ratio::percent;
use starship_battery::units::time::second;
use starship_battery::Manager;

use crate::battery::{BatteryReading, BatterySensor};
use crate::types::ChargeState;

/// The host's first battery, read through the OS.
pub struct SystemBattery {
    manager: Manager,
}

impl SystemBattery {
    pub fn new() -> Result<Self> {
        let manager = Manager::new()?;
        Ok(Self { manager })
    }

    fn ac_online() -> Option<bool> {
        #[cfg(target_os = "linux")]
        {
            crate::linux::ac_online()
        }
        #[cfg(not(target_os = "linux"))]
        {
            None
        }
    }
}

/// Decide the plugged-in flag from the OS supply flag when there is one,
/// else from the charge state.
///
/// A draining battery always reports `Discharging`, so an `Unknown` state is
/// taken as external power holding the charge (e.g. a charge limit).
fn resolve_power_plugged(ac_online: Option<bool>, state: ChargeState) -> bool {
    ac_online
        .or_else(|| state.plugged_in())
        .unwrap_or(true)
}

impl BatterySensor for SystemBattery {
    fn read(&mut self) -> Result<BatteryReading> {
        let mut battery = self
            .manager
            .batteries()?
            .next()
            .ok_or_else(|| eyre!("No battery found"))??;

        self.manager.refresh(&mut battery)?;

        let state = ChargeState::from(battery.state());
        let power_plugged = resolve_power_plugged(Self::ac_online(), state);

        let time_remaining = if power_plugged {
            None
        } else {
            battery
                .time_to_empty()
                .map(|t| Duration::from_secs(t.get::<second>() as u64))
        };

        Ok(BatteryReading {
            percent: battery.state_of_charge().get::<percent>(),
            power_plugged,
            time_remaining,
        })
    }
}
