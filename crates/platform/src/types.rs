//! Shared types for battery readings.

use std::fmt;

/// Battery charging state as reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargeState {
    /// Battery is actively charging
    Charging,
    /// Battery is discharging (on battery power)
    Discharging,
    /// Battery is full
    Full,
    /// State cannot be determined
    #[default]
    Unknown,
}

impl ChargeState {
    /// Returns a human-readable label for the charge state.
    pub fn label(&self) -> &'static str {
        match self {
            ChargeState::Charging => "Charging",
            ChargeState::Discharging => "On Battery",
            ChargeState::Full => "Full",
            ChargeState::Unknown => "Unknown",
        }
    }

    /// Whether external power is connected, if the state says so either way.
    pub fn plugged_in(&self) -> Option<bool> {
        match self {
            ChargeState::Charging | ChargeState::Full => Some(true),
            ChargeState::Discharging => Some(false),
            ChargeState::Unknown => None,
        }
    }
}

impl fmt::Display for ChargeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<starship_battery::State> for ChargeState {
    fn from(state: starship_battery::State) -> Self {
        match state {
            starship_battery::State::Charging => ChargeState::Charging,
            starship_battery::State::Discharging => ChargeState::Discharging,
            starship_battery::State::Empty => ChargeState::Discharging,
            starship_battery::State::Full => ChargeState::Full,
            _ => ChargeState::Unknown,
        }
    }
}

/// Where the host draws power from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerSource {
    Ac,
    Battery,
}

impl PowerSource {
    pub fn label(&self) -> &'static str {
        match self {
            PowerSource::Ac => "AC",
            PowerSource::Battery => "Battery",
        }
    }
}

impl fmt::Display for PowerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_state_labels() {
        assert_eq!(ChargeState::Charging.label(), "Charging");
        assert_eq!(ChargeState::Discharging.label(), "On Battery");
        assert_eq!(ChargeState::Full.label(), "Full");
        assert_eq!(ChargeState::Unknown.label(), "Unknown");
    }

    #[test]
    fn test_charge_state_plugged_in() {
        assert_eq!(ChargeState::Charging.plugged_in(), Some(true));
        assert_eq!(ChargeState::Full.plugged_in(), Some(true));
        assert_eq!(ChargeState::Discharging.plugged_in(), Some(false));
        assert_eq!(ChargeState::Unknown.plugged_in(), None);
    }

    #[test]
    fn test_battery_state_conversion() {
        assert_eq!(
            ChargeState::from(starship_battery::State::Charging),
            ChargeState::Charging
        );
        assert_eq!(
            ChargeState::from(starship_battery::State::Discharging),
            ChargeState::Discharging
        );
        assert_eq!(
            ChargeState::from(starship_battery::State::Full),
            ChargeState::Full
        );
        assert_eq!(
            ChargeState::from(starship_battery::State::Empty),
            ChargeState::Discharging
        );
        assert_eq!(
            ChargeState::from(starship_battery::State::Unknown),
            ChargeState::Unknown
        );
    }

    #[test]
    fn test_power_source_labels() {
        assert_eq!(PowerSource::Ac.to_string(), "AC");
        assert_eq!(PowerSource::Battery.to_string(), "Battery");
    }
}
