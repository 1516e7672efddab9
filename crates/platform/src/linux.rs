//! sysfs power-supply detection.

use std::fs;
use std::path::Path;

const POWER_SUPPLY_PATH: &str = "/sys/class/power_supply";

/// Whether a mains or USB supply is online.
///
/// Returns `None` when the host exposes no such supply at all, so the caller
/// can fall back to the battery's own charge state.
pub(crate) fn ac_online() -> Option<bool> {
    ac_online_in(Path::new(POWER_SUPPLY_PATH))
}

fn ac_online_in(power_supply: &Path) -> Option<bool> {
    let entries = fs::read_dir(power_supply).ok()?;
    let mut found_supply = false;

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(kind) = fs::read_to_string(path.join("type")) else {
            continue;
        };
        if !matches!(kind.trim(), "Mains" | "USB") {
            continue;
        }
        let Ok(online) = fs::read_to_string(path.join("online")) else {
            continue;
        };
        found_supply = true;
        if online.trim() == "1" {
            return Some(true);
        }
    }

    found_supply.then_some(false)
}
