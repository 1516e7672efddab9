use batwatch_platform::{BatteryReading, BatterySensor, SystemBattery};
use color_eyre::eyre::{Result, WrapErr};
use serde_json::json;

use crate::config::UserConfig;
use crate::monitor::{format_remaining, MonitorConfig};

pub fn run(config: &UserConfig, as_json: bool) -> Result<()> {
    let monitor_config = config.monitor_config()?;
    let mut sensor = SystemBattery::new().wrap_err("Could not access battery information")?;
    let reading = sensor
        .read()
        .wrap_err("Could not get battery information")?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&to_json(&reading, &monitor_config))?);
        return Ok(());
    }

    println!("Charge: {:.1}%", reading.percent);
    println!("Power source: {}", reading.power_source());
    println!("Time remaining: {}", format_remaining(reading.time_remaining));
    println!();
    println!("Alarm at or below: {:.2}%", monitor_config.battery_threshold);
    println!("Stop when plugged in at: {:.2}%", monitor_config.charge_threshold);
    if monitor_config.holds_alarm(&reading) {
        println!("Status: LOW - the alarm would be sounding");
    }

    Ok(())
}

fn to_json(reading: &BatteryReading, config: &MonitorConfig) -> serde_json::Value {
    json!({
        "percent": reading.percent,
        "power_plugged": reading.power_plugged,
        "power_source": reading.power_source().label(),
        "seconds_remaining": reading.seconds_remaining(),
        "time_remaining": format_remaining(reading.time_remaining),
        "battery_threshold": config.battery_threshold,
        "charge_threshold": config.charge_threshold,
        "low": config.holds_alarm(reading),
    })
}
