//! Low battery watch loop.
//!
//! The monitor polls the battery on a slow cadence while things are healthy.
//! Once charge drops to the battery threshold it starts the alarm and switches
//! to a fast cadence until external power comes back or charge recovers, then
//! stops the alarm and falls back to the slow cadence. Reaching the charge
//! threshold while plugged in ends monitoring.

mod time;

pub use time::format_remaining;

use std::time::Duration;

use batwatch_platform::{BatteryReading, BatterySensor};
use color_eyre::eyre::Report;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::alarm::{AlarmError, Alerter};

/// Resolved, immutable monitor settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorConfig {
    /// Charge percentage at or below which the alarm sounds.
    pub battery_threshold: f32,
    /// Charge percentage at or above which, while plugged in, monitoring ends.
    pub charge_threshold: f32,
    /// Wait between polls while healthy.
    pub poll_interval: Duration,
    /// Wait between polls while the alarm is sounding.
    pub fast_poll_interval: Duration,
}

impl MonitorConfig {
    pub fn is_low(&self, reading: &BatteryReading) -> bool {
        reading.percent <= self.battery_threshold
    }

    pub fn is_charged(&self, reading: &BatteryReading) -> bool {
        reading.power_plugged && reading.percent >= self.charge_threshold
    }

    /// Whether an already sounding alarm should keep going.
    pub fn holds_alarm(&self, reading: &BatteryReading) -> bool {
        !reading.power_plugged && self.is_low(reading)
    }
}

/// Why the monitor stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Plugged in and charged past the charge threshold.
    ChargeComplete,
    /// A shutdown signal arrived.
    Shutdown,
    /// The sensor stopped producing readings.
    SensorUnavailable,
}

impl Exit {
    pub fn is_success(&self) -> bool {
        matches!(self, Exit::ChargeComplete | Exit::Shutdown)
    }
}

/// Failures before the loop starts. Nothing has been sounded yet.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("Could not get battery information: {0}")]
    SensorUnavailable(Report),

    #[error("Error initializing audio: {0}")]
    Audio(#[from] AlarmError),
}

pub struct Monitor<S, A> {
    config: MonitorConfig,
    sensor: S,
    alerter: A,
    alarm_active: bool,
}

impl<S: BatterySensor, A: Alerter> Monitor<S, A> {
    /// Take the startup reading, then build the alerter with `load_alerter`.
    ///
    /// The sensor is checked first so a host without a battery fails before
    /// any audio device is touched.
    pub fn start<F>(
        config: MonitorConfig,
        mut sensor: S,
        load_alerter: F,
    ) -> Result<Self, StartError>
    where
        F: FnOnce() -> Result<A, AlarmError>,
    {
        let reading = sensor.read().map_err(StartError::SensorUnavailable)?;

        info!(
            charge = reading.percent,
            remaining = %format_remaining(reading.time_remaining),
            source = %reading.power_source(),
            battery_threshold = config.battery_threshold,
            charge_threshold = config.charge_threshold,
            poll_interval = %humantime::format_duration(config.poll_interval),
            "Monitoring started"
        );

        let alerter = load_alerter()?;

        Ok(Self {
            config,
            sensor,
            alerter,
            alarm_active: false,
        })
    }

    /// Watch the battery until charge completes, the sensor goes away or
    /// `shutdown` is cancelled.
    ///
    /// Sensor failures are logged and reported through [`Exit`]; only a
    /// failure to start the alarm is returned as an error.
    pub async fn run(&mut self, shutdown: &CancellationToken) -> Result<Exit, AlarmError> {
        loop {
            let Some(mut reading) = self.read() else {
                return Ok(Exit::SensorUnavailable);
            };

            if self.config.is_charged(&reading) {
                info!(
                    charge = reading.percent,
                    "Charge threshold reached, monitoring finished"
                );
                return Ok(Exit::ChargeComplete);
            }

            if self.config.is_low(&reading) {
                warn!(
                    charge = reading.percent,
                    time_left = %format_remaining(reading.time_remaining),
                    plugged = reading.power_plugged,
                    "Battery low"
                );
                self.raise()?;
            }

            if self.alarm_active {
                while self.config.holds_alarm(&reading) {
                    if !self.pause(self.config.fast_poll_interval, shutdown).await {
                        return Ok(self.shut_down());
                    }

                    reading = match self.read() {
                        Some(reading) => reading,
                        None => {
                            self.silence();
                            return Ok(Exit::SensorUnavailable);
                        }
                    };
                    debug!(
                        charge = reading.percent,
                        plugged = reading.power_plugged,
                        "Alarm check"
                    );
                }

                self.silence();
                info!(
                    charge = reading.percent,
                    plugged = reading.power_plugged,
                    "Power restored, alarm stopped"
                );
            }

            if !self.pause(self.config.poll_interval, shutdown).await {
                return Ok(self.shut_down());
            }
        }
    }

    fn read(&mut self) -> Option<BatteryReading> {
        match self.sensor.read() {
            Ok(reading) => Some(reading),
            Err(e) => {
                error!(error = %e, "Could not get battery information");
                None
            }
        }
    }

    fn raise(&mut self) -> Result<(), AlarmError> {
        if !self.alarm_active {
            self.alerter.start()?;
            self.alarm_active = true;
        }
        Ok(())
    }

    fn silence(&mut self) {
        if self.alarm_active {
            self.alerter.stop();
            self.alarm_active = false;
        }
    }

    /// Returns false if shutdown was requested before `period` elapsed.
    async fn pause(&self, period: Duration, shutdown: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => false,
            _ = tokio::time::sleep(period) => true,
        }
    }

    fn shut_down(&mut self) -> Exit {
        self.silence();
        info!("Shutting down gracefully");
        Exit::Shutdown
    }

    #[cfg(test)]
    pub fn alarm_active(&self) -> bool {
        self.alarm_active
    }

    #[cfg(test)]
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    #[cfg(test)]
    pub fn alerter(&self) -> &A {
        &self.alerter
    }
}
