use std::path::Path;
use std::time::Duration;

use color_eyre::eyre::Result;

use crate::alarm::{Alerter, SoundAlarm};

pub async fn run(audio_path: &Path, seconds: u64) -> Result<()> {
    let mut alarm = SoundAlarm::new(audio_path)?;

    println!(
        "Playing {} for {}...",
        audio_path.display(),
        humantime::format_duration(Duration::from_secs(seconds))
    );
    alarm.start()?;

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(seconds)) => {}
        _ = tokio::signal::ctrl_c() => {}
    }

    alarm.stop();
    Ok(())
}
