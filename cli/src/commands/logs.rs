use std::os::unix::process::CommandExt;
use std::path::Path;

use color_eyre::eyre::Result;

pub fn run(log_file: &Path, lines: usize, follow: bool) -> Result<()> {
    if !log_file.exists() {
        println!("No log file found at {}", log_file.display());
        println!("The log is created the first time the monitor runs.");
        return Ok(());
    }

    if follow {
        let err = std::process::Command::new("tail")
            .args(["-f", "-n", &lines.to_string()])
            .arg(log_file)
            .exec();
        return Err(err.into());
    }

    std::process::Command::new("tail")
        .args(["-n", &lines.to_string()])
        .arg(log_file)
        .status()?;

    Ok(())
}
