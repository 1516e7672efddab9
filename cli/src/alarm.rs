//! Audible alarm backed by rodio.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum AlarmError {
    #[error("Failed to open audio output: {0}")]
    Output(String),

    #[error("Audio file not found or unreadable at {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode audio file {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
}

/// Starts and stops the alert sound.
///
/// The monitor only calls these on alarm transitions, but implementations
/// should tolerate a redundant `stop`.
pub trait Alerter {
    fn start(&mut self) -> Result<(), AlarmError>;
    fn stop(&mut self);
}

/// Loops a pre-loaded sound file on the default output device.
pub struct SoundAlarm {
    stream: OutputStream,
    path: PathBuf,
    sound: Arc<[u8]>,
    sink: Option<Sink>,
}

impl SoundAlarm {
    /// Load the sound file and open the default output device.
    pub fn new(path: &Path) -> Result<Self, AlarmError> {
        let sound = load_sound(path)?;

        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AlarmError::Output(e.to_string()))?;
        stream.log_on_drop(false);

        debug!(path = %path.display(), bytes = sound.len(), "Alarm sound loaded");

        Ok(Self {
            stream,
            path: path.to_path_buf(),
            sound,
            sink: None,
        })
    }

    pub fn is_playing(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }
}

impl Alerter for SoundAlarm {
    fn start(&mut self) -> Result<(), AlarmError> {
        if self.is_playing() {
            return Ok(());
        }

        let source = Decoder::new(Cursor::new(Arc::clone(&self.sound))).map_err(|e| {
            AlarmError::Decode {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source.repeat_infinite());
        sink.play();
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

impl Drop for SoundAlarm {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read the whole sound file into memory and make sure rodio can decode it.
pub fn load_sound(path: &Path) -> Result<Arc<[u8]>, AlarmError> {
    let bytes = fs::read(path).map_err(|source| AlarmError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let sound: Arc<[u8]> = bytes.into();

    Decoder::new(Cursor::new(Arc::clone(&sound))).map_err(|e| AlarmError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(sound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("batwatch-alarm-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// 16-bit mono PCM WAV of silence.
    fn silent_wav(samples: u32) -> Vec<u8> {
        let sample_rate: u32 = 8000;
        let data_len = samples * 2;
        let mut wav = Vec::with_capacity(44 + data_len as usize);
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.resize(44 + data_len as usize, 0);
        wav
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("batwatch-missing/alarm.wav");
        let err = load_sound(&path).unwrap_err();
        assert!(matches!(err, AlarmError::Load { .. }));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let path = scratch_file("garbage.wav", b"definitely not audio");
        let err = load_sound(&path).unwrap_err();
        assert!(matches!(err, AlarmError::Decode { .. }));
    }

    #[test]
    fn test_load_valid_wav() {
        let wav = silent_wav(800);
        let path = scratch_file("silence.wav", &wav);
        let sound = load_sound(&path).unwrap();
        assert_eq!(sound.len(), wav.len());
    }
}
