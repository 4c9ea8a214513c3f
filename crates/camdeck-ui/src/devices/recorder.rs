use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// A finished push-to-talk recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    /// Encoded audio (WAV on the device).
    pub audio: Vec<u8>,
    pub duration_secs: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderError {
    NotRecording,
    Io(String),
}

impl fmt::Display for RecorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecorderError::NotRecording => write!(f, "Recorder was not started"),
            RecorderError::Io(msg) => write!(f, "Recorder IO error: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RecorderError {}

/// Microphone capture driven one tick at a time.
pub trait Recorder {
    fn start(&mut self) -> Result<(), RecorderError>;

    /// Drain whatever the microphone produced since the last call.
    fn poll(&mut self) -> Result<(), RecorderError>;

    fn stop(&mut self) -> Result<Recording, RecorderError>;

    /// Drop any recording in progress without producing output.
    fn cancel(&mut self);

    fn is_recording(&self) -> bool;
}
