use alloc::string::String;
use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    NotConnected,
    Network(String),
    Http(u16),
    Parse(String),
}

impl fmt::Display for AssistantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssistantError::NotConnected => write!(f, "WiFi not connected"),
            AssistantError::Network(msg) => write!(f, "Network error: {}", msg),
            AssistantError::Http(status) => write!(f, "HTTP {}", status),
            AssistantError::Parse(msg) => write!(f, "Bad response: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AssistantError {}

/// Cloud speech-to-text and text completion. Calls block the tick.
pub trait AssistantService {
    /// Bring the network up; returns whether it is connected afterwards.
    fn connect(&mut self) -> bool;

    fn is_connected(&self) -> bool;

    /// Speech to text. An `Ok` with empty or "Error"-prefixed text still
    /// counts as a failed transcription.
    fn transcribe(&mut self, audio: &[u8]) -> Result<String, AssistantError>;

    fn complete(&mut self, prompt: &str) -> Result<String, AssistantError>;
}
