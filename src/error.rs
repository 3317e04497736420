//! Error types surfaced by round setup and collaborators

use std::fmt;

/// A model or clip the platform could not load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLoadError {
    pub asset: String,
    pub reason: String,
}

impl AssetLoadError {
    pub fn new(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for AssetLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load asset '{}': {}", self.asset, self.reason)
    }
}

impl std::error::Error for AssetLoadError {}

/// Reasons a controller cannot enter Playing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// No device pose feed to drive the paddle
    PoseFeedUnavailable,
    /// Paddle or ball body could not be created
    AssetLoad(AssetLoadError),
    /// `start` called before a successful `setup`
    NotReady,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::PoseFeedUnavailable => write!(f, "device pose feed unavailable"),
            SetupError::AssetLoad(err) => write!(f, "round setup failed: {err}"),
            SetupError::NotReady => write!(f, "round controller has no paddle yet"),
        }
    }
}

impl std::error::Error for SetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SetupError::AssetLoad(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AssetLoadError> for SetupError {
    fn from(err: AssetLoadError) -> Self {
        SetupError::AssetLoad(err)
    }
}

/// Sound playback failure (always non-fatal)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundError {
    MissingClip(String),
    Device(String),
}

impl fmt::Display for SoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundError::MissingClip(clip) => write!(f, "sound clip '{clip}' not found"),
            SoundError::Device(msg) => write!(f, "audio device error: {msg}"),
        }
    }
}

impl std::error::Error for SoundError {}
