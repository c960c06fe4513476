use gdrom_core::{GdiError, IpBinError};
use thiserror::Error;

/// Errors that can occur while loading or converting a game image.
#[derive(Debug, Error)]
pub enum GameError {
    /// I/O error from the source or destination, passed through unchanged
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The GDI file failed to parse or validate
    #[error(transparent)]
    Gdi(#[from] GdiError),

    /// The IP.BIN in track 3 failed to decode
    #[error(transparent)]
    IpBin(#[from] IpBinError),

    /// The cue sheet is malformed
    #[error("cue sheet: {0}")]
    Cue(String),

    /// A cue sheet track uses a mode with no GDI equivalent
    #[error("invalid track type {mode:?} for track {track}")]
    InvalidTrackType { track: u32, mode: String },

    /// A track file is not a whole number of raw sectors
    #[error("invalid track size: {name} is {size} bytes")]
    InvalidTrackSize { name: String, size: u64 },

    /// The tracks described by a cue sheet do not form a valid GD-ROM
    #[error("invalid cue file: {0}")]
    InvalidCueFile(#[source] GdiError),

    /// Only some of the audio tracks carry a leading pause
    #[error("inconsistent audio tracks: {redump} of {audio} start with a pause")]
    InconsistentAudioTracks { redump: usize, audio: usize },
}

impl GameError {
    pub fn cue(msg: impl Into<String>) -> Self {
        Self::Cue(msg.into())
    }
}
