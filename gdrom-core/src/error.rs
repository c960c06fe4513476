use std::num::ParseIntError;

use thiserror::Error;

/// Errors raised while decoding, encoding or validating a GDI track list.
///
/// Validation stops at the first broken rule, so exactly one of these is
/// reported for any given input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GdiError {
    /// A track line did not split into six fields, or a quote was left open
    #[error("invalid track")]
    InvalidTrack,

    /// A numeric field failed to parse; the original error is kept as-is
    #[error(transparent)]
    ParseInt(#[from] ParseIntError),

    /// Fewer than three tracks were declared
    #[error("not enough tracks: {0}")]
    NotEnoughTracks(usize),

    /// More than 99 tracks were declared
    #[error("too many tracks: {0}")]
    TooManyTracks(usize),

    /// The declared count disagrees with the number of track lines
    #[error("inconsistent tracks: declared {declared}, found {found}")]
    InconsistentTracks { declared: usize, found: usize },

    /// Track 3 does not start at the high-density boundary
    #[error("invalid start for track {track}: {start}")]
    InvalidStart { track: u32, start: u32 },

    /// One of the first three tracks has the wrong type
    #[error("invalid track type for track {track}")]
    InvalidType { track: u32 },

    /// A track starts before the one preceding it
    #[error("overlapping tracks: track {track} starts at {start}, before {previous}")]
    OverlappingTracks { track: u32, start: u32, previous: u32 },

    /// Track numbers skip or repeat
    #[error("non-continuous tracks: expected {expected}, found {found}")]
    NonContinuousTracks { expected: u32, found: u32 },

    /// A track uses a sector size other than 2352
    #[error("invalid sector size for track {track}: {size}")]
    InvalidSectorSize { track: u32, size: u32 },

    /// The trailing reserved column was not zero
    #[error("field not zero for track {track}")]
    FieldNotZero { track: u32 },
}

/// Errors raised while decoding an IP.BIN boot block.
#[derive(Debug, Error)]
pub enum IpBinError {
    /// The block was not exactly 32 KiB
    #[error("incorrect amount of bytes for IP.BIN: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// A fixed-format field (CRC, disc number, peripherals) did not match
    /// its expected pattern
    #[error("invalid {field} field: {value:?}")]
    InvalidField { field: &'static str, value: String },

    /// The release date is not `YYYYMMDD`
    #[error("invalid release date: {0}")]
    ReleaseDate(#[from] chrono::ParseError),

    /// I/O error while pulling the block out of a raw track
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
