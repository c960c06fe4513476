//! GDI track-layout descriptor.
//!
//! A `.gdi` file lists every track of a GD-ROM image, one per line, after a
//! leading track count:
//!
//! ```text
//! 3
//! 1     0 4 2352 track01.bin 0
//! 2   756 0 2352 track02.raw 0
//! 3 45000 4 2352 track03.bin 0
//! ```
//!
//! The same set of structural checks runs after decoding and before
//! encoding, so anything that cannot be decoded also cannot be encoded.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GdiError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Conventional file extension for track-layout descriptors.
pub const EXTENSION: &str = "gdi";

/// Raw sector size used by every track.
pub const SECTOR_SIZE: u32 = 2352;

/// First sector of track 3, the start of the high-density area.
pub const TRACK_THREE_START: u32 = 45000;

const MIN_TRACKS: usize = 3;
const MAX_TRACKS: usize = 99;

/// Number of whitespace-separated columns in a track line.
const FIELD_COUNT: usize = 6;

const FIELD_NUMBER: usize = 0;
const FIELD_START: usize = 1;
const FIELD_TYPE: usize = 2;
const FIELD_SECTOR_SIZE: usize = 3;
const FIELD_NAME: usize = 4;
const FIELD_ZERO: usize = 5;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Track type as stored in the third column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackType {
    /// Red Book audio (code 0)
    Audio,
    /// Mode 1 data (code 4)
    Data,
    /// Any other code. Kept verbatim so validation can reject it.
    Other(u32),
}

impl TrackType {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Audio,
            4 => Self::Data,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::Audio => 0,
            Self::Data => 4,
            Self::Other(code) => code,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Data => "data",
            Self::Other(_) => "unknown",
        }
    }
}

/// A single track line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// 1-based track number
    pub number: u32,
    /// First sector of the track
    pub start: u32,
    pub kind: TrackType,
    /// Bytes per sector, always 2352
    pub sector_size: u32,
    /// Track filename, relative to the GDI file
    pub name: String,
    /// Reserved column, always zero
    pub zero: u32,
}

impl Track {
    pub fn is_audio(&self) -> bool {
        self.kind == TrackType::Audio
    }

    pub fn is_data(&self) -> bool {
        self.kind == TrackType::Data
    }
}

/// A complete GDI file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackList {
    /// Declared number of tracks
    pub count: usize,
    pub tracks: Vec<Track>,
    /// Disable column alignment when encoding. Formatting only, never decoded.
    #[serde(skip)]
    pub trim_whitespace: bool,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl TrackList {
    /// Check every structural rule, stopping at the first one broken.
    ///
    /// The order is fixed: count bounds, count against the number of
    /// tracks, then each track in turn (position-specific start and type,
    /// start ordering, numbering, sector size, reserved column).
    pub fn validate(&self) -> Result<(), GdiError> {
        if self.count < MIN_TRACKS {
            return Err(GdiError::NotEnoughTracks(self.count));
        }
        if self.count > MAX_TRACKS {
            return Err(GdiError::TooManyTracks(self.count));
        }
        if self.tracks.len() != self.count {
            return Err(GdiError::InconsistentTracks {
                declared: self.count,
                found: self.tracks.len(),
            });
        }

        let mut previous: Option<&Track> = None;
        for (position, track) in (1u32..).zip(&self.tracks) {
            match position {
                1 if !track.is_data() => return Err(GdiError::InvalidType { track: position }),
                2 if !track.is_audio() => return Err(GdiError::InvalidType { track: position }),
                3 => {
                    if track.start != TRACK_THREE_START {
                        return Err(GdiError::InvalidStart {
                            track: position,
                            start: track.start,
                        });
                    }
                    if !track.is_data() {
                        return Err(GdiError::InvalidType { track: position });
                    }
                }
                _ => {}
            }

            if let Some(prev) = previous.filter(|prev| track.start < prev.start) {
                return Err(GdiError::OverlappingTracks {
                    track: position,
                    start: track.start,
                    previous: prev.start,
                });
            }
            if track.number != position {
                return Err(GdiError::NonContinuousTracks {
                    expected: position,
                    found: track.number,
                });
            }
            if track.sector_size != SECTOR_SIZE {
                return Err(GdiError::InvalidSectorSize {
                    track: position,
                    size: track.sector_size,
                });
            }
            if track.zero != 0 {
                return Err(GdiError::FieldNotZero { track: position });
            }
            previous = Some(track);
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

impl TrackList {
    /// Decode a GDI file from its text form.
    pub fn decode(text: &str) -> Result<Self, GdiError> {
        let mut lines = text.lines();
        let count = match lines.next() {
            Some(line) => line.parse()?,
            None => 0,
        };

        let tracks = lines.map(parse_track).collect::<Result<Vec<_>, _>>()?;

        let list = TrackList {
            count,
            tracks,
            trim_whitespace: false,
        };
        list.validate()?;
        Ok(list)
    }
}

impl FromStr for TrackList {
    type Err = GdiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

fn parse_track(line: &str) -> Result<Track, GdiError> {
    let fields = split_fields(line)?;

    Ok(Track {
        number: fields[FIELD_NUMBER].parse()?,
        start: fields[FIELD_START].parse()?,
        kind: TrackType::from_code(fields[FIELD_TYPE].parse()?),
        sector_size: fields[FIELD_SECTOR_SIZE].parse()?,
        name: fields[FIELD_NAME].trim_matches('"').to_string(),
        zero: fields[FIELD_ZERO].parse()?,
    })
}

/// Split a track line on whitespace, keeping double-quoted runs together.
///
/// Quote characters stay part of the field they appear in.
fn split_fields(line: &str) -> Result<Vec<&str>, GdiError> {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    let mut within_quotes = false;
    let mut field_start = None;

    for (i, c) in line.char_indices() {
        if c == '"' {
            within_quotes = !within_quotes;
        }
        if c.is_whitespace() && !within_quotes {
            if let Some(start) = field_start.take() {
                fields.push(&line[start..i]);
            }
        } else if field_start.is_none() {
            field_start = Some(i);
        }
    }
    if let Some(start) = field_start {
        fields.push(&line[start..]);
    }

    if within_quotes || fields.len() != FIELD_COUNT {
        return Err(GdiError::InvalidTrack);
    }
    Ok(fields)
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

impl TrackList {
    /// Encode the GDI file into its text form.
    ///
    /// The number and start columns are right-aligned to the width of the
    /// last track's values unless `trim_whitespace` is set.
    pub fn encode(&self) -> Result<String, GdiError> {
        self.validate()?;

        let (number_width, start_width) = match self.tracks.last() {
            Some(last) if !self.trim_whitespace => {
                (last.number.to_string().len(), last.start.to_string().len())
            }
            _ => (1, 1),
        };

        let mut out = format!("{}\n", self.tracks.len());
        for track in &self.tracks {
            let name = if track.name.contains(char::is_whitespace) {
                format!("\"{}\"", track.name)
            } else {
                track.name.clone()
            };
            out.push_str(&format!(
                "{:>nw$} {:>sw$} {} {} {} {}\n",
                track.number,
                track.start,
                track.kind.code(),
                track.sector_size,
                name,
                track.zero,
                nw = number_width,
                sw = start_width,
            ));
        }

        Ok(out)
    }
}

#[cfg(test)]
#[path = "tests/gdi_tests.rs"]
mod tests;
