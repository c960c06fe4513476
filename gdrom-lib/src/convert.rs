//! Redump layout conversion planning.
//!
//! Redump-style dumps keep 150 pause sectors at the head of every audio
//! track, and a 75-sector pregap plus a pause at the head of a final data
//! track in the high-density area. The physical convention keeps the pause
//! out of the track files and stores that pregap at the end of the
//! preceding track. A [`ConversionPlan`] records, per track, how many bytes
//! move into the previous file, how many are dropped, and the resulting
//! track list.

use std::fmt;

use gdrom_core::gdi::{SECTOR_SIZE, Track, TrackList};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Sectors of silence at the head of a redump-style audio track.
pub const PAUSE_SECTORS: u32 = 150;

/// Sectors a final high-density data track carries ahead of its pause.
pub const PREGAP_SECTORS: u32 = 75;

/// Default name of the track-layout descriptor written after the tracks.
pub const DEFAULT_GDI_FILE: &str = "disc.gdi";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Maps a source track to its destination filename.
pub type TrackRename = Box<dyn Fn(&Track) -> String>;

/// How a game is written out.
#[derive(Default)]
pub struct ConvertOptions {
    /// Name of the descriptor to write after the tracks, if any
    pub gdi_file: Option<String>,
    /// Destination naming. Tracks keep their names when unset.
    pub rename: Option<TrackRename>,
    /// Write the descriptor without column alignment
    pub trim_whitespace: bool,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gdi_file(mut self, name: impl Into<String>) -> Self {
        self.gdi_file = Some(name.into());
        self
    }

    pub fn with_rename(mut self, rename: impl Fn(&Track) -> String + 'static) -> Self {
        self.rename = Some(Box::new(rename));
        self
    }

    /// Name tracks the way GDEMU expects them.
    pub fn with_gdemu_names(self) -> Self {
        self.with_rename(gdemu_track_name)
    }

    pub fn with_trim_whitespace(mut self, trim: bool) -> Self {
        self.trim_whitespace = trim;
        self
    }

    fn destination(&self, track: &Track) -> String {
        match &self.rename {
            Some(rename) => rename(track),
            None => track.name.clone(),
        }
    }
}

impl fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("gdi_file", &self.gdi_file)
            .field("rename", &self.rename.is_some())
            .field("trim_whitespace", &self.trim_whitespace)
            .finish()
    }
}

/// `trackNN.raw` for audio, `trackNN.bin` for data, anything else unchanged.
pub fn gdemu_track_name(track: &Track) -> String {
    if track.is_audio() {
        format!("track{:02}.raw", track.number)
    } else if track.is_data() {
        format!("track{:02}.bin", track.number)
    } else {
        track.name.clone()
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Byte ranges for one track, in the order they are consumed from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackCopy {
    pub number: u32,
    pub source: String,
    pub destination: String,
    /// Leading bytes appended to the previous track's destination
    pub pregap_bytes: u64,
    /// Bytes dropped after the pregap
    pub skipped_bytes: u64,
}

/// The rewritten layout and how to produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPlan {
    /// Whether the source was detected as redump-style
    pub redump: bool,
    /// Track list describing the destination
    pub tracks: TrackList,
    pub copies: Vec<TrackCopy>,
}

/// Progress reported while a game is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertProgress {
    /// Layout style has been determined
    Detected { redump: bool },
    /// A track is about to be copied
    Track {
        number: u32,
        destination: String,
        /// 1-based position in the copy order
        index: usize,
        total: usize,
    },
    /// The layout descriptor is being written
    Descriptor { name: String },
    Done,
}

/// Work out the destination layout without touching any data.
///
/// `list` is left as it is; the plan carries its own rewritten copy. The
/// rename function always sees the source track.
pub fn plan(list: &TrackList, redump: bool, options: &ConvertOptions) -> ConversionPlan {
    let sector_size = u64::from(SECTOR_SIZE);

    let mut tracks = list.clone();
    tracks.trim_whitespace = options.trim_whitespace;

    let mut copies = Vec::with_capacity(list.tracks.len());
    for (track, converted) in list.tracks.iter().zip(tracks.tracks.iter_mut()) {
        let mut pregap_bytes = 0;
        let mut skipped_bytes = 0;

        if redump {
            let final_data = track.is_data()
                && track.number as usize == list.count
                && track.number > 3;
            if final_data {
                pregap_bytes = u64::from(PREGAP_SECTORS) * sector_size;
                converted.start += PREGAP_SECTORS;
            }
            if final_data || track.is_audio() {
                skipped_bytes = u64::from(PAUSE_SECTORS) * sector_size;
                converted.start += PAUSE_SECTORS;
            }
        }

        converted.name = options.destination(track);
        copies.push(TrackCopy {
            number: track.number,
            source: track.name.clone(),
            destination: converted.name.clone(),
            pregap_bytes,
            skipped_bytes,
        });
    }

    ConversionPlan {
        redump,
        tracks,
        copies,
    }
}

#[cfg(test)]
#[path = "tests/convert_tests.rs"]
mod tests;
