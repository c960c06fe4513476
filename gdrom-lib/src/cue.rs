//! Cue sheet parsing and translation into a track layout.
//!
//! Only the `FILE` and `TRACK` commands matter here; `INDEX`, `PREGAP`,
//! `REM` and the rest are skipped. Each track occupies its whole file, so
//! starts are derived from file sizes.

use std::io;

use gdrom_core::gdi::{SECTOR_SIZE, TRACK_THREE_START, Track, TrackList, TrackType};

use crate::error::GameError;

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// A parsed cue sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueSheet {
    pub files: Vec<CueFile>,
}

/// A `FILE` entry and the tracks declared inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueFile {
    pub filename: String,
    pub file_type: String,
    pub tracks: Vec<CueTrack>,
}

/// A `TRACK` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueTrack {
    pub number: u32,
    pub mode: String,
}

/// Parse a cue sheet from its text content.
pub fn parse_cue(content: &str) -> Result<CueSheet, GameError> {
    let mut files = Vec::new();
    let mut current_file: Option<CueFile> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        if command.eq_ignore_ascii_case("FILE") {
            if let Some(f) = current_file.take() {
                files.push(f);
            }

            let (filename, file_type) = parse_file_line(rest)?;
            current_file = Some(CueFile {
                filename,
                file_type,
                tracks: Vec::new(),
            });
        } else if command.eq_ignore_ascii_case("TRACK") {
            let f = current_file
                .as_mut()
                .ok_or_else(|| GameError::cue("TRACK before any FILE"))?;
            let (number, mode) = parse_track_line(rest)?;
            f.tracks.push(CueTrack { number, mode });
        }
    }

    if let Some(f) = current_file.take() {
        files.push(f);
    }

    if files.is_empty() {
        return Err(GameError::cue("no FILE entries"));
    }

    Ok(CueSheet { files })
}

/// Arguments of `FILE "name with spaces.bin" BINARY` or `FILE name.bin BINARY`.
fn parse_file_line(rest: &str) -> Result<(String, String), GameError> {
    let rest = rest.trim_start();

    let (filename, remainder) = if let Some(after_quote) = rest.strip_prefix('"') {
        let end_quote = after_quote
            .find('"')
            .ok_or_else(|| GameError::cue("unterminated quote in FILE line"))?;
        (&after_quote[..end_quote], &after_quote[end_quote + 1..])
    } else {
        rest.split_once(' ').unwrap_or((rest, ""))
    };

    if filename.is_empty() {
        return Err(GameError::cue("FILE line has no filename"));
    }
    Ok((filename.to_string(), remainder.trim().to_string()))
}

/// Arguments of `TRACK 01 MODE1/2352`.
fn parse_track_line(rest: &str) -> Result<(u32, String), GameError> {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(GameError::cue(format!("invalid TRACK line {rest:?}")));
    }

    let number = parts[0]
        .parse()
        .map_err(|_| GameError::cue(format!("invalid track number {:?}", parts[0])))?;

    Ok((number, parts[1].to_uppercase()))
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

fn track_type(mode: &str) -> Option<TrackType> {
    match mode {
        "AUDIO" => Some(TrackType::Audio),
        "MODE1/2352" => Some(TrackType::Data),
        _ => None,
    }
}

/// Build the equivalent track list, sizing each file through `file_size`.
///
/// Starts accumulate whole sectors of each file, except that track 3
/// always begins the high-density area regardless of what precedes it.
pub fn to_track_list<F>(sheet: &CueSheet, mut file_size: F) -> Result<TrackList, GameError>
where
    F: FnMut(&str) -> io::Result<u64>,
{
    let sector_size = u64::from(SECTOR_SIZE);
    let mut tracks = Vec::new();
    let mut start = 0u32;

    for file in &sheet.files {
        for t in &file.tracks {
            let kind = track_type(&t.mode).ok_or_else(|| GameError::InvalidTrackType {
                track: t.number,
                mode: t.mode.clone(),
            })?;

            tracks.push(Track {
                number: t.number,
                start,
                kind,
                sector_size: SECTOR_SIZE,
                name: file.filename.clone(),
                zero: 0,
            });

            if t.number == 2 {
                start = TRACK_THREE_START;
                continue;
            }

            let size = file_size(&file.filename)?;
            if size % sector_size != 0 {
                return Err(GameError::InvalidTrackSize {
                    name: file.filename.clone(),
                    size,
                });
            }
            let sectors = u32::try_from(size / sector_size).map_err(|_| {
                GameError::InvalidTrackSize {
                    name: file.filename.clone(),
                    size,
                }
            })?;
            start = start.saturating_add(sectors);
        }
    }

    let list = TrackList {
        count: tracks.len(),
        tracks,
        trim_whitespace: false,
    };
    list.validate().map_err(GameError::InvalidCueFile)?;
    Ok(list)
}

#[cfg(test)]
#[path = "tests/cue_tests.rs"]
mod tests;
