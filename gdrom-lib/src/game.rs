//! A GD-ROM game image: its track layout, boot metadata and the source the
//! track files are read from.

use std::io::{self, Read, Write};

use gdrom_core::gdi::{SECTOR_SIZE, TrackList};
use gdrom_core::{GdiError, IpBin, IpBinError};
use log::debug;

use crate::convert::{self, ConversionPlan, ConvertOptions, ConvertProgress};
use crate::cue;
use crate::error::GameError;
use crate::sink::Sink;
use crate::source::Source;

/// Bytes compared against zero to spot a leading pause.
const PAUSE_PROBE_LEN: usize = 16;

/// A loaded game.
pub struct Game<S: Source> {
    source: S,
    gdi_file: Option<String>,
    cue_file: Option<String>,
    tracks: TrackList,
    ip_bin: IpBin,
}

impl<S: Source> Game<S> {
    /// Load a game, preferring a `.gdi` descriptor and falling back to a
    /// cue sheet only when the source has none.
    pub fn open(mut source: S) -> Result<Self, GameError> {
        let found = match source.find_gdi_file() {
            Ok((mut reader, name)) => Some((name, read_text(&mut reader)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let (gdi_file, cue_file, tracks) = match found {
            Some((name, text)) => {
                debug!("Loading track layout from {name}");
                let tracks = TrackList::decode(&text)?;
                (Some(name), None, tracks)
            }
            None => {
                let (name, text) = {
                    let (mut reader, name) = source.find_cue_file()?;
                    let text = read_text(&mut reader)?;
                    (name, text)
                };
                debug!("No track layout found, translating cue sheet {name}");
                let sheet = cue::parse_cue(&text)?;
                let tracks = cue::to_track_list(&sheet, |file| source.file_size(file))?;
                (None, Some(name), tracks)
            }
        };

        let track_three = tracks
            .tracks
            .get(2)
            .ok_or(GdiError::NotEnoughTracks(tracks.tracks.len()))?;
        let ip_bin = match IpBin::read_from_track(source.open_file(&track_three.name)?) {
            Ok(ip_bin) => ip_bin,
            Err(IpBinError::Io(e)) => return Err(GameError::Io(e)),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            source,
            gdi_file,
            cue_file,
            tracks,
            ip_bin,
        })
    }

    /// Name of the `.gdi` file the game was loaded from.
    pub fn gdi_file(&self) -> Option<&str> {
        self.gdi_file.as_deref()
    }

    /// Name of the cue sheet the game was loaded from.
    pub fn cue_file(&self) -> Option<&str> {
        self.cue_file.as_deref()
    }

    pub fn tracks(&self) -> &TrackList {
        &self.tracks
    }

    pub fn ip_bin(&self) -> &IpBin {
        &self.ip_bin
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// The layout is structurally valid and every track file holds whole
    /// sectors.
    pub fn validate(&mut self) -> Result<(), GameError> {
        self.tracks.validate()?;

        for track in &self.tracks.tracks {
            let size = self.source.file_size(&track.name)?;
            if size % u64::from(SECTOR_SIZE) != 0 {
                return Err(GameError::InvalidTrackSize {
                    name: track.name.clone(),
                    size,
                });
            }
        }
        Ok(())
    }

    /// Whether the audio tracks carry redump-style leading pauses.
    ///
    /// Every audio track must agree; a mix is an error.
    pub fn is_redump(&mut self) -> Result<bool, GameError> {
        self.validate()?;

        let mut audio = 0;
        let mut redump = 0;
        for track in self.tracks.tracks.iter().filter(|t| t.is_audio()) {
            audio += 1;

            let mut probe = [0u8; PAUSE_PROBE_LEN];
            self.source.open_file(&track.name)?.read_exact(&mut probe)?;
            if probe.iter().all(|&b| b == 0) {
                redump += 1;
            }
        }

        debug!("{redump} of {audio} audio tracks start with a pause");
        if redump > 0 && redump < audio {
            return Err(GameError::InconsistentAudioTracks { redump, audio });
        }
        Ok(redump == audio)
    }

    /// Copy every track into `sink`, rewriting the layout as needed, then
    /// write the descriptor if one is configured.
    ///
    /// The last file is closed but the sink is not finished, so the caller
    /// decides when the destination is complete.
    pub fn write<K>(
        &mut self,
        sink: &mut K,
        options: &ConvertOptions,
        mut progress: impl FnMut(ConvertProgress),
    ) -> Result<ConversionPlan, GameError>
    where
        K: Sink + ?Sized,
    {
        let redump = self.is_redump()?;
        progress(ConvertProgress::Detected { redump });

        let plan = convert::plan(&self.tracks, redump, options);
        let total = plan.copies.len();

        for (i, copy) in plan.copies.iter().enumerate() {
            progress(ConvertProgress::Track {
                number: copy.number,
                destination: copy.destination.clone(),
                index: i + 1,
                total,
            });

            let mut src = self.source.open_file(&copy.source)?;

            if copy.pregap_bytes > 0 {
                debug!(
                    "Track {}: moving {} pregap bytes to the previous track",
                    copy.number, copy.pregap_bytes
                );
                copy_exact(&mut src, sink, copy.pregap_bytes)?;
            }
            if copy.skipped_bytes > 0 {
                debug!("Track {}: skipping {} pause bytes", copy.number, copy.skipped_bytes);
                copy_exact(&mut src, &mut io::sink(), copy.skipped_bytes)?;
            }

            sink.create_file(&copy.destination)?;
            let written = io::copy(&mut src, sink)?;
            debug!(
                "Track {}: {} -> {} ({written} bytes)",
                copy.number, copy.source, copy.destination
            );
        }
        sink.close_file()?;

        if let Some(name) = &options.gdi_file {
            progress(ConvertProgress::Descriptor { name: name.clone() });
            let text = plan.tracks.encode()?;
            sink.create_file(name)?;
            sink.write_all(text.as_bytes())?;
            sink.close_file()?;
        }

        progress(ConvertProgress::Done);
        Ok(plan)
    }
}

fn read_text(reader: &mut impl Read) -> io::Result<String> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Copy exactly `len` bytes. Running out early is `UnexpectedEof`.
fn copy_exact<R, W>(reader: &mut R, writer: &mut W, len: u64) -> io::Result<()>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let copied = io::copy(&mut (&mut *reader).take(len), writer)?;
    if copied < len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {len} bytes, found {copied}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/game_tests.rs"]
mod tests;
