//! Loading and converting Dreamcast GD-ROM images.
//!
//! A [`Game`] is read from a [`Source`] (a directory or zip archive),
//! located through its `.gdi` descriptor or, failing that, a cue sheet.
//! [`Game::write`] copies it into a [`Sink`], converting redump-style
//! layouts to the physical one along the way.

pub mod convert;
pub mod counter;
pub mod cue;
pub mod error;
pub mod game;
pub mod settings;
pub mod sink;
pub mod source;

pub use convert::{
    ConversionPlan, ConvertOptions, ConvertProgress, TrackCopy, gdemu_track_name, plan,
};
pub use counter::Counter;
pub use error::GameError;
pub use game::Game;
pub use settings::Settings;
pub use sink::{DirectoryWriter, Sink, ZipWriter, create_sink};
pub use source::{DirectoryReader, Source, ZipReader, open_source};
