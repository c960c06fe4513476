//! Core GD-ROM image metadata: the GDI track-layout descriptor and the
//! IP.BIN boot block.
//!
//! Everything in this crate is a pure in-memory transform. Reading track
//! files and writing converted images lives in `gdrom-lib`.

pub mod checksum;
pub mod error;
pub mod gdi;
pub mod ip_bin;
pub mod region;
pub mod util;

pub use checksum::crc16;
pub use error::{GdiError, IpBinError};
pub use gdi::{SECTOR_SIZE, TRACK_THREE_START, Track, TrackList, TrackType};
pub use ip_bin::{IpBin, Peripherals, TocEntry};
pub use region::{AreaSymbols, Region};
