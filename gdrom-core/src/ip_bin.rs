//! IP.BIN boot block decoder.
//!
//! The first 16 sectors of track 3 hold a 32 KiB initial program whose
//! leading 0x100 bytes are a fixed-layout text header (hardware and maker
//! IDs, device information, regions, peripherals, product details), followed
//! by the GD-ROM's own table of contents.

use std::io::Read;

use bitflags::bitflags;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::checksum::crc16;
use crate::error::IpBinError;
use crate::gdi::{self, TrackType};
use crate::region::AreaSymbols;
use crate::util::{hex_dump, read_padded};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Size of the IP.BIN block.
pub const IP_BIN_LEN: usize = 0x8000;

/// Sectors of track 3 the block is spread across.
const IP_BIN_SECTORS: usize = 16;

/// Sync pattern + header preceding the user data in each raw sector.
const SECTOR_HEADER_SIZE: usize = 16;

/// User data per Mode 1 sector.
const SECTOR_DATA_SIZE: usize = 2048;

/// Pause sectors between TOC entries.
pub const PAUSE_SECTORS: i32 = 150;

/// Sector the last TOC entry is measured against.
pub const LAST_SECTOR: i32 = 0x861b4;

/// Tracks 3..=99, the ones in the high-density area.
const TOC_SLOTS: usize = 97;

/// TOC entries follow the four-byte `TOC1` signature at 0x100.
const TOC_OFFSET: usize = 0x104;
const TOC_ENTRY_SIZE: usize = 4;

const TOC_TYPE_AUDIO: u8 = 0x01;
const TOC_TYPE_DATA: u8 = 0x41;

// ---------------------------------------------------------------------------
// Field layout
// ---------------------------------------------------------------------------

/// A named, fixed-position field of the header.
#[derive(Debug, Clone, Copy)]
struct Field {
    name: &'static str,
    offset: usize,
    len: usize,
}

impl Field {
    const fn new(name: &'static str, start: usize, end: usize) -> Self {
        Self {
            name,
            offset: start,
            len: end - start,
        }
    }

    fn bytes<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.offset..self.offset + self.len]
    }

    fn text(&self, buf: &[u8]) -> String {
        read_padded(self.bytes(buf))
    }

    fn invalid(&self, buf: &[u8]) -> IpBinError {
        IpBinError::InvalidField {
            field: self.name,
            value: String::from_utf8_lossy(self.bytes(buf)).into_owned(),
        }
    }

    /// Decode a run of ASCII hex digits.
    fn hex(&self, buf: &[u8]) -> Result<u32, IpBinError> {
        let digits = self.bytes(buf);
        if !digits.iter().all(u8::is_ascii_hexdigit) {
            return Err(self.invalid(buf));
        }
        // Pad odd-length runs out to whole bytes.
        let mut text = String::with_capacity(digits.len() + 1);
        if digits.len() % 2 != 0 {
            text.push('0');
        }
        text.push_str(&String::from_utf8_lossy(digits));
        u32::from_str_radix(&text, 16).map_err(|_| self.invalid(buf))
    }
}

const HARDWARE_ID: Field = Field::new("hardware ID", 0x000, 0x010);
const MAKER_ID: Field = Field::new("maker ID", 0x010, 0x020);
const CRC: Field = Field::new("CRC", 0x020, 0x024);
const DISC_NUMBER: Field = Field::new("disc number", 0x025, 0x038);
const AREA_SYMBOLS: Field = Field::new("area symbols", 0x030, 0x033);
const PERIPHERALS: Field = Field::new("peripherals", 0x038, 0x03f);
const PRODUCT_NUMBER: Field = Field::new("product number", 0x040, 0x04a);
const PRODUCT_VERSION: Field = Field::new("product version", 0x04a, 0x050);
const RELEASE_DATE: Field = Field::new("release date", 0x050, 0x060);
const BOOT_FILENAME: Field = Field::new("boot filename", 0x060, 0x070);
const PRODUCER: Field = Field::new("producer", 0x070, 0x080);
const SOFTWARE_NAME: Field = Field::new("software name", 0x080, 0x100);

/// Bytes the device information CRC is computed over.
const CRC_COVERAGE: Field = Field::new("product ID", 0x040, 0x050);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

bitflags! {
    /// Peripheral support bits from the IP.BIN header.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[rustfmt::skip]
    pub struct Peripherals: u32 {
        const WINDOWS_CE          = 1 << 0;
        const VGA_BOX             = 1 << 4;
        const OTHER_EXPANSIONS    = 1 << 8;
        const VIBRATION_PACK      = 1 << 9;
        const MICROPHONE          = 1 << 10;
        const MEMORY_CARD         = 1 << 11;
        const START_A_B_DIRS      = 1 << 12;
        const C_BUTTON            = 1 << 13;
        const D_BUTTON            = 1 << 14;
        const X_BUTTON            = 1 << 15;
        const Y_BUTTON            = 1 << 16;
        const Z_BUTTON            = 1 << 17;
        const EXPANDED_DIRECTIONS = 1 << 18;
        const ANALOG_R_TRIGGER    = 1 << 19;
        const ANALOG_L_TRIGGER    = 1 << 20;
        const ANALOG_HORIZONTAL   = 1 << 21;
        const ANALOG_VERTICAL     = 1 << 22;
        const EXPANDED_HORIZONTAL = 1 << 23;
        const EXPANDED_VERTICAL   = 1 << 24;
        const GUN                 = 1 << 25;
        const KEYBOARD            = 1 << 26;
        const MOUSE               = 1 << 27;
    }
}

/// One entry of the IP.BIN table of contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// First sector, with the pause removed
    pub start: i32,
    /// Length in sectors
    pub length: i32,
    pub kind: TrackType,
}

/// Decoded IP.BIN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpBin {
    #[serde(skip)]
    bytes: Vec<u8>,
    pub hardware_id: String,
    pub maker_id: String,
    /// CRC of the product number and version, as stored
    pub crc: u16,
    pub disc: u32,
    pub total_discs: u32,
    pub area_symbols: AreaSymbols,
    pub peripherals: Peripherals,
    pub product_number: String,
    pub product_version: String,
    pub release_date: NaiveDate,
    pub boot_filename: String,
    pub producer: String,
    pub software_name: String,
    pub toc: Vec<TocEntry>,
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

impl IpBin {
    /// Decode an IP.BIN block. The buffer must be exactly 32 KiB.
    pub fn decode(bytes: &[u8]) -> Result<Self, IpBinError> {
        if bytes.len() != IP_BIN_LEN {
            return Err(IpBinError::InvalidLength {
                expected: IP_BIN_LEN,
                actual: bytes.len(),
            });
        }

        let crc = CRC.hex(bytes)? as u16;

        let (disc, total_discs) =
            parse_disc_number(&String::from_utf8_lossy(DISC_NUMBER.bytes(bytes)))
                .ok_or_else(|| DISC_NUMBER.invalid(bytes))?;

        let mut area = [0u8; 3];
        area.copy_from_slice(AREA_SYMBOLS.bytes(bytes));

        let peripherals = Peripherals::from_bits_retain(PERIPHERALS.hex(bytes)?);

        let release_date = NaiveDate::parse_from_str(&RELEASE_DATE.text(bytes), "%Y%m%d")?;

        Ok(IpBin {
            hardware_id: HARDWARE_ID.text(bytes),
            maker_id: MAKER_ID.text(bytes),
            crc,
            disc,
            total_discs,
            area_symbols: AreaSymbols(area),
            peripherals,
            product_number: PRODUCT_NUMBER.text(bytes),
            product_version: PRODUCT_VERSION.text(bytes),
            release_date,
            boot_filename: BOOT_FILENAME.text(bytes),
            producer: PRODUCER.text(bytes),
            software_name: SOFTWARE_NAME.text(bytes),
            toc: parse_toc(bytes),
            bytes: bytes.to_vec(),
        })
    }

    /// Rebuild and decode the block from the start of a raw 2352-byte track.
    ///
    /// Each of the first 16 sectors contributes its 2048 bytes of user data.
    pub fn read_from_track<R: Read>(mut reader: R) -> Result<Self, IpBinError> {
        let mut buf = Vec::with_capacity(IP_BIN_LEN);
        let mut sector = [0u8; gdi::SECTOR_SIZE as usize];
        for _ in 0..IP_BIN_SECTORS {
            reader.read_exact(&mut sector)?;
            buf.extend_from_slice(
                &sector[SECTOR_HEADER_SIZE..SECTOR_HEADER_SIZE + SECTOR_DATA_SIZE],
            );
        }
        Self::decode(&buf)
    }

    /// The raw 32 KiB block.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// CRC recomputed over the product number and version.
    pub fn computed_crc(&self) -> u16 {
        crc16(CRC_COVERAGE.bytes(&self.bytes))
    }

    /// Whether the stored CRC agrees with [`computed_crc`](Self::computed_crc).
    pub fn crc_matches(&self) -> bool {
        self.crc == self.computed_crc()
    }

    pub fn is_region_japan(&self) -> bool {
        self.area_symbols.is_japan()
    }

    pub fn is_region_usa(&self) -> bool {
        self.area_symbols.is_usa()
    }

    pub fn is_region_europe(&self) -> bool {
        self.area_symbols.is_europe()
    }

    pub fn hex_dump(&self) -> String {
        hex_dump(&self.bytes)
    }
}

/// Parse the leading `GD-ROM<disc>/<total>` of the device information.
/// Anything after the total is ignored.
fn parse_disc_number(text: &str) -> Option<(u32, u32)> {
    let rest = text.strip_prefix("GD-ROM")?;
    let (disc, rest) = split_number(rest)?;
    let rest = rest.strip_prefix('/')?;
    let (total, _) = split_number(rest)?;
    Some((disc, total))
}

fn split_number(s: &str) -> Option<(u32, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

/// Read TOC slots until one holds neither an audio nor a data track, then
/// derive each entry's length from the start of the next one.
fn parse_toc(bytes: &[u8]) -> Vec<TocEntry> {
    let mut toc = Vec::new();

    for slot in bytes[TOC_OFFSET..]
        .chunks_exact(TOC_ENTRY_SIZE)
        .take(TOC_SLOTS)
    {
        let kind = match slot[3] {
            TOC_TYPE_AUDIO => TrackType::Audio,
            TOC_TYPE_DATA => TrackType::Data,
            _ => break,
        };
        let start = i32::from(slot[0]) | i32::from(slot[1]) << 8 | i32::from(slot[2]) << 16;
        toc.push(TocEntry {
            start: start - PAUSE_SECTORS,
            length: 0,
            kind,
        });
    }

    for i in 1..toc.len() {
        toc[i - 1].length = toc[i].start - toc[i - 1].start - PAUSE_SECTORS;
    }
    if let Some(last) = toc.last_mut() {
        last.length = LAST_SECTOR - last.start - PAUSE_SECTORS;
    }

    toc
}

#[cfg(test)]
#[path = "tests/ip_bin_tests.rs"]
mod tests;
