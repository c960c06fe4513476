use serde::{Deserialize, Serialize};

/// Regions a GD-ROM can be locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// Japan, Taiwan and the rest of Asia (NTSC-J)
    Japan,
    /// USA / North America
    Usa,
    /// Europe (PAL regions)
    Europe,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Japan, Region::Usa, Region::Europe];

    /// Returns the standard abbreviation for this region.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Japan => "JPN",
            Self::Usa => "USA",
            Self::Europe => "EUR",
        }
    }

    /// Returns the full name of this region.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Japan => "Japan",
            Self::Usa => "USA",
            Self::Europe => "Europe",
        }
    }

    /// Position and letter of this region in the area symbols.
    fn symbol(&self) -> (usize, u8) {
        match self {
            Self::Japan => (0, b'J'),
            Self::Usa => (1, b'U'),
            Self::Europe => (2, b'E'),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The area symbols from IP.BIN, e.g. `"JUE"`.
///
/// Each region is permitted when its fixed position holds its letter;
/// anything else at that position (usually a space) means it is not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AreaSymbols(pub [u8; 3]);

impl AreaSymbols {
    pub fn permits(&self, region: Region) -> bool {
        let (index, letter) = region.symbol();
        self.0[index] == letter
    }

    pub fn is_japan(&self) -> bool {
        self.permits(Region::Japan)
    }

    pub fn is_usa(&self) -> bool {
        self.permits(Region::Usa)
    }

    pub fn is_europe(&self) -> bool {
        self.permits(Region::Europe)
    }

    /// All permitted regions, in symbol order.
    pub fn regions(&self) -> Vec<Region> {
        Region::ALL
            .into_iter()
            .filter(|r| self.permits(*r))
            .collect()
    }
}

impl std::fmt::Display for AreaSymbols {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}
