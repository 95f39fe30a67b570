pub mod cid;
pub mod csd;
pub mod info;
pub mod scr;
pub mod status;

/// The card generations the init sequencer can tell apart. Decided
/// exactly once during initialization; every later operation reads it
/// to pick the addressing mode and the legal command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardVariant {
    /// Legacy multimedia card: no CMD8, no ACMD41, activated with CMD1,
    /// byte-addressed.
    Mmc,
    /// Standard capacity v1: no CMD8, activated with ACMD41,
    /// byte-addressed.
    SdscV1,
    /// Standard capacity v2: answers CMD8, byte-addressed.
    SdscV2,
    /// High capacity: answers CMD8, sector-addressed.
    Sdhc,
}

impl CardVariant {
    /// Sector-addressed cards take the sector index on the wire;
    /// everything else takes a byte offset.
    pub fn is_high_capacity(&self) -> bool {
        matches!(self, CardVariant::Sdhc)
    }

    pub fn is_mmc(&self) -> bool {
        matches!(self, CardVariant::Mmc)
    }

    /// Map a sector index to the address field of a block command.
    pub fn wire_address(&self, sector: u32) -> u32 {
        if self.is_high_capacity() {
            sector
        } else {
            sector << 9
        }
    }
}
