use super::cid::SdCid;
use super::csd::SdCsd;
use super::scr::SdScr;

/// Everything the driver learns about a card from its information
/// registers, plus the derived capacity.
#[derive(Debug, Default)]
pub struct SdCardInfo {
    pub csd: SdCsd,
    pub cid: SdCid,
    /// The configuration register; legacy MMC cards do not have one.
    pub scr: Option<SdScr>,
    /// Total capacity in kilobytes.
    pub capacity_kb: u32,
    /// Block size in bytes.
    pub block_size: u32,
}

impl SdCardInfo {
    pub fn new(csd: SdCsd, cid: SdCid, scr: Option<SdScr>) -> Self {
        let capacity_kb = csd.capacity_kb();
        let block_size = csd.block_size();
        SdCardInfo {
            csd,
            cid,
            scr,
            capacity_kb,
            block_size,
        }
    }
}
