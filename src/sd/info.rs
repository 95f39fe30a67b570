use log::debug;

use super::SdHost;
use crate::card::cid::SdCid;
use crate::card::csd::SdCsd;
use crate::card::info::SdCardInfo;
use crate::card::scr::SdScr;
use crate::card::status::SdStatus;
use crate::card::CardVariant;
use crate::constants::*;
use crate::host::{check_r1, SdBusOps, SdError, SdResult};

// Reading an information register in SPI mode is a plain read-block
// transaction of the register's exact size.
impl<T: SdBusOps> SdHost<T> {
    fn sd_csd_register(&mut self) -> SdResult<SdCsd> {
        self.sd_wait_ready()?;
        check_r1(self.sd_send_cmd(SD_CMD_SEND_CSD, 0))?;
        let mut raw = [0u8; 16];
        self.sd_receive_data(&mut raw)?;
        Ok(SdCsd::parse(&raw))
    }

    fn sd_cid_register(&mut self) -> SdResult<SdCid> {
        self.sd_wait_ready()?;
        check_r1(self.sd_send_cmd(SD_CMD_SEND_CID, 0))?;
        let mut raw = [0u8; 16];
        self.sd_receive_data(&mut raw)?;
        Ok(SdCid::parse(&raw))
    }

    fn sd_scr_register(&mut self) -> SdResult<SdScr> {
        self.sd_wait_ready()?;
        check_r1(self.sd_send_cmd(SD_CMD_SEND_APP, 0))?;
        check_r1(self.sd_send_cmd(SD_CMD_SEND_SCR, 0))?;
        let mut raw = [0u8; 8];
        self.sd_receive_data(&mut raw)?;
        Ok(SdScr::parse(&raw))
    }

    /// Read and decode the CSD, the CID and (except on legacy MMC, which
    /// has none) the SCR, and derive the capacity.
    pub fn card_info(&mut self) -> SdResult<SdCardInfo> {
        let variant = self.require_card()?;
        self.bus_hold();
        let result = self.card_info_held(variant);
        self.bus_release();
        if let Ok(info) = &result {
            debug!(
                "card capacity: {} KB, block size {} bytes",
                info.capacity_kb, info.block_size
            );
        }
        result
    }

    fn card_info_held(&mut self, variant: CardVariant) -> SdResult<SdCardInfo> {
        let csd = self.sd_csd_register()?;
        let cid = self.sd_cid_register()?;
        let scr = if variant.is_mmc() {
            None
        } else {
            Some(self.sd_scr_register()?)
        };
        Ok(SdCardInfo::new(csd, cid, scr))
    }

    /// Read and decode the 64-byte status response. Not available on
    /// legacy MMC.
    pub fn card_status(&mut self) -> SdResult<SdStatus> {
        let variant = self.require_card()?;
        if variant.is_mmc() {
            return Err(SdError::IllegalCommand);
        }
        self.bus_hold();
        let result = self.card_status_held();
        self.bus_release();
        result
    }

    fn card_status_held(&mut self) -> SdResult<SdStatus> {
        self.sd_wait_ready()?;
        check_r1(self.sd_send_cmd(SD_CMD_SEND_APP, 0))?;
        check_r1(self.sd_send_cmd(SD_CMD_STATUS, 0))?;
        let mut raw = [0u8; 64];
        self.sd_receive_data(&mut raw)?;
        Ok(SdStatus::parse(&raw))
    }
}
