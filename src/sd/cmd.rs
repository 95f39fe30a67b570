use super::SdHost;
use crate::common::commands::SdCommand;
use crate::constants::*;
use crate::host::{SdBusOps, SdError, SdResult};

impl<T: SdBusOps> SdHost<T> {
    /// Transmit one command frame and poll for the short response. The
    /// caller must hold chip-select around the whole transaction.
    ///
    /// Returns the last byte read: a valid response has bit 7 clear,
    /// 0xFF means the poll budget ran out.
    pub(crate) fn sd_send_cmd(&mut self, index: u8, arg: u32) -> u8 {
        let cmd = SdCommand::new(index, arg);
        for byte in cmd.frame() {
            self.write_byte(byte);
        }
        // the byte received right after stop-transmission is garbage
        if index == SD_CMD_STOP_TRANSMISSION {
            self.read_byte();
        }
        // Ncr is 0-8 byte times for SD cards, 1-8 for MMC; polling
        // until the framing bit clears covers both
        let mut response = SD_DUMMY_BYTE;
        for _ in 0..SD_NUM_TRIES {
            response = self.read_byte();
            if response & SD_R1_CHECK_BIT == 0 {
                break;
            }
        }
        response
    }

    /// Collect the 4-byte payload that trails an R3/R7 short response,
    /// first byte most significant, so the value can be masked
    /// directly.
    pub(crate) fn sd_read_response4(&mut self) -> u32 {
        let mut value = 0u32;
        for _ in 0..4 {
            value = (value << 8) | self.read_byte() as u32;
        }
        value
    }

    fn sd_wait_release(&mut self, tries: u32) -> SdResult {
        for _ in 0..tries {
            if self.read_byte() == SD_DUMMY_BYTE {
                return Ok(());
            }
        }
        Err(SdError::Failure)
    }

    /// R1b commands hold the data line low while the card settles; wait
    /// until it is released.
    pub(crate) fn sd_wait_ready(&mut self) -> SdResult {
        self.sd_wait_release(SD_NUM_TRIES)
    }

    /// Wait for a data transmission to start. Returns the first
    /// non-idle byte, or 0xFF if the budget ran out.
    pub(crate) fn sd_wait_read_token(&mut self) -> u8 {
        for _ in 0..SD_NUM_TRIES_READ {
            let byte = self.read_byte();
            if byte != SD_DUMMY_BYTE {
                return byte;
            }
        }
        SD_DUMMY_BYTE
    }

    /// Busy phase while the card programs a received block.
    pub(crate) fn sd_wait_write_complete(&mut self) -> SdResult {
        self.sd_wait_release(SD_NUM_TRIES_WRITE)
    }

    /// Busy phase while the card erases the selected sectors.
    pub(crate) fn sd_wait_erase_complete(&mut self) -> SdResult {
        self.sd_wait_release(SD_NUM_TRIES_ERASE)
    }
}
