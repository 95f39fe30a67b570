use log::trace;

use super::SdHost;
use crate::card::CardVariant;
use crate::constants::*;
use crate::host::{check_r1, SdBusOps, SdError, SdResult};

impl<T: SdBusOps> SdHost<T> {
    /// Receive one data block: start token, payload, two discarded CRC
    /// bytes. Most cards lead with the start token; a few begin with
    /// the payload right away, in which case the first non-idle byte
    /// already is data.
    pub(crate) fn sd_receive_data(&mut self, buf: &mut [u8]) -> SdResult {
        // some cards need time before transmitting the data
        let first = self.sd_wait_read_token();
        if first == SD_DUMMY_BYTE {
            return Err(SdError::Failure);
        }
        let payload = if first == SD_TOKEN_BLOCK_START {
            &mut buf[..]
        } else {
            buf[0] = first;
            &mut buf[1..]
        };
        for byte in payload.iter_mut() {
            *byte = self.read_byte();
        }
        // CRC16 trailer; not verified, CRC is off by default in SPI mode
        self.read_byte();
        self.read_byte();
        Ok(())
    }

    fn sd_transmit_single(&mut self, buf: &[u8]) -> SdResult {
        // at least 8 clocks before the data token
        self.read_byte();
        self.read_byte();
        self.read_byte();
        self.write_byte(SD_TOKEN_BLOCK_START);
        for &byte in buf {
            self.write_byte(byte);
        }
        // dummy CRC16
        self.read_byte();
        self.read_byte();
        let response = self.read_byte() & SD_DATA_RESPONSE_MASK;
        if response != SD_DATA_RESPONSE_ACCEPTED {
            trace!("data response {:#04x}", response);
            return Err(SdError::Failure);
        }
        // the card holds the line low while it programs the block
        self.sd_wait_write_complete()
    }

    fn sd_transmit_multiple(&mut self, buf: &[u8], sectors: u32) -> SdResult {
        self.read_byte();
        self.read_byte();
        self.read_byte();
        let mut result = Ok(());
        for chunk in buf.chunks_exact(SD_BLOCK_SIZE).take(sectors as usize) {
            self.write_byte(SD_TOKEN_MULTI_WRITE_START);
            for &byte in chunk {
                self.write_byte(byte);
            }
            self.read_byte();
            self.read_byte();
            let response = self.read_byte() & SD_DATA_RESPONSE_MASK;
            if response != SD_DATA_RESPONSE_ACCEPTED {
                trace!("data response {:#04x}", response);
                result = Err(SdError::Failure);
                break;
            }
            if let Err(err) = self.sd_wait_write_complete() {
                result = Err(err);
                break;
            }
        }
        // close the transfer even after a rejected block, so the card
        // is not left mid-transmission
        self.write_byte(SD_TOKEN_MULTI_WRITE_STOP);
        self.read_byte();
        let ready = self.sd_wait_ready();
        result.and(ready)
    }

    /// Read one 512-byte sector.
    pub fn read_sector(&mut self, sector: u32, buf: &mut [u8]) -> SdResult {
        let variant = self.require_card()?;
        if buf.len() != SD_BLOCK_SIZE {
            return Err(SdError::Parameter);
        }
        trace!("read_sector: sector = {}", sector);
        let addr = variant.wire_address(sector);
        self.bus_hold();
        let result = self.read_sector_held(addr, buf);
        self.bus_release();
        result
    }

    fn read_sector_held(&mut self, addr: u32, buf: &mut [u8]) -> SdResult {
        let _ = self.sd_wait_ready();
        check_r1(self.sd_send_cmd(SD_CMD_READ_SINGLE_BLOCK, addr))?;
        self.sd_receive_data(buf)
    }

    /// Read `sectors` consecutive sectors into `buf`.
    pub fn read_sectors(&mut self, sector: u32, buf: &mut [u8], sectors: u32) -> SdResult {
        let variant = self.require_card()?;
        if buf.len() != sectors as usize * SD_BLOCK_SIZE {
            return Err(SdError::Parameter);
        }
        trace!("read_sectors: sector = {}, count = {}", sector, sectors);
        let addr = variant.wire_address(sector);
        self.bus_hold();
        let result = self.read_sectors_held(addr, buf, sectors);
        self.bus_release();
        result
    }

    fn read_sectors_held(&mut self, addr: u32, buf: &mut [u8], sectors: u32) -> SdResult {
        let _ = self.sd_wait_ready();
        check_r1(self.sd_send_cmd(SD_CMD_READ_MULT_BLOCK, addr))?;
        let mut result = Ok(());
        for chunk in buf.chunks_exact_mut(SD_BLOCK_SIZE).take(sectors as usize) {
            if let Err(err) = self.sd_receive_data(chunk) {
                result = Err(err);
                break;
            }
        }
        // no block count was declared; stop-transmission terminates the
        // open-ended transfer whether or not every block arrived
        let stop = check_r1(self.sd_send_cmd(SD_CMD_STOP_TRANSMISSION, 0));
        result.and(stop)
    }

    /// Write one 512-byte sector.
    pub fn write_sector(&mut self, sector: u32, buf: &[u8]) -> SdResult {
        let variant = self.require_card()?;
        if buf.len() != SD_BLOCK_SIZE {
            return Err(SdError::Parameter);
        }
        trace!("write_sector: sector = {}", sector);
        let addr = variant.wire_address(sector);
        self.bus_hold();
        let result = self.write_sector_held(addr, buf);
        self.bus_release();
        result
    }

    fn write_sector_held(&mut self, addr: u32, buf: &[u8]) -> SdResult {
        let _ = self.sd_wait_ready();
        check_r1(self.sd_send_cmd(SD_CMD_WRITE_SINGLE_BLOCK, addr))?;
        self.sd_transmit_single(buf)
    }

    /// Write `sectors` consecutive sectors from `buf`.
    pub fn write_sectors(&mut self, sector: u32, buf: &[u8], sectors: u32) -> SdResult {
        let variant = self.require_card()?;
        if buf.len() != sectors as usize * SD_BLOCK_SIZE {
            return Err(SdError::Parameter);
        }
        trace!("write_sectors: sector = {}, count = {}", sector, sectors);
        let addr = variant.wire_address(sector);
        self.bus_hold();
        let result = self.write_sectors_held(variant, addr, buf, sectors);
        self.bus_release();
        result
    }

    fn write_sectors_held(
        &mut self,
        variant: CardVariant,
        addr: u32,
        buf: &[u8],
        sectors: u32,
    ) -> SdResult {
        let _ = self.sd_wait_ready();
        // pre-declaring the count lets the card pre-erase the blocks;
        // legacy MMC does not know the command
        if !variant.is_mmc() {
            check_r1(self.sd_send_cmd(SD_CMD_SET_BLOCK_COUNT, sectors))?;
        }
        check_r1(self.sd_send_cmd(SD_CMD_WRITE_MULT_BLOCK, addr))?;
        self.sd_transmit_multiple(buf, sectors)
    }

    /// Erase the inclusive sector range. Not available on legacy MMC.
    pub fn erase_sectors(&mut self, from: u32, to: u32) -> SdResult {
        let variant = self.require_card()?;
        if variant.is_mmc() {
            return Err(SdError::IllegalCommand);
        }
        trace!("erase_sectors: {}..={}", from, to);
        let (from, to) = (variant.wire_address(from), variant.wire_address(to));
        self.bus_hold();
        let result = self.erase_sectors_held(from, to);
        self.bus_release();
        result
    }

    fn erase_sectors_held(&mut self, from: u32, to: u32) -> SdResult {
        let _ = self.sd_wait_ready();
        check_r1(self.sd_send_cmd(SD_CMD_ERASE_BLOCK_START, from))?;
        check_r1(self.sd_send_cmd(SD_CMD_ERASE_BLOCK_END, to))?;
        check_r1(self.sd_send_cmd(SD_CMD_ERASE, 0))?;
        self.sd_wait_erase_complete()
    }
}
