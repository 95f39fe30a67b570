pub(crate) mod block;
pub(crate) mod cmd;
pub(crate) mod info;


use log::{debug, info};

use crate::card::CardVariant;
use crate::constants::*;
use crate::host::{check_r1, SdBusOps, SdError, SdResult};

/// SPI-mode card driver on top of a byte transport. The only state it
/// keeps is the card variant detected during [`init`](SdHost::init);
/// block operations are invalid until then and stay valid until
/// [`deinit`](SdHost::deinit).
#[derive(Debug)]
pub struct SdHost<T: SdBusOps> {
    bus: T,
    card: Option<CardVariant>,
}

impl<T: SdBusOps> SdHost<T> {
    pub fn new(bus: T) -> Self {
        SdHost { bus, card: None }
    }

    /// Check the card-detect input.
    pub fn detect(&self) -> bool {
        self.bus.card_present()
    }

    /// The variant detected by the last successful init.
    pub fn variant(&self) -> Option<CardVariant> {
        self.card.as_ref().copied()
    }

    /// Borrow the underlying bus, e.g. to raise its clock once init has
    /// finished in the 100-400 kHz window.
    pub fn bus(&self) -> &T {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut T {
        &mut self.bus
    }

    /// Bring the card from power-up through identification and
    /// activation, then fix the block length at 512 bytes. On success
    /// the detected variant is remembered; a failure leaves the driver
    /// uninitialized and the bus released.
    pub fn init(&mut self) -> SdResult {
        if !self.bus.card_present() {
            return Err(SdError::Failure);
        }

        info!("sd card initialization started");
        self.card = None;

        // Supply ramp: at least 74 clocks with MOSI high and the card
        // deselected before the first command. The byte count covers
        // the minimum at any practical host clock.
        self.bus.release_cs();
        for _ in 0..SD_NUM_TRIES_RAMPUP {
            self.write_byte(SD_DUMMY_BYTE);
        }

        self.bus_hold();
        let result = self.activate_card().and_then(|variant| {
            self.card = Some(variant);
            info!("card initialized: {:?}", variant);
            // sector-addressed cards ignore the block length and
            // always run at 512
            if !variant.is_high_capacity() {
                check_r1(self.sd_send_cmd(SD_CMD_SET_BLOCKLEN, SD_BLOCK_SIZE as u32))?;
            }
            Ok(())
        });
        self.bus_release();
        result
    }

    /// Forget the detected card and deselect it.
    pub fn deinit(&mut self) {
        self.card = None;
        self.bus.release_cs();
    }

    /// Soft reset into SPI mode, then walk the activation sequence that
    /// identifies the card generation.
    fn activate_card(&mut self) -> SdResult<CardVariant> {
        // CMD0: soft reset; a valid checksum is mandatory here. Loop
        // until the in-idle response confirms SPI mode.
        let mut state = SD_DUMMY_BYTE;
        for _ in 0..SD_NUM_TRIES {
            state = self.sd_send_cmd(SD_CMD_GO_IDLE_STATE, 0);
            if state == SD_R1_IN_IDLE_STATE {
                break;
            }
        }
        if state != SD_R1_IN_IDLE_STATE {
            return Err(SdError::Failure);
        }

        let mut variant = CardVariant::SdscV2;
        // the waits between init steps are best effort; the next
        // command reports its own failure
        let _ = self.sd_wait_ready();

        // CMD8: offer 2.7-3.6V with the 0xAA check pattern. Cards that
        // reject it predate v2 of the spec.
        let mut probed = false;
        for _ in 0..SD_NUM_TRIES {
            let state = self.sd_send_cmd(SD_CMD_SEND_IF_COND, SD_IF_COND_CHECK_ARG);
            if state & SD_R1_ILLEGAL_COMMAND != 0 {
                variant = CardVariant::SdscV1;
                probed = true;
                break;
            }
            // R7 echoes the offer back as a sanity check; retry on a
            // bad echo
            let echo = self.sd_read_response4();
            if echo & 0x0000_FFFF == SD_IF_COND_CHECK_ARG {
                probed = true;
                break;
            }
        }
        if !probed {
            return Err(SdError::Failure);
        }
        debug!("interface condition probe: {:?}", variant);

        let _ = self.sd_wait_ready();

        // CMD55 + ACMD41: run the activation until the card leaves the
        // idle state. A card that refuses the application prefix is a
        // legacy MMC.
        let mut tries = SD_NUM_TRIES_INIT;
        loop {
            state = self.sd_send_cmd(SD_CMD_SEND_APP, 0);
            if state != SD_R1_IN_IDLE_STATE {
                variant = CardVariant::Mmc;
                break;
            }
            let _ = self.sd_wait_ready();
            // the HCS bit is ignored by v1 cards anyway
            let arg = if variant == CardVariant::SdscV1 {
                0
            } else {
                SD_ACMD41_HCS
            };
            state = self.sd_send_cmd(SD_CMD_ACTIVATE_INIT, arg);
            if state & SD_R1_IN_IDLE_STATE == 0 {
                break;
            }
            tries -= 1;
            if tries == 0 {
                break;
            }
        }
        // a v1 card that never leaves idle is a legacy MMC after all
        if variant == CardVariant::SdscV1 && state & SD_R1_IN_IDLE_STATE != 0 {
            variant = CardVariant::Mmc;
        }

        let _ = self.sd_wait_ready();

        match variant {
            CardVariant::Mmc => {
                // CMD1: legacy MMC activates through the
                // operating-condition command instead
                let mut tries = SD_NUM_TRIES_INIT;
                loop {
                    state = self.sd_send_cmd(SD_CMD_SEND_OP_COND, 0);
                    if state & SD_R1_IN_IDLE_STATE == 0 {
                        break;
                    }
                    tries -= 1;
                    if tries == 0 {
                        return Err(SdError::Failure);
                    }
                }
            }
            CardVariant::SdscV2 => {
                if tries == 0 {
                    return Err(SdError::Failure);
                }
                // CMD58: OCR bit 30 separates sector-addressed cards
                // from byte-addressed ones
                state = self.sd_send_cmd(SD_CMD_READ_OCR, 0);
                if state == 0 {
                    let ocr = self.sd_read_response4();
                    debug!("ocr = {:#010x}", ocr);
                    if ocr & SD_OCR_CCS != 0 {
                        variant = CardVariant::Sdhc;
                    }
                }
            }
            _ => {}
        }

        let _ = self.sd_wait_ready();

        Ok(variant)
    }

    fn require_card(&self) -> SdResult<CardVariant> {
        self.card.ok_or(SdError::Failure)
    }

    fn bus_hold(&mut self) {
        self.bus.assert_cs();
    }

    /// Deselect the card, then clock one trailing dummy byte (eight
    /// idle cycles) so it lets go of the data line.
    fn bus_release(&mut self) {
        self.bus.release_cs();
        self.read_byte();
    }

    fn read_byte(&mut self) -> u8 {
        self.bus.exchange_byte(SD_DUMMY_BYTE)
    }

    fn write_byte(&mut self, byte: u8) {
        self.bus.exchange_byte(byte);
    }
}
