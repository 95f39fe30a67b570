use core::fmt::Debug;
use core::fmt::Display;

use crate::constants::*;

/// Byte-level transport the driver runs on: a full-duplex exchange
/// primitive, the chip-select line and the card-detect input. The
/// driver never touches the clock; bringing the bus up in the card's
/// 100-400 kHz initialization window is the embedder's job.
pub trait SdBusOps: Debug + Send + Sync {
    /// Drive eight bits out while latching eight bits in.
    fn exchange_byte(&mut self, out: u8) -> u8;

    /// Drive chip-select active (low).
    fn assert_cs(&mut self);

    /// Drive chip-select inactive (high).
    fn release_cs(&mut self);

    /// Read the card-detect input.
    fn card_present(&self) -> bool;
}

/// Driver error codes. The card-reported variants mirror the short
/// response bits one-to-one; `Failure` is the synthetic code for
/// timeouts, bad echoes, missing tokens and rejected data responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdError {
    InIdleState,
    EraseReset,
    IllegalCommand,
    CommandCrc,
    EraseSequence,
    Address,
    Parameter,
    Failure,
}

impl Display for SdError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SdError::InIdleState => write!(f, "Card is in idle state"),
            SdError::EraseReset => write!(f, "Erase sequence was reset"),
            SdError::IllegalCommand => write!(f, "Illegal command for this card"),
            SdError::CommandCrc => write!(f, "Command CRC error"),
            SdError::EraseSequence => write!(f, "Erase sequence error"),
            SdError::Address => write!(f, "Address error"),
            SdError::Parameter => write!(f, "Parameter error"),
            SdError::Failure => write!(f, "Transaction failed"),
        }
    }
}

pub type SdResult<T = ()> = Result<T, SdError>;

impl SdError {
    /// Classify a raw short response. A byte with the framing bit still
    /// set means the card never answered.
    pub fn from_r1(r1: u8) -> Option<SdError> {
        if r1 == 0 {
            return None;
        }
        if r1 & SD_R1_CHECK_BIT != 0 {
            return Some(SdError::Failure);
        }
        let err = if r1 & SD_R1_ILLEGAL_COMMAND != 0 {
            SdError::IllegalCommand
        } else if r1 & SD_R1_PARAMETER_ERROR != 0 {
            SdError::Parameter
        } else if r1 & SD_R1_ADDRESS_ERROR != 0 {
            SdError::Address
        } else if r1 & SD_R1_ERASE_SEQ_ERROR != 0 {
            SdError::EraseSequence
        } else if r1 & SD_R1_COM_CRC_ERROR != 0 {
            SdError::CommandCrc
        } else if r1 & SD_R1_ERASE_RESET != 0 {
            SdError::EraseReset
        } else {
            SdError::InIdleState
        };
        Some(err)
    }
}

/// Turn a short response into a result; zero is success.
pub(crate) fn check_r1(r1: u8) -> SdResult {
    match SdError::from_r1(r1) {
        None => Ok(()),
        Some(err) => Err(err),
    }
}
