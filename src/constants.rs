//! Wire-level constants of the SPI-mode card protocol.

/// Sector size; every data block on the wire is this long.
pub const SD_BLOCK_SIZE: usize = 512;

/// Byte clocked out whenever the host only wants to receive.
pub const SD_DUMMY_BYTE: u8 = 0xFF;

// Command set (SPI mode). CMDxx on the wire is `xx | 0x40`.
pub const SD_CMD_GO_IDLE_STATE: u8 = 0;
pub const SD_CMD_SEND_OP_COND: u8 = 1;
pub const SD_CMD_SEND_IF_COND: u8 = 8;
pub const SD_CMD_SEND_CSD: u8 = 9;
pub const SD_CMD_SEND_CID: u8 = 10;
pub const SD_CMD_STOP_TRANSMISSION: u8 = 12;
pub const SD_CMD_STATUS: u8 = 13; // ACMD13
pub const SD_CMD_SET_BLOCKLEN: u8 = 16;
pub const SD_CMD_READ_SINGLE_BLOCK: u8 = 17;
pub const SD_CMD_READ_MULT_BLOCK: u8 = 18;
pub const SD_CMD_SET_BLOCK_COUNT: u8 = 23;
pub const SD_CMD_WRITE_SINGLE_BLOCK: u8 = 24;
pub const SD_CMD_WRITE_MULT_BLOCK: u8 = 25;
pub const SD_CMD_ERASE_BLOCK_START: u8 = 32;
pub const SD_CMD_ERASE_BLOCK_END: u8 = 33;
pub const SD_CMD_ERASE: u8 = 38;
pub const SD_CMD_ACTIVATE_INIT: u8 = 41; // ACMD41
pub const SD_CMD_SEND_SCR: u8 = 51; // ACMD51
pub const SD_CMD_SEND_APP: u8 = 55;
pub const SD_CMD_READ_OCR: u8 = 58;

// R1 short response bits. A valid response has bit 7 clear; while the
// card is still shifting, the line reads all-ones.
pub const SD_R1_IN_IDLE_STATE: u8 = 0x01;
pub const SD_R1_ERASE_RESET: u8 = 0x02;
pub const SD_R1_ILLEGAL_COMMAND: u8 = 0x04;
pub const SD_R1_COM_CRC_ERROR: u8 = 0x08;
pub const SD_R1_ERASE_SEQ_ERROR: u8 = 0x10;
pub const SD_R1_ADDRESS_ERROR: u8 = 0x20;
pub const SD_R1_PARAMETER_ERROR: u8 = 0x40;
pub const SD_R1_CHECK_BIT: u8 = 0x80;

// Data tokens. At idle with CS active only 0xFF is on the line, so a
// token is any other lead byte.
pub const SD_TOKEN_BLOCK_START: u8 = 0xFE; // single read/write, multi read
pub const SD_TOKEN_MULTI_WRITE_START: u8 = 0xFC;
pub const SD_TOKEN_MULTI_WRITE_STOP: u8 = 0xFD;

// Data response returned after each transmitted block; only bits 1-3
// carry information.
pub const SD_DATA_RESPONSE_MASK: u8 = 0x0E;
pub const SD_DATA_RESPONSE_ACCEPTED: u8 = 0x04;
pub const SD_DATA_RESPONSE_REJECTED_CRC: u8 = 0x0A;
pub const SD_DATA_RESPONSE_REJECTED_ERR: u8 = 0x0C;

// Initialization arguments.
/// CMD8 argument: 2.7-3.6V window plus the 0xAA check pattern the card
/// must echo back.
pub const SD_IF_COND_CHECK_ARG: u32 = 0x0000_01AA;
/// ACMD41 host-capacity-support bit.
pub const SD_ACMD41_HCS: u32 = 0x4000_0000;
/// OCR card-capacity-status bit (set on sector-addressed cards).
pub const SD_OCR_CCS: u32 = 0x4000_0000;

// Poll budgets. These are byte-time counters, not wall clock; the
// calibration notes are worst cases observed across consumer cards.

/// 8-bit cycles driven high during the power-up ramp. The spec minimum
/// is 74 clocks at 100-400 kHz; at a 25 MHz host clock that scales to
/// roughly 2500 bytes.
pub const SD_NUM_TRIES_RAMPUP: u32 = 2_500;

/// Generic response/ready poll budget.
pub const SD_NUM_TRIES: u32 = 300;

/// ACMD41/CMD1 activation budget, i.e. time until the in-idle flag
/// clears. ~11000 for a Kingston 4GB, ~10000 for a SanDisk 1GB,
/// ~6000 for a Samsung 8GB.
pub const SD_NUM_TRIES_INIT: u32 = 20_000;

/// Read-token budget, i.e. time before a data transmission starts.
/// ~300 for a SanDisk 1GB, ~600 for a Kingston 4GB, ~900 for an SP 4GB.
pub const SD_NUM_TRIES_READ: u32 = 2_000;

/// Write-busy budget, i.e. time while the card flushes a received
/// block. ~6100 for a Kingston 4GB, ~80000 for an SP 4GB, ~119000 for
/// a Samsung 8GB.
pub const SD_NUM_TRIES_WRITE: u32 = 1_000_000;

/// Erase-busy budget. ~10300 for an SP 4GB, ~120000 for a Samsung 8GB.
pub const SD_NUM_TRIES_ERASE: u32 = 1_000_000;
