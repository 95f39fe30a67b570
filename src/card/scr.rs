use bitflags::bitflags;

/// Decoded configuration register.
#[derive(Debug, Default)]
pub struct SdScr {
    // SCR Structure [63:60]
    pub scr_structure: u8,
    // SD memory card specification version [59:56]
    pub sd_specification: u8,
    // SCR flags in ScrFlags
    pub flags: u16,
    // Security specification supported [54:52]
    pub sd_security: u8,
    // Data bus widths supported [51:48]
    pub sd_bus_widths: u8,
    // Extended security support [46:43]
    pub extended_security: u8,
    // Command support bits [33:32] 33-support CMD23, 32-support CMD20
    pub command_support: u8,
    // Reserved for manufacturer usage [31:0]
    pub reserved_for_manufacturer: u32,
}

bitflags! {
    pub struct ScrFlags: u16 {
        const DATA_STATUS_AFTER_ERASE = 1 << 0; /* Data status after erases [55:55] */
        const SD_SPECIFICATION3 = 1 << 1; /* SD specification 3.00 or higher [47:47] */
    }
}

impl SdScr {
    /// Decode the 8-byte register image as received on the wire.
    pub fn parse(raw: &[u8; 8]) -> Self {
        let mut flags = ScrFlags::empty();
        if raw[1] & 0x80 != 0 {
            flags |= ScrFlags::DATA_STATUS_AFTER_ERASE;
        }
        if raw[2] & 0x80 != 0 {
            flags |= ScrFlags::SD_SPECIFICATION3;
        }
        SdScr {
            scr_structure: (raw[0] & 0xF0) >> 4,
            sd_specification: raw[0] & 0x0F,
            flags: flags.bits(),
            sd_security: (raw[1] & 0x70) >> 4,
            sd_bus_widths: raw[1] & 0x0F,
            extended_security: (raw[2] & 0x78) >> 3,
            command_support: raw[3] & 0x03,
            reserved_for_manufacturer: ((raw[4] as u32) << 24)
                | ((raw[5] as u32) << 16)
                | ((raw[6] as u32) << 8)
                | raw[7] as u32,
        }
    }

    /// Value a sector reads as after an erase: all-ones or all-zeros.
    pub fn erased_byte(&self) -> u8 {
        if self.flags & ScrFlags::DATA_STATUS_AFTER_ERASE.bits() != 0 {
            0xFF
        } else {
            0x00
        }
    }
}
