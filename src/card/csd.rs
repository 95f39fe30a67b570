use bitflags::bitflags;

/// Decoded card-specific-data register. The register has two layouts
/// selected by its top two bits: layout 0 (standard capacity) carries a
/// 12-bit device size plus a size multiplier and the VDD current
/// limits; any other layout (high capacity) carries a 22-bit device
/// size and fixes the block length.
#[derive(Debug, Default)]
pub struct SdCsd {
    pub csd_structure: u8,
    pub spec_version: u8,
    pub data_read_access_time1: u8,
    pub data_read_access_time2: u8,
    pub transfer_speed: u8,
    pub card_command_classes: u16,
    pub read_block_length: u8,
    pub flags: u16,
    pub device_size: u32,
    pub read_current_vdd_min: u8,
    pub read_current_vdd_max: u8,
    pub write_current_vdd_min: u8,
    pub write_current_vdd_max: u8,
    pub device_size_multiplier: u8,
    pub erase_sector_size: u8,
    pub write_protect_group_size: u8,
    pub write_speed_factor: u8,
    pub write_block_length: u8,
    pub file_format: u8,
}

bitflags! {
    pub struct CsdFlags: u16 {
        const READ_BLOCK_PARTIAL = 1 << 0;          /* Partial blocks for read allowed [79:79] */
        const WRITE_BLOCK_MISALIGN = 1 << 1;        /* Write block misalignment [78:78] */
        const READ_BLOCK_MISALIGN = 1 << 2;         /* Read block misalignment [77:77] */
        const DSR_IMPLEMENTED = 1 << 3;             /* DSR implemented [76:76] */
        const ERASE_BLOCK_ENABLED = 1 << 4;         /* Erase single block enabled [46:46] */
        const WRITE_PROTECT_GROUP_ENABLED = 1 << 5; /* Write protect group enabled [31:31] */
        const WRITE_BLOCK_PARTIAL = 1 << 6;         /* Partial blocks for write allowed [21:21] */
        const FILE_FORMAT_GROUP = 1 << 7;           /* File format group [15:15] */
        const COPY = 1 << 8;                        /* Copy flag [14:14] */
        const PERMANENT_WRITE_PROTECT = 1 << 9;     /* Permanent write protection [13:13] */
        const TEMPORARY_WRITE_PROTECT = 1 << 10;    /* Temporary write protection [12:12] */
    }
}

impl SdCsd {
    /// Decode the 16-byte register image as received on the wire.
    pub fn parse(raw: &[u8; 16]) -> Self {
        let mut csd = SdCsd {
            csd_structure: (raw[0] & 0xC0) >> 6,
            spec_version: (raw[0] & 0x3C) >> 2,
            data_read_access_time1: raw[1],
            data_read_access_time2: raw[2],
            transfer_speed: raw[3],
            card_command_classes: ((raw[4] as u16) << 4) | ((raw[5] as u16 & 0xF0) >> 4),
            read_block_length: raw[5] & 0x0F,
            ..SdCsd::default()
        };

        let mut flags = CsdFlags::empty();
        if raw[6] & 0x80 != 0 {
            flags |= CsdFlags::READ_BLOCK_PARTIAL;
        }
        if raw[6] & 0x40 != 0 {
            flags |= CsdFlags::WRITE_BLOCK_MISALIGN;
        }
        if raw[6] & 0x20 != 0 {
            flags |= CsdFlags::READ_BLOCK_MISALIGN;
        }
        if raw[6] & 0x10 != 0 {
            flags |= CsdFlags::DSR_IMPLEMENTED;
        }

        if csd.csd_structure == 0 {
            // 12-bit device size spanning bytes 6-8
            csd.device_size = ((raw[6] as u32 & 0x03) << 10)
                | ((raw[7] as u32) << 2)
                | ((raw[8] as u32 & 0xC0) >> 6);
            csd.read_current_vdd_min = (raw[8] & 0x38) >> 3;
            csd.read_current_vdd_max = raw[8] & 0x07;
            csd.write_current_vdd_min = (raw[9] & 0xE0) >> 5;
            csd.write_current_vdd_max = (raw[9] & 0x1C) >> 2;
            csd.device_size_multiplier = ((raw[9] & 0x03) << 1) | ((raw[10] & 0x80) >> 7);
        } else {
            // 22-bit device size spanning bytes 7-9
            csd.device_size = ((raw[7] as u32 & 0x3F) << 16)
                | ((raw[8] as u32) << 8)
                | (raw[9] as u32);
        }

        if raw[10] & 0x40 != 0 {
            flags |= CsdFlags::ERASE_BLOCK_ENABLED;
        }
        csd.erase_sector_size = ((raw[10] & 0x3F) << 1) | ((raw[11] & 0x80) >> 7);
        csd.write_protect_group_size = raw[11] & 0x7F;
        if raw[12] & 0x80 != 0 {
            flags |= CsdFlags::WRITE_PROTECT_GROUP_ENABLED;
        }
        csd.write_speed_factor = (raw[12] & 0x1C) >> 2;
        csd.write_block_length = ((raw[12] & 0x03) << 2) | ((raw[13] & 0xC0) >> 6);
        if raw[13] & 0x20 != 0 {
            flags |= CsdFlags::WRITE_BLOCK_PARTIAL;
        }
        if raw[14] & 0x80 != 0 {
            flags |= CsdFlags::FILE_FORMAT_GROUP;
        }
        if raw[14] & 0x40 != 0 {
            flags |= CsdFlags::COPY;
        }
        if raw[14] & 0x20 != 0 {
            flags |= CsdFlags::PERMANENT_WRITE_PROTECT;
        }
        if raw[14] & 0x10 != 0 {
            flags |= CsdFlags::TEMPORARY_WRITE_PROTECT;
        }
        csd.file_format = (raw[14] & 0x0C) >> 2;
        csd.flags = flags.bits();

        csd
    }

    /// Maximum read data block length in bytes.
    pub fn block_size(&self) -> u32 {
        1 << self.read_block_length
    }

    /// Total capacity in kilobytes. Kilobytes keep the arithmetic
    /// inside 32 bits for both layouts.
    pub fn capacity_kb(&self) -> u32 {
        if self.csd_structure == 0 {
            let mut kb = (self.device_size + 1) << (self.device_size_multiplier + 2);
            if self.read_block_length > 10 {
                kb <<= self.read_block_length - 10;
            } else {
                kb >>= 10 - self.read_block_length;
            }
            kb
        } else {
            // block length is fixed at 512 in this layout
            (self.device_size + 1) * self.block_size()
        }
    }
}
