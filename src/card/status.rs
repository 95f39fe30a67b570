/// Decoded 64-byte status response (ACMD13).
#[derive(Debug, Default)]
pub struct SdStatus {
    /// Currently defined bus width (0: 1 bit, 2: 4 bits).
    pub bus_width: u8,
    pub secured_mode: bool,
    pub card_type: u16,
    /// Size of the protected area, in the unit the card variant uses.
    pub protected_area_size: u32,
    pub speed_class: u8,
    pub performance_move: u8,
    /// Allocation unit size code.
    pub au_size: u8,
    /// Number of allocation units to be erased at a time.
    pub erase_size: u16,
    /// Timeout for erasing `erase_size` units, in seconds.
    pub erase_timeout: u8,
    pub erase_offset: u8,
    pub uhs_speed_grade: u8,
    pub uhs_au_size: u8,
}

impl SdStatus {
    /// Decode the 64-byte status image as received on the wire. Only
    /// the first 15 bytes carry defined fields; the rest is reserved.
    pub fn parse(raw: &[u8; 64]) -> Self {
        SdStatus {
            bus_width: (raw[0] & 0xC0) >> 6,
            secured_mode: raw[0] & 0x20 != 0,
            card_type: ((raw[2] as u16) << 8) | raw[3] as u16,
            protected_area_size: ((raw[4] as u32) << 24)
                | ((raw[5] as u32) << 16)
                | ((raw[6] as u32) << 8)
                | raw[7] as u32,
            speed_class: raw[8],
            performance_move: raw[9],
            au_size: (raw[10] & 0xF0) >> 4,
            erase_size: ((raw[11] as u16) << 8) | raw[12] as u16,
            erase_timeout: (raw[13] & 0xFC) >> 2,
            erase_offset: raw[13] & 0x03,
            uhs_speed_grade: (raw[14] & 0xF0) >> 4,
            uhs_au_size: raw[14] & 0x0F,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status() {
        let mut raw = [0u8; 64];
        raw[0] = 0x80; // 4-bit bus, not secured
        raw[2] = 0x00;
        raw[3] = 0x00; // regular SD card
        raw[4..8].copy_from_slice(&[0x03, 0xB9, 0xAC, 0xA0]);
        raw[8] = 0x04; // speed class 10
        raw[9] = 0x02;
        raw[10] = 0x90; // AU size code 9 (4 MB)
        raw[11] = 0x00;
        raw[12] = 0x10;
        raw[13] = 0x46;
        raw[14] = 0x13;

        let status = SdStatus::parse(&raw);
        assert_eq!(status.bus_width, 2);
        assert!(!status.secured_mode);
        assert_eq!(status.card_type, 0x0000);
        assert_eq!(status.protected_area_size, 0x03B9_ACA0);
        assert_eq!(status.speed_class, 0x04);
        assert_eq!(status.performance_move, 0x02);
        assert_eq!(status.au_size, 9);
        assert_eq!(status.erase_size, 16);
        assert_eq!(status.erase_timeout, 17);
        assert_eq!(status.erase_offset, 2);
        assert_eq!(status.uhs_speed_grade, 1);
        assert_eq!(status.uhs_au_size, 3);
    }
}
