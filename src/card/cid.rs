/// Decoded card-identification register.
#[derive(Debug, Default)]
pub struct SdCid {
    pub manufacturer_id: u8,
    pub application_id: u16,
    pub product_name: [u8; 5],
    pub product_version: u8,
    pub serial_number: u32,
    /// Packed manufacturing date: bits 11-4 are years since 2000,
    /// bits 3-0 the month.
    pub manufacturing_date: u16,
}

impl SdCid {
    /// Decode the 16-byte register image as received on the wire.
    pub fn parse(raw: &[u8; 16]) -> Self {
        SdCid {
            manufacturer_id: raw[0],
            application_id: ((raw[1] as u16) << 8) | raw[2] as u16,
            product_name: [raw[3], raw[4], raw[5], raw[6], raw[7]],
            product_version: raw[8],
            serial_number: ((raw[9] as u32) << 24)
                | ((raw[10] as u32) << 16)
                | ((raw[11] as u32) << 8)
                | raw[12] as u32,
            manufacturing_date: ((raw[13] as u16 & 0x0F) << 8) | raw[14] as u16,
        }
    }
}
