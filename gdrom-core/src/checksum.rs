/// CRC-16/CCITT-FALSE: polynomial 0x1021, initial value 0xFFFF, MSB first,
/// no final XOR.
///
/// This is the checksum stored in the IP.BIN device information field.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Format a CRC the way IP.BIN stores it: four upper-case hex digits.
pub fn crc16_hex(crc: u16) -> String {
    format!("{:04X}", crc)
}
