//! CRC-16/CCITT-FALSE, the checksum closing every Pix payload (field `63`)

use crc::{CRC_16_IBM_3740, Crc};

// IBM-3740 is the catalogue name of CCITT-FALSE: poly 0x1021, init 0xFFFF, no xorout
const CCITT_FALSE: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

pub fn crc16(data: &[u8]) -> u16 {
    CCITT_FALSE.checksum(data)
}

/// Checksum of `data` as 4 uppercase hex digits, the form used on the wire
pub fn crc16_hex(data: &str) -> String {
    format!("{:04X}", crc16(data.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_value() {
        assert_eq!(crc16(b"123456789"), 0x29B1);
    }

    #[test]
    fn empty_input_is_the_init_value() {
        assert_eq!(crc16(b""), 0xFFFF);
    }

    #[test]
    fn hex_is_zero_padded_uppercase() {
        assert_eq!(crc16_hex("123456789"), "29B1");

        let hex = crc16_hex("000201");
        assert_eq!(hex.len(), 4);
        assert_eq!(hex, hex.to_uppercase());
    }

    #[test]
    fn central_bank_manual_example() {
        let body = "00020126580014br.gov.bcb.pix0136123e4567-e12b-12d1-a456-426655440000\
                    5204000053039865802BR5913Fulano de Tal6008BRASILIA62070503***6304";

        assert_eq!(crc16_hex(body), "1D3D");
    }
}
