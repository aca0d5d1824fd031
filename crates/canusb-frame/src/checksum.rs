/// Sum of all bytes, truncated to 8 bits.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_zero() {
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn wraps_modulo_256() {
        assert_eq!(checksum(&[0xFF, 0x01]), 0x00);
        assert_eq!(checksum(&[0x80, 0x80, 0x05]), 0x05);
        let long = vec![0xFFu8; 1000];
        let expected = (1000u32 * 0xFF % 256) as u8;
        assert_eq!(checksum(&long), expected);
    }

    #[test]
    fn matches_plain_sum() {
        let data: Vec<u8> = (0..=255u8).collect();
        let sum: u32 = data.iter().map(|b| u32::from(*b)).sum();
        assert_eq!(checksum(&data), (sum % 256) as u8);
    }

    #[test]
    fn concatenation_adds() {
        let a = [0x12, 0x03, 0x01];
        let b = [0x00, 0x01, 0xF0, 0x99];
        let joined: Vec<u8> = a.iter().chain(b.iter()).copied().collect();
        assert_eq!(
            checksum(&joined),
            checksum(&a).wrapping_add(checksum(&b))
        );
    }
}
