use rand::Rng;
use serde::Serialize;

/// How injected payload bytes change from one frame to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadMode {
    /// Every byte is redrawn uniformly from 0..=255.
    Random,
    /// Every byte is incremented by one, wrapping 255 to 0.
    Incremental,
    /// The payload is sent unchanged.
    #[default]
    Fixed,
}

impl PayloadMode {
    /// Map the numeric mode selector (0 random, 1 incremental, 2 fixed).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PayloadMode::Random),
            1 => Some(PayloadMode::Incremental),
            2 => Some(PayloadMode::Fixed),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            PayloadMode::Random => 0,
            PayloadMode::Incremental => 1,
            PayloadMode::Fixed => 2,
        }
    }

    /// Apply one tick of this mode to `payload` in place.
    pub fn advance<R: Rng + ?Sized>(self, payload: &mut [u8], rng: &mut R) {
        match self {
            PayloadMode::Fixed => {}
            PayloadMode::Incremental => {
                for byte in payload.iter_mut() {
                    *byte = byte.wrapping_add(1);
                }
            }
            PayloadMode::Random => {
                for byte in payload.iter_mut() {
                    *byte = rng.gen();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn incremental_wraps() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut payload = [0xFF, 0x00];
        PayloadMode::Incremental.advance(&mut payload, &mut rng);
        assert_eq!(payload, [0x00, 0x01]);
        PayloadMode::Incremental.advance(&mut payload, &mut rng);
        assert_eq!(payload, [0x01, 0x02]);
    }

    #[test]
    fn fixed_is_unchanged() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut payload = [0x12, 0x34, 0x56];
        PayloadMode::Fixed.advance(&mut payload, &mut rng);
        assert_eq!(payload, [0x12, 0x34, 0x56]);
    }

    #[test]
    fn random_redraws_every_byte() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen_change = [false; 8];
        let original = [0u8; 8];

        for _ in 0..64 {
            let mut payload = original;
            PayloadMode::Random.advance(&mut payload, &mut rng);
            for (index, byte) in payload.iter().enumerate() {
                if *byte != original[index] {
                    seen_change[index] = true;
                }
            }
        }
        assert!(seen_change.iter().all(|changed| *changed));
    }

    #[test]
    fn random_is_reproducible_with_seed() {
        let mut a = [0u8; 4];
        let mut b = [0u8; 4];
        PayloadMode::Random.advance(&mut a, &mut StdRng::seed_from_u64(9));
        PayloadMode::Random.advance(&mut b, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn numeric_codes() {
        for mode in [PayloadMode::Random, PayloadMode::Incremental, PayloadMode::Fixed] {
            assert_eq!(PayloadMode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(PayloadMode::from_code(3), None);
        assert_eq!(PayloadMode::default(), PayloadMode::Fixed);
    }
}
