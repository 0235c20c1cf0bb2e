use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for deterministic obstacle placement.
///
/// A 128-bit seed for the PCG generator that draws every pipe's gap position.
/// Two simulations built from the same seed and configuration see exactly the same
/// obstacle course, which is what makes fitness values comparable between
/// controllers and runs reproducible.
///
/// The seed is written as a 32-character hex string, both by [`fmt::Display`] and
/// by its `serde` representation.
///
/// # Example
///
/// ```
/// use flappy_engine::ObstacleSeed;
/// use rand::Rng as _;
///
/// let seed: ObstacleSeed = rand::rng().random();
/// let parsed: ObstacleSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObstacleSeed([u8; 16]);

/// Error returned when parsing an [`ObstacleSeed`] from a malformed hex string.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: {reason}")]
pub struct ParseSeedError {
    input: String,
    reason: String,
}

impl ObstacleSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Creates the generator the simulation draws gap positions from.
    #[must_use]
    pub fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }

    /// Derives the seed of the `index`-th run after this one.
    ///
    /// Used to give every cohort of a generation its own course while keeping the
    /// whole set reproducible from a single seed.
    #[must_use]
    pub fn nth(self, index: u64) -> Self {
        let base = u128::from_be_bytes(self.0);
        let step = u128::from(index).wrapping_mul(0x9E37_79B9_7F4A_7C15_F39C_C060_5CED_C835);
        Self(base.wrapping_add(step).to_be_bytes())
    }
}

impl fmt::Display for ObstacleSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for ObstacleSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason: String| ParseSeedError {
            input: s.to_owned(),
            reason,
        };
        if s.len() != 32 {
            return Err(error(format!("expected 32 characters, got {}", s.len())));
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| error(e.to_string()))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for ObstacleSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObstacleSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `ObstacleSeed` values with `rng.random()`.
impl Distribution<ObstacleSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ObstacleSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ObstacleSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore as _;

    use super::*;

    #[test]
    fn test_known_value_sequential_bytes() {
        let seed = ObstacleSeed::from_bytes([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

        let deserialized: ObstacleSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, seed);
    }

    #[test]
    fn test_accepts_uppercase_hex() {
        let seed: ObstacleSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
        assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
    }

    #[test]
    fn test_rejects_malformed_hex() {
        for input in [
            "",
            "0123456789abcdef0123456789abcde",
            "0123456789abcdef0123456789abcdef0",
            "ghijklmnopqrstuvwxyzghijklmnopqr",
        ] {
            let err = input.parse::<ObstacleSeed>().unwrap_err();
            assert!(err.to_string().contains("invalid hex"));
            let json = format!("\"{input}\"");
            assert!(serde_json::from_str::<ObstacleSeed>(&json).is_err());
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let seed = ObstacleSeed::from_bytes([0x42; 16]);
        let mut rng1 = seed.rng();
        let mut rng2 = seed.rng();
        for _ in 0..20 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_nth_seeds_are_distinct() {
        let seed = ObstacleSeed::from_bytes([0; 16]);
        assert_eq!(seed.nth(0), seed);
        let seeds: Vec<_> = (0..8).map(|i| seed.nth(i)).collect();
        for (i, a) in seeds.iter().enumerate() {
            for b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
