//! Deterministic hash-seeded embedder

use lrag_core::{Embedder, Result, DEFAULT_DIMENSION};

/// Pseudo-embedder that draws uniform samples from a generator seeded by
/// the MD5 digest of the input text.
///
/// The same text always produces the same vector, in this process and in
/// any other, so stored vectors stay valid across restarts. The vectors
/// carry no semantic meaning.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn seed(text: &str) -> u64 {
        let digest = md5::compute(text.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest.0[..8]);
        u64::from_le_bytes(bytes)
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut rng = SplitMix64::new(Self::seed(text));
        Ok((0..self.dimension).map(|_| rng.next_f32()).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// SplitMix64 generator. Fixed here rather than taken from a library so the
/// sequence for a given seed can never change underneath stored vectors.
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform sample in `[0, 1)` with 24 bits of precision
    fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_is_deterministic() {
        let embedder = HashEmbedder::default();

        let first = embedder.embed("what is x?").unwrap();
        let second = embedder.embed("what is x?").unwrap();

        assert_eq!(first.len(), 128);
        assert_eq!(first, second);
    }

    #[test]
    fn test_separate_instances_agree() {
        let a = HashEmbedder::default().embed("shared text").unwrap();
        let b = HashEmbedder::new(128).embed("shared text").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_texts_differ() {
        let embedder = HashEmbedder::default();
        let texts = ["x", "y", "alpha foo", "beta bar", "", "X"];

        let vectors: Vec<Vec<f32>> = texts.iter().map(|t| embedder.embed(t).unwrap()).collect();
        for i in 0..vectors.len() {
            for j in (i + 1)..vectors.len() {
                assert_ne!(vectors[i], vectors[j], "{:?} vs {:?}", texts[i], texts[j]);
            }
        }
    }

    #[test]
    fn test_values_in_unit_interval() {
        let vector = HashEmbedder::default().embed("range check").unwrap();
        assert!(vector.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_empty_text_embeds() {
        let vector = HashEmbedder::default().embed("").unwrap();
        assert_eq!(vector.len(), DEFAULT_DIMENSION);
    }

    #[test]
    fn test_custom_dimension() {
        let embedder = HashEmbedder::new(16);
        assert_eq!(embedder.dimension(), 16);

        let short = embedder.embed("text").unwrap();
        let long = HashEmbedder::default().embed("text").unwrap();
        assert_eq!(short.len(), 16);
        assert_eq!(short[..], long[..16]);
    }

    #[test]
    fn test_generator_known_sequence() {
        // Reference values for SplitMix64 seeded with zero.
        let mut rng = SplitMix64::new(0);
        assert_eq!(rng.next_u64(), 0xE220_A839_7B1D_CDAF);
        assert_eq!(rng.next_u64(), 0x6E78_9E6A_A1B9_65F4);
    }
}
