//! Compact bitset naming which canonical validators signed a message.
//!
//! Bit `i` corresponds to position `i` of a canonical validator sequence.
//! The wire form is the big-endian byte encoding of the bitset viewed as an
//! unsigned integer: bit 0 is the least significant bit of the last byte, and
//! leading zero bytes are trimmed.

use std::fmt;

const WORD_BITS: usize = 64;

/// Growable bitset of signer indices.
#[derive(Clone, Default)]
pub struct SignerBitfield {
    words: Vec<u64>,
}

impl SignerBitfield {
    /// Create a bitfield with room for `capacity` bits, all clear.
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(WORD_BITS)],
        }
    }

    /// Create an empty bitfield.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a bitfield with the given indices set.
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut bits = Self::empty();
        for index in indices {
            bits.set(index);
        }
        bits
    }

    /// Set bit `index`, growing as needed.
    pub fn set(&mut self, index: usize) {
        let word = index / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (index % WORD_BITS);
    }

    /// Clear bit `index`.
    pub fn clear(&mut self, index: usize) {
        if let Some(word) = self.words.get_mut(index / WORD_BITS) {
            *word &= !(1u64 << (index % WORD_BITS));
        }
    }

    /// Check whether bit `index` is set.
    pub fn is_set(&self, index: usize) -> bool {
        self.words
            .get(index / WORD_BITS)
            .is_some_and(|word| word & (1u64 << (index % WORD_BITS)) != 0)
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Check whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Index of the highest set bit plus one; zero when no bit is set.
    pub fn bit_len(&self) -> usize {
        self.words
            .iter()
            .rposition(|w| *w != 0)
            .map(|i| i * WORD_BITS + (WORD_BITS - self.words[i].leading_zeros() as usize))
            .unwrap_or(0)
    }

    /// Indices of set bits, ascending.
    pub fn set_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            (0..WORD_BITS)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| i * WORD_BITS + bit)
        })
    }

    /// Encode to the big-endian wire form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let byte_len = self.bit_len().div_ceil(8);
        let mut out = vec![0u8; byte_len];
        for index in self.set_indices() {
            out[byte_len - 1 - index / 8] |= 1u8 << (index % 8);
        }
        out
    }

    /// Decode from the big-endian wire form.
    ///
    /// Leading zero bytes are accepted and ignored.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut bits = Self::new(bytes.len() * 8);
        for (pos, byte) in bytes.iter().rev().enumerate() {
            for bit in 0..8 {
                if byte & (1u8 << bit) != 0 {
                    bits.set(pos * 8 + bit);
                }
            }
        }
        bits
    }

    fn significant_words(&self) -> &[u64] {
        let len = self.words.iter().rposition(|w| *w != 0).map_or(0, |i| i + 1);
        &self.words[..len]
    }
}

impl PartialEq for SignerBitfield {
    fn eq(&self, other: &Self) -> bool {
        self.significant_words() == other.significant_words()
    }
}

impl Eq for SignerBitfield {}

impl fmt::Debug for SignerBitfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.set_indices()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_len() {
        let mut bits = SignerBitfield::new(200);
        assert_eq!(bits.bit_len(), 0);
        assert!(bits.is_empty());

        bits.set(0);
        assert_eq!(bits.bit_len(), 1);

        bits.set(130);
        assert_eq!(bits.bit_len(), 131);
        assert_eq!(bits.count_ones(), 2);

        bits.clear(130);
        assert_eq!(bits.bit_len(), 1);
    }

    #[test]
    fn test_set_grows() {
        let mut bits = SignerBitfield::empty();
        bits.set(65);
        assert!(bits.is_set(65));
        assert!(!bits.is_set(64));
        assert!(!bits.is_set(10_000));
    }

    #[test]
    fn test_set_indices_ascending() {
        let bits = SignerBitfield::from_indices([9, 0, 64, 3]);
        assert_eq!(bits.set_indices().collect::<Vec<_>>(), vec![0, 3, 9, 64]);
    }

    #[test]
    fn test_wire_form_is_big_endian() {
        let bits = SignerBitfield::from_indices([0, 9]);
        assert_eq!(bits.to_bytes(), vec![0x02, 0x01]);
        assert_eq!(SignerBitfield::from_bytes(&[0x00, 0x02, 0x01]), bits);
        assert!(SignerBitfield::empty().to_bytes().is_empty());
    }

    #[test]
    fn test_equality_ignores_capacity() {
        let mut a = SignerBitfield::new(256);
        a.set(3);
        assert_eq!(a, SignerBitfield::from_indices([3]));
        assert_eq!(SignerBitfield::new(128), SignerBitfield::empty());
    }
}
