use alloc::vec;
use alloc::vec::Vec;

/// An owned BACnet bit string. Bit 0 is the most significant bit of the
/// first data byte.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitString {
    pub unused_bits: u8,
    pub data: Vec<u8>,
}

impl BitString {
    pub const fn new(unused_bits: u8, data: Vec<u8>) -> Self {
        Self { unused_bits, data }
    }

    /// A bit string of `len` bits, all clear.
    pub fn with_len(len: usize) -> Self {
        let bytes = len.div_ceil(8);
        Self {
            unused_bits: (bytes * 8 - len) as u8,
            data: vec![0; bytes],
        }
    }

    /// Packs positional flags: `flags[i]` becomes bit `i`.
    pub fn from_flags(flags: &[bool]) -> Self {
        let mut bits = Self::with_len(flags.len());
        for (i, flag) in flags.iter().enumerate() {
            if *flag {
                bits.set(i);
            }
        }
        bits
    }

    /// Packs a set of bit positions. The string is just long enough to hold
    /// the highest member.
    pub fn from_members(members: &[u32]) -> Self {
        let len = members.iter().max().map_or(0, |max| *max as usize + 1);
        let mut bits = Self::with_len(len);
        for member in members {
            bits.set(*member as usize);
        }
        bits
    }

    /// Number of significant bits.
    pub fn len(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.unused_bits as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, bit: usize) -> bool {
        bit < self.len() && self.data[bit / 8] & (0x80 >> (bit % 8)) != 0
    }

    fn set(&mut self, bit: usize) {
        self.data[bit / 8] |= 0x80 >> (bit % 8);
    }
}

#[cfg(test)]
mod tests {
    use super::BitString;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    #[test]
    fn packs_flags_msb_first() {
        let bits = BitString::from_flags(&[true, false, false, true]);
        assert_eq!(bits.unused_bits, 4);
        assert_eq!(bits.data, [0b1001_0000]);
        assert_eq!(bits.len(), 4);
    }

    #[test]
    fn packs_members_across_bytes() {
        let bits = BitString::from_members(&[0, 12, 14]);
        assert_eq!(bits.len(), 15);
        assert_eq!(bits.unused_bits, 1);
        assert_eq!(bits.data, [0b1000_0000, 0b0000_1010]);
    }

    #[test]
    fn empty_members_make_empty_string() {
        let bits = BitString::from_members(&[]);
        assert!(bits.is_empty());
        assert_eq!(bits.unused_bits, 0);
        assert!(bits.data.is_empty());
    }

    proptest! {
        #[test]
        fn member_bits_are_exactly_the_members(members in proptest::collection::btree_set(0u32..200, 0..20)) {
            let members: Vec<u32> = members.into_iter().collect();
            let bits = BitString::from_members(&members);
            for bit in 0..bits.len() {
                prop_assert_eq!(bits.get(bit), members.contains(&(bit as u32)));
            }
        }

        #[test]
        fn flag_strings_keep_their_length(flags in proptest::collection::vec(any::<bool>(), 0..40)) {
            let bits = BitString::from_flags(&flags);
            prop_assert_eq!(bits.len(), flags.len());
            for (i, flag) in flags.iter().enumerate() {
                prop_assert_eq!(bits.get(i), *flag);
            }
        }
    }
}
