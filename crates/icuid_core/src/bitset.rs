use core::{
    fmt::{self, Display},
    iter::FromIterator,
    marker::PhantomData,
    ops::{BitOr, BitOrAssign},
};

use icuid_base::{EnumCountT, EnumFromIndexT, EnumNameT};

/// Fixed size bitset, stored as `WORDS` 64-bit words
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BitSet<const WORDS: usize> {
    bits: [u64; WORDS],
}

impl<const WORDS: usize> BitSet<WORDS> {
    /// Number of bits in the bitset
    pub const BIT_COUNT : usize = WORDS * 64;

    pub const fn new() -> Self {
        Self { bits: [0; WORDS] }
    }

    /// Set the given bit.
    pub fn set(&mut self, idx: usize, set: bool) {
        let (word_idx, bit_idx) = Self::indices(idx);
        let mask = 1u64 << bit_idx;
        if set {
            self.bits[word_idx] |= mask;
        } else {
            self.bits[word_idx] &= !mask;
        };
    }

    /// Enable a bit
    pub fn enable(&mut self, idx: usize) {
        self.set(idx, true);
    }

    /// Disable a bit
    pub fn disable(&mut self, idx: usize) {
        self.set(idx, false);
    }

    /// Get the given bit.
    pub fn get(&self, idx: usize) -> bool {
        let (word_idx, bit_idx) = Self::indices(idx);
        ((self.bits[word_idx] >> bit_idx) & 0x1) != 0
    }

    /// Check if any bits are set
    pub fn any(&self) -> bool {
        self.bits.iter().any(|word| *word != 0)
    }

    /// Check if no bits are set
    pub fn none(&self) -> bool {
        !self.any()
    }

    /// Count the number of bits set to 1
    pub fn count_ones(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Iterate over the indices of all set bits, in ascending order
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter().enumerate().flat_map(|(word_idx, word)| {
            let word = *word;
            (0..64).filter(move |bit| (word >> bit) & 0x1 != 0).map(move |bit| word_idx * 64 + bit)
        })
    }

    fn indices(idx: usize) -> (usize, usize) {
        debug_assert!(idx < Self::BIT_COUNT, "Bit index out of range");
        (idx / 64, idx % 64)
    }
}

impl<const WORDS: usize> Default for BitSet<WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const WORDS: usize> BitOr for BitSet<WORDS> {
    type Output = Self;

    fn bitor(mut self, rhs: Self) -> Self::Output {
        self |= rhs;
        self
    }
}

impl<const WORDS: usize> BitOrAssign for BitSet<WORDS> {
    fn bitor_assign(&mut self, rhs: Self) {
        for (lhs, rhs) in self.bits.iter_mut().zip(rhs.bits) {
            *lhs |= rhs;
        }
    }
}

/// Set of enum variants, with one bit per variant
///
/// Iteration happens in declaration order of the enum.
pub struct EnumSet<T, const WORDS: usize> {
    bits: BitSet<WORDS>,
    _phantom: PhantomData<T>,
}

impl<T: EnumCountT + EnumFromIndexT, const WORDS: usize> EnumSet<T, WORDS> {
    pub const fn new() -> Self {
        Self { bits: BitSet::new(), _phantom: PhantomData }
    }

    /// Add a variant, returns `true` if it wasn't present yet
    pub fn insert(&mut self, val: T) -> bool {
        let idx = val.to_idx();
        let present = self.bits.get(idx);
        self.bits.enable(idx);
        !present
    }

    /// Remove a variant, returns `true` if it was present
    pub fn remove(&mut self, val: T) -> bool {
        let idx = val.to_idx();
        let present = self.bits.get(idx);
        self.bits.disable(idx);
        present
    }

    pub fn contains(&self, val: T) -> bool {
        self.bits.get(val.to_idx())
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.none()
    }

    /// Iterate over the variants in the set
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.bits.iter_ones().filter_map(T::from_idx)
    }
}

impl<T: EnumCountT + EnumFromIndexT + EnumNameT, const WORDS: usize> EnumSet<T, WORDS> {
    /// Names of the variants in the set
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.iter().map(|val| val.name())
    }
}

impl<T, const WORDS: usize> Clone for EnumSet<T, WORDS> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const WORDS: usize> Copy for EnumSet<T, WORDS> {}

impl<T, const WORDS: usize> PartialEq for EnumSet<T, WORDS> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<T, const WORDS: usize> Eq for EnumSet<T, WORDS> {}

impl<T: EnumCountT + EnumFromIndexT, const WORDS: usize> Default for EnumSet<T, WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: EnumCountT + EnumFromIndexT, const WORDS: usize> FromIterator<T> for EnumSet<T, WORDS> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for val in iter {
            set.insert(val);
        }
        set
    }
}

impl<T: EnumCountT + EnumFromIndexT, const WORDS: usize> Extend<T> for EnumSet<T, WORDS> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for val in iter {
            self.insert(val);
        }
    }
}

impl<T, const WORDS: usize> BitOr for EnumSet<T, WORDS> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self { bits: self.bits | rhs.bits, _phantom: PhantomData }
    }
}

impl<T: EnumCountT + EnumFromIndexT + fmt::Debug, const WORDS: usize> fmt::Debug for EnumSet<T, WORDS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Space separated list of the names of the variants in the set
impl<T: EnumCountT + EnumFromIndexT + EnumNameT, const WORDS: usize> Display for EnumSet<T, WORDS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, name) in self.names().enumerate() {
            if idx != 0 {
                f.write_str(" ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}
