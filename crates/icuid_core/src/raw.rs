//! Raw CPUID register dumps.

use core::fmt;
use icuid_macros::{EnumCount, EnumFromIndex, EnumDisplay, EnumFromName};

use crate::limits::*;

/// Output registers of a single CPUID invocation
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct CpuidRegs {
    pub eax : u32,
    pub ebx : u32,
    pub ecx : u32,
    pub edx : u32,
}

impl CpuidRegs {
    pub const ZERO : CpuidRegs = CpuidRegs::new(0, 0, 0, 0);

    pub const fn new(eax: u32, ebx: u32, ecx: u32, edx: u32) -> Self {
        Self { eax, ebx, ecx, edx }
    }

    /// Get the value of a register
    pub const fn get(&self, reg: Register) -> u32 {
        match reg {
            Register::Eax => self.eax,
            Register::Ebx => self.ebx,
            Register::Ecx => self.ecx,
            Register::Edx => self.edx,
        }
    }

    pub const fn is_zero(&self) -> bool {
        self.eax == 0 && self.ebx == 0 && self.ecx == 0 && self.edx == 0
    }

    /// Registers as an array, in `eax ebx ecx edx` order
    pub const fn to_array(&self) -> [u32; 4] {
        [self.eax, self.ebx, self.ecx, self.edx]
    }
}

impl From<[u32; 4]> for CpuidRegs {
    fn from(regs: [u32; 4]) -> Self {
        Self::new(regs[0], regs[1], regs[2], regs[3])
    }
}

impl fmt::Display for CpuidRegs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:08x} {:08x} {:08x} {:08x}", self.eax, self.ebx, self.ecx, self.edx))
    }
}

/// CPUID output register
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumCount, EnumFromIndex, EnumDisplay)]
pub enum Register {
    #[display("eax")]
    Eax,
    #[display("ebx")]
    Ebx,
    #[display("ecx")]
    Ecx,
    #[display("edx")]
    Edx,
}

/// Family of leaves stored in [`RawData`]
///
/// The display name is the token used in the text format.
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumCount, EnumFromIndex, EnumDisplay, EnumFromName)]
pub enum LeafFamily {
    /// Basic leaves, starting at `0`
    #[display("cpuid")]
    Basic,
    /// Extended leaves, starting at `0x8000_0000`
    #[display("cpuid_ext")]
    Extended,
    /// Deterministic cache parameters, sub-leaves of leaf `4`
    #[display("intel_dc")]
    IntelDc,
    /// Extended topology enumeration, sub-leaves of leaf `0xB`
    #[display("intel_et")]
    IntelEt,
}

impl LeafFamily {
    /// All families, in the order they are serialized
    pub const ALL : [LeafFamily; 4] = [LeafFamily::Basic, LeafFamily::Extended, LeafFamily::IntelDc, LeafFamily::IntelEt];

    /// Number of entries stored for the family
    pub const fn capacity(self) -> usize {
        match self {
            LeafFamily::Basic    => MAX_BASIC_LEAVES,
            LeafFamily::Extended => MAX_EXTENDED_LEAVES,
            LeafFamily::IntelDc  => MAX_INTEL_DC_LEVELS,
            LeafFamily::IntelEt  => MAX_INTEL_ET_LEVELS,
        }
    }

    /// Leaf and sub-leaf to issue for the entry at `idx`
    pub const fn leaf_for(self, idx: usize) -> (u32, u32) {
        match self {
            LeafFamily::Basic    => (idx as u32, 0),
            LeafFamily::Extended => (EXTENDED_LEAF_BASE + idx as u32, 0),
            LeafFamily::IntelDc  => (INTEL_DC_LEAF, idx as u32),
            LeafFamily::IntelEt  => (INTEL_ET_LEAF, idx as u32),
        }
    }
}

/// Raw register dump of a processor
///
/// Entries outside of the range reported by the processor are zero and are never trusted by the decoders,
/// all accessors return zeroed registers for them.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RawData {
    pub cpuid     : [CpuidRegs; MAX_BASIC_LEAVES],
    pub cpuid_ext : [CpuidRegs; MAX_EXTENDED_LEAVES],
    pub intel_dc  : [CpuidRegs; MAX_INTEL_DC_LEVELS],
    pub intel_et  : [CpuidRegs; MAX_INTEL_ET_LEVELS],
}

impl RawData {
    pub const fn new() -> Self {
        Self {
            cpuid: [CpuidRegs::ZERO; MAX_BASIC_LEAVES],
            cpuid_ext: [CpuidRegs::ZERO; MAX_EXTENDED_LEAVES],
            intel_dc: [CpuidRegs::ZERO; MAX_INTEL_DC_LEVELS],
            intel_et: [CpuidRegs::ZERO; MAX_INTEL_ET_LEVELS],
        }
    }

    /// Maximum basic leaf, as reported by leaf `0`
    pub const fn max_basic(&self) -> u32 {
        self.cpuid[0].eax
    }

    /// Maximum extended leaf, as reported by leaf `0x8000_0000`
    pub const fn max_extended(&self) -> u32 {
        self.cpuid_ext[0].eax
    }

    /// Get all stored entries of a family, including the ones outside of the valid range
    pub fn family(&self, family: LeafFamily) -> &[CpuidRegs] {
        match family {
            LeafFamily::Basic    => &self.cpuid,
            LeafFamily::Extended => &self.cpuid_ext,
            LeafFamily::IntelDc  => &self.intel_dc,
            LeafFamily::IntelEt  => &self.intel_et,
        }
    }

    fn family_mut(&mut self, family: LeafFamily) -> &mut [CpuidRegs] {
        match family {
            LeafFamily::Basic    => &mut self.cpuid,
            LeafFamily::Extended => &mut self.cpuid_ext,
            LeafFamily::IntelDc  => &mut self.intel_dc,
            LeafFamily::IntelEt  => &mut self.intel_et,
        }
    }

    /// Number of entries of a family that can be trusted
    ///
    /// - basic: `0..=max_basic`
    /// - extended: `0..=max_extended - 0x8000_0000`, nothing if the maximum is below `0x8000_0000`
    /// - deterministic cache: up to and including the first sub-leaf with cache type 0, only if leaf `4` is supported
    /// - extended topology: up to and including the first sub-leaf with `ebx == 0`, only if leaf `0xB` is supported
    pub fn valid_len(&self, family: LeafFamily) -> usize {
        let max_basic = self.max_basic();
        match family {
            LeafFamily::Basic => (max_basic as usize).saturating_add(1).min(MAX_BASIC_LEAVES),
            LeafFamily::Extended => {
                let max_ext = self.max_extended();
                if max_ext < EXTENDED_LEAF_BASE {
                    0
                } else {
                    ((max_ext & !EXTENDED_LEAF_BASE) as usize).saturating_add(1).min(MAX_EXTENDED_LEAVES)
                }
            },
            LeafFamily::IntelDc => if max_basic < INTEL_DC_LEAF {
                0
            } else {
                Self::terminated_len(&self.intel_dc, |regs| regs.eax & 0x1F == 0)
            },
            LeafFamily::IntelEt => if max_basic < INTEL_ET_LEAF {
                0
            } else {
                Self::terminated_len(&self.intel_et, |regs| regs.ebx == 0)
            },
        }
    }

    fn terminated_len<F: Fn(&CpuidRegs) -> bool>(regs: &[CpuidRegs], is_terminator: F) -> usize {
        regs.iter().position(is_terminator).map_or(regs.len(), |idx| idx + 1)
    }

    /// Get the entry at `idx` of a family, zero if the entry is outside of the valid range
    pub fn get(&self, family: LeafFamily, idx: usize) -> CpuidRegs {
        if idx < self.valid_len(family) {
            self.family(family)[idx]
        } else {
            CpuidRegs::ZERO
        }
    }

    /// Get the entry at `idx` of a family, ignoring the valid range
    ///
    /// Returns `None` when `idx` exceeds the capacity of the family.
    pub fn get_stored(&self, family: LeafFamily, idx: usize) -> Option<CpuidRegs> {
        self.family(family).get(idx).copied()
    }

    /// Store an entry, returns `false` if `idx` exceeds the capacity of the family
    pub fn set(&mut self, family: LeafFamily, idx: usize, regs: CpuidRegs) -> bool {
        match self.family_mut(family).get_mut(idx) {
            Some(entry) => {
                *entry = regs;
                true
            },
            None => false,
        }
    }

    /// Get a basic leaf, zero if out of range
    pub fn basic(&self, leaf: u32) -> CpuidRegs {
        self.get(LeafFamily::Basic, leaf as usize)
    }

    /// Get an extended leaf, either as an absolute leaf (`0x8000_0001`) or as an index (`1`), zero if out of range
    pub fn extended(&self, leaf: u32) -> CpuidRegs {
        self.get(LeafFamily::Extended, (leaf & !EXTENDED_LEAF_BASE) as usize)
    }

    /// Get a leaf by its absolute number, zero if out of range
    pub fn leaf(&self, leaf: u32) -> CpuidRegs {
        if leaf & EXTENDED_LEAF_BASE != 0 {
            self.extended(leaf)
        } else {
            self.basic(leaf)
        }
    }

    /// Check if a leaf, given by its absolute number, is within the reported maximum
    pub fn has_leaf(&self, leaf: u32) -> bool {
        if leaf & EXTENDED_LEAF_BASE != 0 {
            ((leaf & !EXTENDED_LEAF_BASE) as usize) < self.valid_len(LeafFamily::Extended)
        } else {
            (leaf as usize) < self.valid_len(LeafFamily::Basic)
        }
    }

    /// Deterministic cache parameter sub-leaf, zero if out of range
    pub fn intel_dc(&self, subleaf: usize) -> CpuidRegs {
        self.get(LeafFamily::IntelDc, subleaf)
    }

    /// Extended topology sub-leaf, zero if out of range
    pub fn intel_et(&self, subleaf: usize) -> CpuidRegs {
        self.get(LeafFamily::IntelEt, subleaf)
    }

    /// Iterate over the trusted entries of a family
    pub fn valid_entries(&self, family: LeafFamily) -> impl Iterator<Item = (usize, CpuidRegs)> + '_ {
        self.family(family).iter().copied().enumerate().take(self.valid_len(family))
    }
}

impl Default for RawData {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn with_max(max_basic: u32, max_ext: u32) -> RawData {
        let mut raw = RawData::new();
        raw.cpuid[0].eax = max_basic;
        raw.cpuid_ext[0].eax = max_ext;
        raw
    }

    #[test]
    pub fn basic_range_is_clamped() {
        let raw = with_max(0xD, 0);
        assert_eq!(raw.valid_len(LeafFamily::Basic), 14);
        let raw = with_max(0xFFFF_FFFF, 0);
        assert_eq!(raw.valid_len(LeafFamily::Basic), MAX_BASIC_LEAVES);
    }

    #[test]
    pub fn extended_range() {
        assert_eq!(with_max(1, 0).valid_len(LeafFamily::Extended), 0);
        assert_eq!(with_max(1, 0x7FFF_FFFF).valid_len(LeafFamily::Extended), 0);
        assert_eq!(with_max(1, 0x8000_0000).valid_len(LeafFamily::Extended), 1);
        assert_eq!(with_max(1, 0x8000_0008).valid_len(LeafFamily::Extended), 9);
        assert_eq!(with_max(1, 0x8000_00FF).valid_len(LeafFamily::Extended), MAX_EXTENDED_LEAVES);
    }

    #[test]
    pub fn out_of_range_reads_zero() {
        let mut raw = with_max(1, 0x8000_0001);
        raw.cpuid[2] = CpuidRegs::new(1, 2, 3, 4);
        raw.cpuid_ext[1] = CpuidRegs::new(5, 6, 7, 8);
        raw.cpuid_ext[2] = CpuidRegs::new(9, 9, 9, 9);

        assert_eq!(raw.basic(2), CpuidRegs::ZERO);
        assert_eq!(raw.get_stored(LeafFamily::Basic, 2), Some(CpuidRegs::new(1, 2, 3, 4)));
        assert_eq!(raw.extended(0x8000_0001), CpuidRegs::new(5, 6, 7, 8));
        assert_eq!(raw.leaf(0x8000_0002), CpuidRegs::ZERO);
        assert_eq!(raw.basic(1000), CpuidRegs::ZERO);
        assert!(raw.has_leaf(0x8000_0001));
        assert!(!raw.has_leaf(0x8000_0002));
    }

    #[test]
    pub fn deterministic_cache_stops_after_type_zero() {
        let mut raw = with_max(4, 0);
        raw.intel_dc[0] = CpuidRegs::new(0x121, 0, 0, 0);
        raw.intel_dc[1] = CpuidRegs::new(0x122, 0, 0, 0);
        raw.intel_dc[2] = CpuidRegs::new(0x100, 0, 0, 0);
        raw.intel_dc[3] = CpuidRegs::new(0x143, 0, 0, 0);
        assert_eq!(raw.valid_len(LeafFamily::IntelDc), 3);
        assert_eq!(raw.intel_dc(3), CpuidRegs::ZERO);

        // Not supported below leaf 4
        raw.cpuid[0].eax = 3;
        assert_eq!(raw.valid_len(LeafFamily::IntelDc), 0);
    }

    #[test]
    pub fn extended_topology_stops_after_zero_ebx() {
        let mut raw = with_max(0xB, 0);
        raw.intel_et[0] = CpuidRegs::new(1, 2, 0x100, 0);
        raw.intel_et[1] = CpuidRegs::new(4, 12, 0x201, 0);
        assert_eq!(raw.valid_len(LeafFamily::IntelEt), 3);

        raw.intel_et[2] = CpuidRegs::new(0, 1, 0x302, 0);
        raw.intel_et[3] = CpuidRegs::new(0, 1, 0x402, 0);
        assert_eq!(raw.valid_len(LeafFamily::IntelEt), MAX_INTEL_ET_LEVELS);
    }

    #[test]
    pub fn set_respects_capacity() {
        let mut raw = RawData::new();
        assert!(raw.set(LeafFamily::IntelEt, 3, CpuidRegs::new(1, 1, 1, 1)));
        assert!(!raw.set(LeafFamily::IntelEt, 4, CpuidRegs::new(1, 1, 1, 1)));
        assert!(!raw.set(LeafFamily::Basic, 999, CpuidRegs::ZERO));
    }

    #[test]
    pub fn family_tokens() {
        use icuid_base::EnumFromNameT;
        assert_eq!(LeafFamily::parse("cpuid_ext"), Some(LeafFamily::Extended));
        assert_eq!(LeafFamily::parse("intel_et"), Some(LeafFamily::IntelEt));
        assert_eq!(LeafFamily::parse("cpuid_foo"), None);
        assert_eq!(LeafFamily::IntelDc.to_string(), "intel_dc");
    }
}
