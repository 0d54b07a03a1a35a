//! Cache geometry decoding.
//!
//! Intel parts describe their caches with the deterministic cache parameters (leaf `4`),
//! AMD parts and older Intel parts with the legacy extended leaves `0x8000_0005` and `0x8000_0006`.

use core::fmt;
use icuid_base::EnumFromIndexT;
use icuid_macros::{EnumDisplay, EnumFromIndex};

use crate::{
    raw::{CpuidRegs, RawData, LeafFamily},
    vendor::Vendor,
};

/// Associativity encoded in the 4-bit fields of leaf `0x8000_0006`, `255` means fully associative
pub const ASSOCIATIVITY_TABLE : [u32; 16] = [0, 1, 2, 0, 4, 0, 8, 0, 16, 0, 32, 48, 64, 96, 128, 255];

/// Geometry of a single cache, all fields are 0 when the cache is absent
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CacheInfo {
    /// Size in kB
    pub size_kb:       u32,
    /// Number of ways
    pub associativity: u32,
    /// Line size in bytes
    pub line_size:     u32,
}

impl CacheInfo {
    pub const fn new(size_kb: u32, associativity: u32, line_size: u32) -> Self {
        Self { size_kb, associativity, line_size }
    }

    pub const fn is_present(&self) -> bool {
        self.size_kb != 0
    }
}

impl fmt::Display for CacheInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_present() {
            return f.write_str("none");
        }
        write!(f, "{}kB, {}-way, {} byte line", self.size_kb, self.associativity, self.line_size)
    }
}

/// Cache slots reported in [`Caches`]
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumDisplay)]
pub enum CacheLevel {
    #[display("L1 D")]
    L1Data,
    #[display("L1 I")]
    L1Instruction,
    L2,
    L3,
    L4,
}

/// Caches of a processor
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Caches {
    pub l1_data:        CacheInfo,
    pub l1_instruction: CacheInfo,
    pub l2:             CacheInfo,
    pub l3:             CacheInfo,
    pub l4:             CacheInfo,
}

impl Caches {
    pub fn get(&self, level: CacheLevel) -> &CacheInfo {
        match level {
            CacheLevel::L1Data        => &self.l1_data,
            CacheLevel::L1Instruction => &self.l1_instruction,
            CacheLevel::L2            => &self.l2,
            CacheLevel::L3            => &self.l3,
            CacheLevel::L4            => &self.l4,
        }
    }

    fn get_mut(&mut self, level: CacheLevel) -> &mut CacheInfo {
        match level {
            CacheLevel::L1Data        => &mut self.l1_data,
            CacheLevel::L1Instruction => &mut self.l1_instruction,
            CacheLevel::L2            => &mut self.l2,
            CacheLevel::L3            => &mut self.l3,
            CacheLevel::L4            => &mut self.l4,
        }
    }
}

/// Cache type, as reported by leaf `4`
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumDisplay, EnumFromIndex)]
pub enum CacheType {
    /// No more caches
    Null = 0,
    Data = 1,
    Instruction = 2,
    Unified = 3,
}

/// Single deterministic cache parameter sub-leaf
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DeterministicCache {
    /// Raw cache type, `None` for reserved values
    pub ty:            Option<CacheType>,
    pub level:         u32,
    pub associativity: u32,
    pub partitions:    u32,
    pub line_size:     u32,
    pub sets:          u32,
    /// Total size in kB
    pub size_kb:       u32,
}

impl DeterministicCache {
    /// Decode a sub-leaf, returns `None` for the terminating sub-leaf (cache type 0)
    pub fn decode(regs: CpuidRegs) -> Option<Self> {
        let raw_type = regs.eax & 0x1F;
        if raw_type == 0 {
            return None;
        }

        let level = (regs.eax >> 5) & 0x7;
        let associativity = (regs.ebx >> 22) + 1;
        let partitions = ((regs.ebx >> 12) & 0x3FF) + 1;
        let line_size = (regs.ebx & 0xFFF) + 1;
        let sets = (regs.ecx as u64) + 1;

        let size = (line_size as u64).saturating_mul(sets)
            .saturating_mul(associativity as u64)
            .saturating_mul(partitions as u64) >> 10;
        Some(Self {
            ty: CacheType::from_idx(raw_type as usize),
            level,
            associativity,
            partitions,
            line_size,
            sets: u32::try_from(sets).unwrap_or(u32::MAX),
            size_kb: u32::try_from(size).unwrap_or(u32::MAX),
        })
    }

    /// Slot the cache is reported in, `None` for caches that aren't reported (e.g. an L2 instruction cache)
    pub fn slot(&self) -> Option<CacheLevel> {
        match (self.level, self.ty?) {
            (1, CacheType::Data)        => Some(CacheLevel::L1Data),
            (1, CacheType::Instruction) => Some(CacheLevel::L1Instruction),
            (2, CacheType::Unified)     => Some(CacheLevel::L2),
            (3, CacheType::Unified)     => Some(CacheLevel::L3),
            (4, CacheType::Unified)     => Some(CacheLevel::L4),
            _ => None,
        }
    }
}

/// Way the caches of a processor are decoded
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumDisplay)]
pub enum CacheStrategy {
    /// Deterministic cache parameters, leaf `4`
    #[display("deterministic")]
    Deterministic,
    /// Legacy extended leaves `0x8000_0005` and `0x8000_0006`
    #[display("legacy")]
    Legacy,
    /// The vendor has no known cache description
    #[display("none")]
    None,
}

/// Select the way the caches of a dump are decoded
pub fn cache_strategy(raw: &RawData, vendor: Vendor) -> CacheStrategy {
    match vendor {
        Vendor::Intel if raw.valid_len(LeafFamily::IntelDc) > 0 => CacheStrategy::Deterministic,
        Vendor::Intel | Vendor::Amd => CacheStrategy::Legacy,
        _ => CacheStrategy::None,
    }
}

/// Decode the caches of a dump
pub fn decode_caches(raw: &RawData, vendor: Vendor) -> Caches {
    let strategy = cache_strategy(raw, vendor);
    crate::decode_log!("Decoding caches using the {strategy} leaves");
    match strategy {
        CacheStrategy::Deterministic => decode_deterministic_caches(raw),
        CacheStrategy::Legacy        => decode_legacy_caches(raw),
        CacheStrategy::None          => Caches::default(),
    }
}

/// Decode the caches from the legacy extended leaves
pub fn decode_legacy_caches(raw: &RawData) -> Caches {
    let mut caches = Caches::default();

    if raw.has_leaf(0x8000_0005) {
        let regs = raw.extended(0x8000_0005);
        caches.l1_data = CacheInfo::new(regs.ecx >> 24, (regs.ecx >> 16) & 0xFF, regs.ecx & 0xFF);
        caches.l1_instruction = CacheInfo::new(regs.edx >> 24, (regs.edx >> 16) & 0xFF, regs.edx & 0xFF);
    }

    if raw.has_leaf(0x8000_0006) {
        let regs = raw.extended(0x8000_0006);
        caches.l2 = CacheInfo::new(regs.ecx >> 16, ASSOCIATIVITY_TABLE[((regs.ecx >> 12) & 0xF) as usize], regs.ecx & 0xFF);

        let l3_units = regs.edx >> 18;
        if l3_units != 0 {
            caches.l3 = CacheInfo::new(l3_units * 512, ASSOCIATIVITY_TABLE[((regs.edx >> 12) & 0xF) as usize], regs.edx & 0xFF);
        }
    }

    caches
}

/// Decode the caches from the deterministic cache parameters
///
/// A later sub-leaf for the same slot overwrites an earlier one.
pub fn decode_deterministic_caches(raw: &RawData) -> Caches {
    let mut caches = Caches::default();
    for (_, regs) in raw.valid_entries(LeafFamily::IntelDc) {
        let Some(cache) = DeterministicCache::decode(regs) else {
            break;
        };

        if let Some(level) = cache.slot() {
            *caches.get_mut(level) = CacheInfo::new(cache.size_kb, cache.associativity, cache.line_size);
        }
    }
    caches
}
