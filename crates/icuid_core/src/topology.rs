//! Core and logical processor counts.

use core::fmt;
use icuid_macros::EnumDisplay;

use crate::{
    features::{CpuFeature, FeatureSet},
    limits::INTEL_ET_LEAF,
    raw::{RawData, LeafFamily},
    vendor::Vendor,
};

/// Encoding of the raw core count fields
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CoreCountEncoding {
    /// The field holds `count - 1`
    PlusOne,
    /// The field holds `log2(count)`
    PowerOfTwo,
}

impl CoreCountEncoding {
    pub const fn decode(self, field: u32) -> u32 {
        match self {
            CoreCountEncoding::PlusOne => field.saturating_add(1),
            CoreCountEncoding::PowerOfTwo => if field < 32 { 1 << field } else { u32::MAX },
        }
    }
}

/// Encoding of leaf 4 `EAX[31:26]`
pub const INTEL_CORE_ENCODING : CoreCountEncoding = CoreCountEncoding::PlusOne;
/// Encoding of leaf `0x8000_0008` `ECX[7:0]`
pub const AMD_CORE_ENCODING : CoreCountEncoding = CoreCountEncoding::PlusOne;
/// Lower bound of the logical processor count when the core count is unusable
pub const LOGICAL_FALLBACK_MIN : u32 = 1;

/// Level type of an extended topology sub-leaf
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumDisplay)]
pub enum TopologyLevel {
    Invalid,
    Thread,
    Core,
    /// Levels above the core (module, tile, die), not used for counting
    Other,
}

impl TopologyLevel {
    pub const fn from_raw(level_type: u32) -> Self {
        match level_type {
            0 => TopologyLevel::Invalid,
            1 => TopologyLevel::Thread,
            2 => TopologyLevel::Core,
            _ => TopologyLevel::Other,
        }
    }
}

/// Way the topology was decoded
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumDisplay)]
pub enum TopologySource {
    /// Extended topology enumeration (leaf `0xB`)
    #[display("extended topology leaf")]
    ExtendedTopology,
    /// Legacy fields of leaf 1 and the vendor's core count field
    #[display("legacy fields")]
    Legacy,
}

/// Processor topology
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Topology {
    /// Number of physical cores
    pub cores:        u32,
    /// Number of logical processors
    pub logical_cpus: u32,
    pub source:       TopologySource,
}

impl Topology {
    pub const fn new(cores: u32, logical_cpus: u32, source: TopologySource) -> Self {
        Self { cores, logical_cpus, source }
    }

    /// Threads per core, 1 when the counts aren't consistent
    pub fn threads_per_core(&self) -> u32 {
        if self.cores != 0 && self.logical_cpus % self.cores == 0 {
            self.logical_cpus / self.cores
        } else {
            1
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cores, {} logical processors (from {})", self.cores, self.logical_cpus, self.source)
    }
}

/// Decode the topology from the extended topology enumeration
///
/// Every valid sub-leaf is walked, the last count reported for a level is kept.
/// Returns `None` unless both the thread and the core level report a count.
pub fn decode_extended_topology(raw: &RawData) -> Option<Topology> {
    if raw.max_basic() < INTEL_ET_LEAF {
        return None;
    }

    let mut threads = 0;
    let mut logical = 0;
    for (_, regs) in raw.valid_entries(LeafFamily::IntelEt) {
        let count = regs.ebx & 0xFFFF;
        match TopologyLevel::from_raw((regs.ecx >> 8) & 0xFF) {
            TopologyLevel::Thread => threads = count,
            TopologyLevel::Core => logical = count,
            _ => (),
        }
    }

    if threads == 0 || logical == 0 {
        return None;
    }
    Some(Topology::new(logical / threads, logical, TopologySource::ExtendedTopology))
}

/// Decode the topology from the legacy fields
///
/// - logical processors: leaf 1 `EBX[23:16]`
/// - cores: leaf 4 `EAX[31:26]` on Intel, leaf `0x8000_0008` `ECX[7:0]` on AMD
///
/// Without hyper-threading there is a single core with a single logical processor.
pub fn decode_legacy_topology(raw: &RawData, vendor: Vendor, features: &FeatureSet) -> Topology {
    if !features.contains(CpuFeature::Ht) {
        return Topology::new(1, 1, TopologySource::Legacy);
    }

    let logical = (raw.basic(1).ebx >> 16) & 0xFF;
    let cores = match vendor {
        Vendor::Intel if raw.max_basic() >= 4 => INTEL_CORE_ENCODING.decode((raw.basic(4).eax >> 26) & 0x3F),
        Vendor::Amd if raw.has_leaf(0x8000_0008) => AMD_CORE_ENCODING.decode(raw.extended(0x8000_0008).ecx & 0xFF),
        _ => 0,
    };

    if cores > 1 {
        Topology::new(cores, logical, TopologySource::Legacy)
    } else {
        Topology::new(1, logical.max(LOGICAL_FALLBACK_MIN), TopologySource::Legacy)
    }
}

/// Refine the core count of AMD parts with topology extensions, using the threads per compute unit of leaf `0x8000_001E`
pub fn refine_amd_topology(raw: &RawData, features: &FeatureSet, topology: Topology) -> Topology {
    if !features.contains(CpuFeature::TopoExt) || !raw.has_leaf(0x8000_001E) {
        return topology;
    }

    let threads_per_core = ((raw.extended(0x8000_001E).ebx >> 8) & 0xFF) + 1;
    if threads_per_core > 1 && topology.cores % threads_per_core == 0 && topology.cores / threads_per_core >= 1 {
        Topology { cores: topology.cores / threads_per_core, ..topology }
    } else {
        topology
    }
}

/// Decode the topology of a dump
pub fn decode_topology(raw: &RawData, vendor: Vendor, features: &FeatureSet) -> Topology {
    if let Some(topology) = decode_extended_topology(raw) {
        crate::decode_log!("Topology decoded from the extended topology leaf: {topology}");
        return topology;
    }

    let mut topology = decode_legacy_topology(raw, vendor, features);
    if vendor == Vendor::Amd {
        topology = refine_amd_topology(raw, features, topology);
    }
    crate::decode_log!("Topology decoded from the legacy fields: {topology}");
    topology
}

#[cfg(test)]
mod test {
    use crate::raw::CpuidRegs;
    use super::*;

    fn ht() -> FeatureSet {
        [CpuFeature::Ht].into_iter().collect()
    }

    #[test]
    pub fn legacy_intel_with_ht() {
        let mut raw = RawData::new();
        raw.cpuid[0] = CpuidRegs::new(4, 0, 0, 0);
        raw.cpuid[1] = CpuidRegs::new(0x000906EA, 0x0010_0800, 0, 1 << 28);
        raw.cpuid[4] = CpuidRegs::new(0x1C00_4121, 0, 0, 0);

        let topology = decode_topology(&raw, Vendor::Intel, &ht());
        assert_eq!((topology.cores, topology.logical_cpus), (8, 16));
        assert_eq!(topology.source, TopologySource::Legacy);
        assert_eq!(topology.threads_per_core(), 2);
    }

    #[test]
    pub fn ht_clear_is_single_core() {
        let mut raw = RawData::new();
        raw.cpuid[0] = CpuidRegs::new(4, 0, 0, 0);
        raw.cpuid[1] = CpuidRegs::new(0x000906EA, 0x0010_0800, 0, 0);
        raw.cpuid[4] = CpuidRegs::new(0x1C00_4121, 0, 0, 0);

        let topology = decode_topology(&raw, Vendor::Intel, &FeatureSet::new());
        assert_eq!((topology.cores, topology.logical_cpus), (1, 1));
    }

    #[test]
    pub fn ht_with_single_core_keeps_logical_count() {
        let mut raw = RawData::new();
        raw.cpuid[0] = CpuidRegs::new(2, 0, 0, 0);
        raw.cpuid[1] = CpuidRegs::new(0x00000F29, 0x0002_0800, 0, 1 << 28);

        let topology = decode_topology(&raw, Vendor::Intel, &ht());
        assert_eq!((topology.cores, topology.logical_cpus), (1, 2));

        raw.cpuid[1].ebx = 0;
        let topology = decode_topology(&raw, Vendor::Intel, &ht());
        assert_eq!((topology.cores, topology.logical_cpus), (1, LOGICAL_FALLBACK_MIN));
    }

    #[test]
    pub fn extended_topology_wins() {
        let mut raw = RawData::new();
        raw.cpuid[0] = CpuidRegs::new(0x16, 0, 0, 0);
        raw.cpuid[1] = CpuidRegs::new(0x000906EA, 0x0010_0800, 0, 1 << 28);
        raw.intel_et[0] = CpuidRegs::new(1, 2, 0x100, 0);
        raw.intel_et[1] = CpuidRegs::new(4, 12, 0x201, 0);
        raw.intel_et[2] = CpuidRegs::new(0, 0, 0x2, 0);

        let topology = decode_topology(&raw, Vendor::Intel, &ht());
        assert_eq!(topology, Topology::new(6, 12, TopologySource::ExtendedTopology));
    }

    #[test]
    pub fn repeated_levels_keep_the_last_count() {
        let mut raw = RawData::new();
        raw.cpuid[0] = CpuidRegs::new(0xB, 0, 0, 0);
        raw.intel_et[0] = CpuidRegs::new(1, 2, 0x100, 0);
        raw.intel_et[1] = CpuidRegs::new(4, 8, 0x201, 0);
        raw.intel_et[2] = CpuidRegs::new(4, 16, 0x202, 0);

        assert_eq!(decode_extended_topology(&raw), Some(Topology::new(8, 16, TopologySource::ExtendedTopology)));
    }

    #[test]
    pub fn incomplete_extended_topology_falls_back() {
        let mut raw = RawData::new();
        raw.cpuid[0] = CpuidRegs::new(0xB, 0, 0, 0);
        raw.cpuid[1] = CpuidRegs::new(0x000906EA, 0x0004_0800, 0, 1 << 28);
        raw.cpuid[4] = CpuidRegs::new(0x0400_0121, 0, 0, 0);
        raw.intel_et[0] = CpuidRegs::new(1, 2, 0x100, 0);

        assert_eq!(decode_extended_topology(&raw), None);
        let topology = decode_topology(&raw, Vendor::Intel, &ht());
        assert_eq!((topology.cores, topology.logical_cpus), (2, 4));
    }

    #[test]
    pub fn amd_refined_with_topoext() {
        let mut raw = RawData::new();
        raw.cpuid[0] = CpuidRegs::new(0xD, 0, 0, 0);
        raw.cpuid[1] = CpuidRegs::new(0x00800F11, 0x0010_0800, 0, 1 << 28);
        raw.cpuid_ext[0] = CpuidRegs::new(0x8000_001F, 0, 0, 0);
        raw.cpuid_ext[8] = CpuidRegs::new(0x3030, 0, 0x400F, 0);
        raw.cpuid_ext[0x1E] = CpuidRegs::new(0, 0x0100, 0, 0);

        let without = decode_topology(&raw, Vendor::Amd, &ht());
        assert_eq!((without.cores, without.logical_cpus), (16, 16));

        let features : FeatureSet = [CpuFeature::Ht, CpuFeature::TopoExt].into_iter().collect();
        let with = decode_topology(&raw, Vendor::Amd, &features);
        assert_eq!((with.cores, with.logical_cpus), (8, 16));
    }

    #[test]
    pub fn encodings() {
        assert_eq!(CoreCountEncoding::PlusOne.decode(7), 8);
        assert_eq!(CoreCountEncoding::PowerOfTwo.decode(3), 8);
        assert_eq!(CoreCountEncoding::PowerOfTwo.decode(40), u32::MAX);
    }
}
