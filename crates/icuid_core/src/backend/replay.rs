use crate::{
    limits::*,
    raw::{CpuidRegs, RawData, LeafFamily},
};
use super::CpuidBackend;

/// Backend replaying a previously captured [`RawData`]
///
/// Leaf `4` and `0xB` are answered from the sub-leaf tables, other leaves from the basic and extended tables.
/// Leaves that weren't captured return zero, like a processor does for unsupported leaves.
#[derive(Clone, Debug)]
pub struct ReplayCpu {
    raw  : RawData,
    xcr0 : u64,
}

impl ReplayCpu {
    pub fn new(raw: RawData) -> Self {
        Self { raw, xcr0: 0 }
    }

    /// Set the value returned for `XCR0`
    pub fn with_xcr0(mut self, xcr0: u64) -> Self {
        self.xcr0 = xcr0;
        self
    }

    pub fn raw(&self) -> &RawData {
        &self.raw
    }
}

impl CpuidBackend for ReplayCpu {
    fn is_supported(&self) -> bool {
        true
    }

    fn execute_cpuid(&self, leaf: u32, subleaf: u32) -> CpuidRegs {
        let (family, idx) = match leaf {
            INTEL_DC_LEAF => (LeafFamily::IntelDc, subleaf as usize),
            INTEL_ET_LEAF => (LeafFamily::IntelEt, subleaf as usize),
            leaf if leaf >= EXTENDED_LEAF_BASE => (LeafFamily::Extended, (leaf - EXTENDED_LEAF_BASE) as usize),
            leaf => (LeafFamily::Basic, leaf as usize),
        };
        self.raw.get_stored(family, idx).unwrap_or(CpuidRegs::ZERO)
    }

    fn read_xcr0(&self) -> u64 {
        self.xcr0
    }
}
