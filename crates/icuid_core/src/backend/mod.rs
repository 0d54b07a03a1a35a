//! Execution of the CPUID instruction, and acquisition of [`RawData`].

use cfg_if::cfg_if;

use crate::{
    limits::*,
    raw::{CpuidRegs, RawData, LeafFamily},
    Error,
};

#[cfg(feature = "host")]
mod host;
mod replay;

#[cfg(feature = "host")]
pub use host::HostCpu;
pub use replay::ReplayCpu;

/// Capability to execute CPUID on a processor
pub trait CpuidBackend {
    /// Check if the processor supports the CPUID instruction
    fn is_supported(&self) -> bool;

    /// Execute CPUID with `eax = leaf` and `ecx = subleaf`
    fn execute_cpuid(&self, leaf: u32, subleaf: u32) -> CpuidRegs;

    /// Read the `XCR0` extended control register.
    ///
    /// Only called when the OS has enabled `XSAVE` (`OSXSAVE` is set).
    fn read_xcr0(&self) -> u64;
}

impl<B: CpuidBackend + ?Sized> CpuidBackend for &B {
    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    fn execute_cpuid(&self, leaf: u32, subleaf: u32) -> CpuidRegs {
        (**self).execute_cpuid(leaf, subleaf)
    }

    fn read_xcr0(&self) -> u64 {
        (**self).read_xcr0()
    }
}

/// Backend for builds that can't execute CPUID, every acquisition fails with [`Error::Unsupported`]
#[derive(Clone, Copy, Default, Debug)]
pub struct NoCpuid;

impl CpuidBackend for NoCpuid {
    fn is_supported(&self) -> bool {
        false
    }

    fn execute_cpuid(&self, _leaf: u32, _subleaf: u32) -> CpuidRegs {
        CpuidRegs::ZERO
    }

    fn read_xcr0(&self) -> u64 {
        0
    }
}

cfg_if! {
    if #[cfg(feature = "host")] {
        /// Backend used when no raw data is passed to [`identify`](crate::identify)
        pub type DefaultBackend = HostCpu;
    } else {
        /// Backend used when no raw data is passed to [`identify`](crate::identify)
        pub type DefaultBackend = NoCpuid;
    }
}

/// Collect all leaves of the processor behind `backend`
///
/// The leaf maximums are clamped to the capacity of the container, the deterministic cache and extended topology
/// sub-leaves are walked until their terminating sub-leaf, which is stored as well.
pub fn acquire<B: CpuidBackend + ?Sized>(backend: &B) -> Result<RawData, Error> {
    if !backend.is_supported() {
        icuid_logging::log_warning!(crate::LOG_CAT, "CPUID is not supported on this processor");
        return Err(Error::Unsupported);
    }

    let mut raw = RawData::new();
    raw.cpuid[0] = backend.execute_cpuid(0, 0);
    raw.cpuid_ext[0] = backend.execute_cpuid(EXTENDED_LEAF_BASE, 0);

    for family in [LeafFamily::Basic, LeafFamily::Extended] {
        let len = raw.valid_len(family);
        for idx in 1..len {
            let (leaf, subleaf) = family.leaf_for(idx);
            raw.set(family, idx, backend.execute_cpuid(leaf, subleaf));
        }
    }

    let max_basic = raw.max_basic();
    if max_basic as usize >= MAX_BASIC_LEAVES {
        icuid_logging::log_verbose!(crate::LOG_CAT, "Maximum basic leaf {max_basic:#x} exceeds the stored range, only the first {MAX_BASIC_LEAVES} leaves are kept");
    }
    let max_ext = raw.max_extended();
    if max_ext >= EXTENDED_LEAF_BASE && (max_ext & !EXTENDED_LEAF_BASE) as usize >= MAX_EXTENDED_LEAVES {
        icuid_logging::log_verbose!(crate::LOG_CAT, "Maximum extended leaf {max_ext:#x} exceeds the stored range, only the first {MAX_EXTENDED_LEAVES} leaves are kept");
    }

    if max_basic >= INTEL_DC_LEAF {
        walk_subleaves(backend, &mut raw, LeafFamily::IntelDc, |regs| regs.eax & 0x1F == 0);
    }
    if max_basic >= INTEL_ET_LEAF {
        walk_subleaves(backend, &mut raw, LeafFamily::IntelEt, |regs| regs.ebx == 0);
    }

    Ok(raw)
}

fn walk_subleaves<B, F>(backend: &B, raw: &mut RawData, family: LeafFamily, is_terminator: F)
where
    B: CpuidBackend + ?Sized,
    F: Fn(&CpuidRegs) -> bool
{
    for idx in 0..family.capacity() {
        let (leaf, subleaf) = family.leaf_for(idx);
        let regs = backend.execute_cpuid(leaf, subleaf);
        raw.set(family, idx, regs);
        if is_terminator(&regs) {
            break;
        }
    }
}

#[cfg(test)]
mod test {
    use core::cell::RefCell;
    use super::*;

    /// Backend that records the issued leaves
    struct Recorder {
        raw:    RawData,
        issued: RefCell<Vec<(u32, u32)>>,
    }

    impl CpuidBackend for Recorder {
        fn is_supported(&self) -> bool {
            true
        }

        fn execute_cpuid(&self, leaf: u32, subleaf: u32) -> CpuidRegs {
            self.issued.borrow_mut().push((leaf, subleaf));
            ReplayCpu::new(self.raw.clone()).execute_cpuid(leaf, subleaf)
        }

        fn read_xcr0(&self) -> u64 {
            0
        }
    }

    #[test]
    pub fn unsupported_backend_fails() {
        assert_eq!(acquire(&NoCpuid), Err(Error::Unsupported));
    }

    #[test]
    pub fn walks_leaves_up_to_the_maximum() {
        let mut raw = RawData::new();
        raw.cpuid[0] = CpuidRegs::new(0xB, 0, 0, 0);
        raw.cpuid[1] = CpuidRegs::new(0x906EA, 0, 0, 0);
        raw.cpuid_ext[0] = CpuidRegs::new(0x8000_0002, 0, 0, 0);
        raw.intel_dc[0] = CpuidRegs::new(0x121, 0, 0, 0);
        raw.intel_et[0] = CpuidRegs::new(1, 2, 0x100, 0);

        let backend = Recorder { raw, issued: RefCell::new(Vec::new()) };
        let acquired = acquire(&backend).expect("acquisition should succeed");

        let issued = backend.issued.borrow();
        assert!(issued.contains(&(0xB, 0)));
        assert!(!issued.contains(&(0xC, 0)));
        assert!(issued.contains(&(0x8000_0002, 0)));
        assert!(!issued.contains(&(0x8000_0003, 0)));
        // Stops after the first sub-leaf with cache type 0
        assert!(issued.contains(&(4, 1)));
        assert!(!issued.contains(&(4, 2)));
        // Stops after the first sub-leaf with ebx == 0
        assert!(issued.contains(&(0xB, 1)));
        assert!(!issued.contains(&(0xB, 2)));

        assert_eq!(acquired.basic(1).eax, 0x906EA);
        assert_eq!(acquired.intel_dc(0).eax, 0x121);
        assert_eq!(acquired.valid_len(LeafFamily::IntelDc), 2);
    }

    #[test]
    pub fn huge_maximums_are_clamped() {
        let mut raw = RawData::new();
        raw.cpuid[0] = CpuidRegs::new(0xFFFF_FFFF, 0, 0, 0);
        raw.cpuid_ext[0] = CpuidRegs::new(0xFFFF_FFFF, 0, 0, 0);

        let backend = Recorder { raw, issued: RefCell::new(Vec::new()) };
        assert!(acquire(&backend).is_ok());
        let issued = backend.issued.borrow();
        assert!(issued.iter().all(|(leaf, _)| *leaf < MAX_BASIC_LEAVES as u32 || (*leaf >= EXTENDED_LEAF_BASE && *leaf < EXTENDED_LEAF_BASE + MAX_EXTENDED_LEAVES as u32)));
    }
}
