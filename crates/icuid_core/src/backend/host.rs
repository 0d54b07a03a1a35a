use cfg_if::cfg_if;

use crate::raw::CpuidRegs;
use super::CpuidBackend;

/// Bit of leaf 1 ECX signalling that the OS has enabled `XSAVE` and `XGETBV`
const OSXSAVE_BIT : u32 = 1 << 27;

/// The processor the library is running on
#[derive(Clone, Copy, Default, Debug)]
pub struct HostCpu;

cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        use core::arch::x86_64 as arch;
    } else if #[cfg(target_arch = "x86")] {
        use core::arch::x86 as arch;
    }
}

impl CpuidBackend for HostCpu {
    fn is_supported(&self) -> bool {
        cfg_if! {
            if #[cfg(target_arch = "x86_64")] {
                true
            } else if #[cfg(target_arch = "x86")] {
                arch::has_cpuid()
            } else {
                false
            }
        }
    }

    fn execute_cpuid(&self, leaf: u32, subleaf: u32) -> CpuidRegs {
        cfg_if! {
            if #[cfg(any(target_arch = "x86_64", target_arch = "x86"))] {
                if !self.is_supported() {
                    return CpuidRegs::ZERO;
                }
                // SAFETY: CPUID is available, checked above
                let res = unsafe { arch::__cpuid_count(leaf, subleaf) };
                CpuidRegs::new(res.eax, res.ebx, res.ecx, res.edx)
            } else {
                let _ = (leaf, subleaf);
                CpuidRegs::ZERO
            }
        }
    }

    fn read_xcr0(&self) -> u64 {
        cfg_if! {
            if #[cfg(any(target_arch = "x86_64", target_arch = "x86"))] {
                // XGETBV faults when the OS hasn't enabled it, so check the processor itself instead of trusting the caller
                let max_basic = self.execute_cpuid(0, 0).eax;
                if max_basic < 1 || self.execute_cpuid(1, 0).ecx & OSXSAVE_BIT == 0 {
                    return 0;
                }
                // SAFETY: OSXSAVE is set, so XSAVE is supported and XGETBV is enabled by the OS
                unsafe { xgetbv_xcr0() }
            } else {
                let _ = OSXSAVE_BIT;
                0
            }
        }
    }
}

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
#[target_feature(enable = "xsave")]
unsafe fn xgetbv_xcr0() -> u64 {
    arch::_xgetbv(arch::_XCR_XFEATURE_ENABLED_MASK)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
    pub fn host_reports_a_vendor() {
        let cpu = HostCpu;
        if cpu.is_supported() {
            let leaf0 = cpu.execute_cpuid(0, 0);
            assert!(leaf0.ebx != 0 || leaf0.ecx != 0 || leaf0.edx != 0);
        }
    }
}
