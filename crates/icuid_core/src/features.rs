//! Feature flag decoding.
//!
//! Every feature lives at a fixed bit of a fixed (leaf, register) pair, some of them are only defined by a single vendor.
//! The mapping is declared in [`FEATURE_TABLES`], and applied by [`decode_features`].

use icuid_base::{EnumCountT, EnumFromNameT};
use icuid_macros::{EnumCount, EnumFromIndex, EnumDisplay, EnumName, EnumFromName};

use crate::{
    bitset::EnumSet,
    raw::{RawData, Register},
    vendor::Vendor,
};

/// CPU feature
///
/// The display name is the lowercase name used in dumps and by the tool, e.g. `sse4.1`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumCount, EnumFromIndex, EnumDisplay, EnumName, EnumFromName)]
pub enum CpuFeature {
    // Leaf 1, ECX
    /// SSE3 (Prescott New Instructions)
    #[display("pni")]
    Pni,
    /// `PCLMULQDQ`
    #[display("pclmuldq")]
    Pclmuldq,
    /// 64-bit debug store
    #[display("dts64")]
    Dts64,
    /// `MONITOR` and `MWAIT`
    #[display("monitor")]
    Monitor,
    /// CPL qualified debug store
    #[display("ds_cpl")]
    DsCpl,
    /// Virtual machine extensions
    #[display("vmx")]
    Vmx,
    /// Safer mode extensions
    #[display("smx")]
    Smx,
    /// Enhanced SpeedStep
    #[display("est")]
    Est,
    /// Thermal monitor 2
    #[display("tm2")]
    Tm2,
    #[display("ssse3")]
    Ssse3,
    /// L1 context ID
    #[display("cid")]
    Cid,
    /// Silicon debug interface
    #[display("sdbg")]
    Sdbg,
    /// Fused multiply-add, 3 operand form
    #[display("fma")]
    Fma,
    /// `CMPXCHG16B`
    #[display("cx16")]
    Cx16,
    /// Can disable sending task priority messages
    #[display("xtpr")]
    Xtpr,
    /// Performance and debug capability MSR
    #[display("pdcm")]
    Pdcm,
    /// Process context identifiers
    #[display("pcid")]
    Pcid,
    /// Direct cache access for DMA writes
    #[display("dca")]
    Dca,
    #[display("sse4.1")]
    Sse41,
    #[display("sse4.2")]
    Sse42,
    #[display("x2apic")]
    X2Apic,
    /// `MOVBE`
    #[display("movbe")]
    Movbe,
    /// `POPCNT`
    #[display("popcnt")]
    Popcnt,
    /// APIC timer supports one-shot operation using a TSC deadline value
    #[display("tsc_deadline_timer")]
    TscDeadlineTimer,
    /// AES instructions
    #[display("aes")]
    Aes,
    /// `XSAVE`, `XRSTOR`, `XSETBV` and `XGETBV`
    #[display("xsave")]
    Xsave,
    /// `XSAVE` is enabled by the OS
    #[display("osxsave")]
    Osxsave,
    #[display("avx")]
    Avx,
    /// Half precision float conversions
    #[display("f16c")]
    F16c,
    /// `RDRAND`
    #[display("rdrand")]
    Rdrand,
    /// Running under a hypervisor
    #[display("hypervisor")]
    Hypervisor,

    // Leaf 1, EDX
    /// x87 FPU on chip
    #[display("fpu")]
    Fpu,
    /// Virtual 8086 mode extensions
    #[display("vme")]
    Vme,
    /// Debugging extensions
    #[display("de")]
    De,
    /// Page size extension
    #[display("pse")]
    Pse,
    /// Time stamp counter
    #[display("tsc")]
    Tsc,
    /// Model specific registers
    #[display("msr")]
    Msr,
    /// Physical address extension
    #[display("pae")]
    Pae,
    /// Machine check exception
    #[display("mce")]
    Mce,
    /// `CMPXCHG8B`
    #[display("cx8")]
    Cx8,
    /// APIC on chip
    #[display("apic")]
    Apic,
    /// `SYSENTER` and `SYSEXIT`
    #[display("sep")]
    Sep,
    /// Memory type range registers
    #[display("mtrr")]
    Mtrr,
    /// Page global enable
    #[display("pge")]
    Pge,
    /// Machine check architecture
    #[display("mca")]
    Mca,
    /// Conditional moves
    #[display("cmov")]
    Cmov,
    /// Page attribute table
    #[display("pat")]
    Pat,
    /// 36-bit page size extension
    #[display("pse36")]
    Pse36,
    /// Processor serial number
    #[display("pn")]
    Pn,
    /// `CLFLUSH`
    #[display("clflush")]
    Clflush,
    /// Debug store
    #[display("dts")]
    Dts,
    /// Thermal monitor and software controlled clock facilities
    #[display("acpi")]
    Acpi,
    #[display("mmx")]
    Mmx,
    /// `FXSAVE` and `FXRSTOR`
    #[display("fxsr")]
    Fxsr,
    #[display("sse")]
    Sse,
    #[display("sse2")]
    Sse2,
    /// Self snoop
    #[display("ss")]
    Ss,
    /// Hyper-threading, or more generally multiple logical processors per package
    #[display("ht")]
    Ht,
    /// Thermal monitor
    #[display("tm")]
    Tm,
    /// IA-64 processor emulating x86
    #[display("ia64")]
    Ia64,
    /// Pending break enable
    #[display("pbe")]
    Pbe,

    // Leaf 7, EBX
    /// `RDFSBASE`, `RDGSBASE`, `WRFSBASE` and `WRGSBASE`
    #[display("fsgsbase")]
    FsGsBase,
    /// `IA32_TSC_ADJUST` MSR
    #[display("tsc_adjust")]
    TscAdjust,
    /// Software guard extensions
    #[display("sgx")]
    Sgx,
    /// Bit manipulation instruction set 1
    #[display("bmi1")]
    Bmi1,
    /// Hardware lock elision
    #[display("hle")]
    Hle,
    #[display("avx2")]
    Avx2,
    /// Supervisor mode execution prevention
    #[display("smep")]
    Smep,
    /// Bit manipulation instruction set 2
    #[display("bmi2")]
    Bmi2,
    /// Enhanced `REP MOVSB` and `REP STOSB`
    #[display("erms")]
    Erms,
    /// `INVPCID`
    #[display("invpcid")]
    Invpcid,
    /// Restricted transactional memory
    #[display("rtm")]
    Rtm,
    /// Platform quality of service monitoring
    #[display("cqm")]
    Cqm,
    /// Memory protection extensions
    #[display("mpx")]
    Mpx,
    #[display("avx512f")]
    Avx512F,
    #[display("avx512dq")]
    Avx512Dq,
    /// `RDSEED`
    #[display("rdseed")]
    Rdseed,
    /// Multi-precision add-carry instructions
    #[display("adx")]
    Adx,
    /// Supervisor mode access prevention
    #[display("smap")]
    Smap,
    /// `PCOMMIT`
    #[display("pcommit")]
    Pcommit,
    /// `CLFLUSHOPT`
    #[display("clflushopt")]
    Clflushopt,
    /// `CLWB`
    #[display("clwb")]
    Clwb,
    #[display("avx512pf")]
    Avx512Pf,
    #[display("avx512er")]
    Avx512Er,
    #[display("avx512cd")]
    Avx512Cd,
    /// SHA extensions
    #[display("sha")]
    Sha,
    #[display("avx512bw")]
    Avx512Bw,
    #[display("avx512vl")]
    Avx512Vl,

    // Extended leaf 1, ECX
    /// `LAHF` and `SAHF` in 64-bit mode
    #[display("lahf_lm")]
    LahfLm,
    /// Core multi-processing legacy mode
    #[display("cmp_legacy")]
    CmpLegacy,
    /// Secure virtual machine
    #[display("svm")]
    Svm,
    /// Extended APIC space
    #[display("extapic")]
    ExtApic,
    /// `CR8` in 32-bit mode
    #[display("cr8_legacy")]
    Cr8Legacy,
    /// Advanced bit manipulation (`LZCNT`)
    #[display("abm")]
    Abm,
    #[display("sse4a")]
    Sse4a,
    /// Misaligned SSE mode
    #[display("misalignsse")]
    MisalignSse,
    /// `PREFETCH` and `PREFETCHW`
    #[display("3dnowprefetch")]
    Amd3dNowPrefetch,
    /// OS visible workaround
    #[display("osvw")]
    Osvw,
    /// Instruction based sampling
    #[display("ibs")]
    Ibs,
    /// Extended operation support
    #[display("xop")]
    Xop,
    /// `SKINIT` and `STGI`
    #[display("skinit")]
    Skinit,
    /// Watchdog timer
    #[display("wdt")]
    Wdt,
    /// Lightweight profiling
    #[display("lwp")]
    Lwp,
    /// Fused multiply-add, 4 operand form
    #[display("fma4")]
    Fma4,
    /// Translation cache extension
    #[display("tce")]
    Tce,
    /// `NodeId` MSR
    #[display("nodeid_msr")]
    NodeIdMsr,
    /// Trailing bit manipulation
    #[display("tbm")]
    Tbm,
    /// Topology extensions
    #[display("topoext")]
    TopoExt,
    /// Core performance counter extensions
    #[display("perfctr_core")]
    PerfCtrCore,
    /// Northbridge performance counter extensions
    #[display("perfctr_nb")]
    PerfCtrNb,
    /// Data breakpoint extensions
    #[display("bpext")]
    BpExt,
    /// L2 performance counter extensions
    #[display("perfctr_l2")]
    PerfCtrL2,
    /// `MONITORX` and `MWAITX`
    #[display("monitorx")]
    MonitorX,

    // Extended leaf 1, EDX
    /// `SYSCALL` and `SYSRET`
    #[display("syscall")]
    Syscall,
    /// No-execute bit
    #[display("nx")]
    Nx,
    /// AMD extensions to MMX
    #[display("mmxext")]
    MmxExt,
    /// `FXSAVE` and `FXRSTOR` optimizations
    #[display("fxsr_opt")]
    FxsrOpt,
    /// 1 GiB pages
    #[display("pdpe1gb")]
    Pdpe1Gb,
    /// `RDTSCP`
    #[display("rdtscp")]
    Rdtscp,
    /// Long mode
    #[display("lm")]
    Lm,
    #[display("3dnowext")]
    Amd3dNowExt,
    #[display("3dnow")]
    Amd3dNow,

    // Extended leaf 7, EDX
    /// Temperature sensor
    #[display("ts")]
    Ts,
    /// Frequency ID control
    #[display("fid")]
    Fid,
    /// Voltage ID control
    #[display("vid")]
    Vid,
    /// Thermal trip
    #[display("ttp")]
    Ttp,
    /// Hardware thermal control
    #[display("tm_amd")]
    TmAmd,
    /// Software thermal control
    #[display("stc")]
    Stc,
    /// 100 MHz multiplier control
    #[display("100mhzsteps")]
    Mhz100Steps,
    /// Hardware P-state control
    #[display("hwpstate")]
    HwPState,
    /// Invariant TSC
    #[display("constant_tsc")]
    ConstantTsc,
    /// Core performance boost
    #[display("cpb")]
    Cpb,
    /// Read-only effective frequency interface
    #[display("aperfmperf")]
    AperfMperf,
    /// Processor feedback interface
    #[display("pfi")]
    Pfi,
    /// Processor accumulator
    #[display("pa")]
    Pa,

    // Extended leaf 8, EBX
    /// `CLZERO`
    #[display("clzero")]
    Clzero,
    /// Instructions retired count
    #[display("irperf")]
    IrPerf,

    /// Secure memory encryption
    #[display("sme")]
    Sme,
    /// Speculation control (`IBRS` and `IBPB`)
    #[display("spec_ctrl")]
    SpecCtrl,
    /// Secure encrypted virtualization
    #[display("sev")]
    Sev,
    /// Page flush MSR
    #[display("page_flush")]
    PageFlush,
    /// SEV encrypted state
    #[display("sev_es")]
    SevEs,
}

impl CpuFeature {
    /// Find a feature by its canonical name
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as EnumFromNameT>::parse(name)
    }
}

/// Set of [`CpuFeature`]s
pub type FeatureSet = EnumSet<CpuFeature, 3>;

sa::const_assert!(CpuFeature::COUNT <= 3 * 64);

/// Vendor a feature bit is defined for
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumDisplay)]
pub enum VendorGate {
    /// Defined by every vendor
    Any,
    Intel,
    #[display("AMD")]
    Amd,
}

impl VendorGate {
    pub fn allows(self, vendor: Vendor) -> bool {
        match self {
            VendorGate::Any   => true,
            VendorGate::Intel => vendor == Vendor::Intel,
            VendorGate::Amd   => vendor == Vendor::Amd,
        }
    }
}

/// Mapping of a single register bit to a feature
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FeatureBit {
    pub bit:     u8,
    pub feature: CpuFeature,
    pub gate:    VendorGate,
}

/// Features of a single (leaf, register) pair
#[derive(Clone, Copy, Debug)]
pub struct FeatureTable {
    /// Absolute leaf number
    pub leaf:     u32,
    pub register: Register,
    pub bits:     &'static [FeatureBit],
}

const fn fb(bit: u8, feature: CpuFeature, gate: VendorGate) -> FeatureBit {
    FeatureBit { bit, feature, gate }
}

use CpuFeature as F;
use VendorGate::{Any as A, Intel as I, Amd as D};

const BASIC_1_ECX : &[FeatureBit] = &[
    fb( 0, F::Pni,              A),
    fb( 1, F::Pclmuldq,         A),
    fb( 2, F::Dts64,            I),
    fb( 3, F::Monitor,          A),
    fb( 4, F::DsCpl,            I),
    fb( 5, F::Vmx,              I),
    fb( 6, F::Smx,              I),
    fb( 7, F::Est,              I),
    fb( 8, F::Tm2,              I),
    fb( 9, F::Ssse3,            A),
    fb(10, F::Cid,              I),
    fb(11, F::Sdbg,             I),
    fb(12, F::Fma,              A),
    fb(13, F::Cx16,             A),
    fb(14, F::Xtpr,             I),
    fb(15, F::Pdcm,             I),
    fb(17, F::Pcid,             I),
    fb(18, F::Dca,              I),
    fb(19, F::Sse41,            A),
    fb(20, F::Sse42,            A),
    fb(21, F::X2Apic,           I),
    fb(22, F::Movbe,            A),
    fb(23, F::Popcnt,           A),
    fb(24, F::TscDeadlineTimer, I),
    fb(25, F::Aes,              A),
    fb(26, F::Xsave,            A),
    fb(27, F::Osxsave,          A),
    fb(28, F::Avx,              A),
    fb(29, F::F16c,             A),
    fb(30, F::Rdrand,           A),
    fb(31, F::Hypervisor,       A),
];

const BASIC_1_EDX : &[FeatureBit] = &[
    fb( 0, F::Fpu,     A),
    fb( 1, F::Vme,     A),
    fb( 2, F::De,      A),
    fb( 3, F::Pse,     A),
    fb( 4, F::Tsc,     A),
    fb( 5, F::Msr,     A),
    fb( 6, F::Pae,     A),
    fb( 7, F::Mce,     A),
    fb( 8, F::Cx8,     A),
    fb( 9, F::Apic,    A),
    fb(11, F::Sep,     A),
    fb(12, F::Mtrr,    A),
    fb(13, F::Pge,     A),
    fb(14, F::Mca,     A),
    fb(15, F::Cmov,    A),
    fb(16, F::Pat,     A),
    fb(17, F::Pse36,   A),
    fb(18, F::Pn,      I),
    fb(19, F::Clflush, A),
    fb(21, F::Dts,     I),
    fb(22, F::Acpi,    I),
    fb(23, F::Mmx,     A),
    fb(24, F::Fxsr,    A),
    fb(25, F::Sse,     A),
    fb(26, F::Sse2,    A),
    fb(27, F::Ss,      I),
    fb(28, F::Ht,      A),
    fb(29, F::Tm,      I),
    fb(30, F::Ia64,    I),
    fb(31, F::Pbe,     I),
];

const BASIC_7_EBX : &[FeatureBit] = &[
    fb( 0, F::FsGsBase,   A),
    fb( 1, F::TscAdjust,  I),
    fb( 2, F::Sgx,        I),
    fb( 3, F::Bmi1,       A),
    fb( 4, F::Hle,        I),
    fb( 5, F::Avx2,       A),
    fb( 7, F::Smep,       A),
    fb( 8, F::Bmi2,       A),
    fb( 9, F::Erms,       I),
    fb(10, F::Invpcid,    I),
    fb(11, F::Rtm,        I),
    fb(12, F::Cqm,        I),
    fb(14, F::Mpx,        I),
    fb(16, F::Avx512F,    I),
    fb(17, F::Avx512Dq,   I),
    fb(18, F::Rdseed,     A),
    fb(19, F::Adx,        A),
    fb(20, F::Smap,       A),
    fb(22, F::Pcommit,    I),
    fb(23, F::Clflushopt, A),
    fb(24, F::Clwb,       I),
    fb(26, F::Avx512Pf,   I),
    fb(27, F::Avx512Er,   I),
    fb(28, F::Avx512Cd,   I),
    fb(29, F::Sha,        A),
    fb(30, F::Avx512Bw,   I),
    fb(31, F::Avx512Vl,   I),
];

const BASIC_7_EDX : &[FeatureBit] = &[
    fb(26, F::SpecCtrl, A),
];

const EXT_1_ECX : &[FeatureBit] = &[
    fb( 0, F::LahfLm,           A),
    fb( 1, F::CmpLegacy,        D),
    fb( 2, F::Svm,              D),
    fb( 3, F::ExtApic,          D),
    fb( 4, F::Cr8Legacy,        D),
    fb( 5, F::Abm,              D),
    fb( 6, F::Sse4a,            D),
    fb( 7, F::MisalignSse,      D),
    fb( 8, F::Amd3dNowPrefetch, D),
    fb( 9, F::Osvw,             D),
    fb(10, F::Ibs,              D),
    fb(11, F::Xop,              D),
    fb(12, F::Skinit,           D),
    fb(13, F::Wdt,              D),
    fb(15, F::Lwp,              D),
    fb(16, F::Fma4,             D),
    fb(17, F::Tce,              D),
    fb(19, F::NodeIdMsr,        D),
    fb(21, F::Tbm,              D),
    fb(22, F::TopoExt,          D),
    fb(23, F::PerfCtrCore,      D),
    fb(24, F::PerfCtrNb,        D),
    fb(26, F::BpExt,            D),
    fb(28, F::PerfCtrL2,        D),
    fb(29, F::MonitorX,         D),
];

const EXT_1_EDX : &[FeatureBit] = &[
    fb(11, F::Syscall,     A),
    fb(20, F::Nx,          A),
    fb(22, F::MmxExt,      D),
    fb(25, F::FxsrOpt,     D),
    fb(26, F::Pdpe1Gb,     A),
    fb(27, F::Rdtscp,      A),
    fb(29, F::Lm,          A),
    fb(30, F::Amd3dNowExt, D),
    fb(31, F::Amd3dNow,    D),
];

const EXT_7_EDX : &[FeatureBit] = &[
    fb( 0, F::Ts,          D),
    fb( 1, F::Fid,         D),
    fb( 2, F::Vid,         D),
    fb( 3, F::Ttp,         D),
    fb( 4, F::TmAmd,       D),
    fb( 5, F::Stc,         D),
    fb( 6, F::Mhz100Steps, D),
    fb( 7, F::HwPState,    D),
    fb( 8, F::ConstantTsc, A),
    fb( 9, F::Cpb,         D),
    fb(10, F::AperfMperf,  D),
    fb(11, F::Pfi,         D),
    fb(12, F::Pa,          D),
];

const EXT_8_EBX : &[FeatureBit] = &[
    fb(0, F::Clzero, D),
    fb(1, F::IrPerf, D),
];

const EXT_1F_EAX : &[FeatureBit] = &[
    fb(0, F::Sme,       D),
    fb(1, F::Sev,       D),
    fb(2, F::PageFlush, D),
    fb(3, F::SevEs,     D),
];

/// All feature tables, a table is only applied when its leaf is within the reported maximum
pub const FEATURE_TABLES : &[FeatureTable] = &[
    FeatureTable { leaf: 0x0000_0001, register: Register::Ecx, bits: BASIC_1_ECX },
    FeatureTable { leaf: 0x0000_0001, register: Register::Edx, bits: BASIC_1_EDX },
    FeatureTable { leaf: 0x0000_0007, register: Register::Ebx, bits: BASIC_7_EBX },
    FeatureTable { leaf: 0x0000_0007, register: Register::Edx, bits: BASIC_7_EDX },
    FeatureTable { leaf: 0x8000_0001, register: Register::Ecx, bits: EXT_1_ECX },
    FeatureTable { leaf: 0x8000_0001, register: Register::Edx, bits: EXT_1_EDX },
    FeatureTable { leaf: 0x8000_0007, register: Register::Edx, bits: EXT_7_EDX },
    FeatureTable { leaf: 0x8000_0008, register: Register::Ebx, bits: EXT_8_EBX },
    FeatureTable { leaf: 0x8000_001F, register: Register::Eax, bits: EXT_1F_EAX },
];

/// Decode the feature flags of a dump
///
/// A bit only sets its feature when the bit's gate allows the vendor, leaves outside of the reported range are treated as all zero.
pub fn decode_features(raw: &RawData, vendor: Vendor) -> FeatureSet {
    let mut features = FeatureSet::new();
    for table in FEATURE_TABLES {
        if !raw.has_leaf(table.leaf) {
            continue;
        }

        let value = raw.leaf(table.leaf).get(table.register);
        for bit in table.bits {
            if (value >> bit.bit) & 0x1 != 0 && bit.gate.allows(vendor) {
                features.insert(bit.feature);
            }
        }
    }
    features
}

/// Find the location of a feature
pub fn feature_location(feature: CpuFeature) -> Option<(&'static FeatureTable, &'static FeatureBit)> {
    FEATURE_TABLES.iter()
        .find_map(|table| table.bits.iter().find(|bit| bit.feature == feature).map(|bit| (table, bit)))
}

#[cfg(test)]
mod test {
    use icuid_base::{EnumFromIndexT, EnumFromNameT, EnumNameT};
    use crate::raw::CpuidRegs;
    use super::*;

    fn raw_with_leaf1(ecx: u32, edx: u32) -> RawData {
        let mut raw = RawData::new();
        raw.cpuid[0] = CpuidRegs::new(1, 0, 0, 0);
        raw.cpuid[1] = CpuidRegs::new(0x906EA, 0, ecx, edx);
        raw
    }

    #[test]
    pub fn every_feature_has_exactly_one_bit() {
        for idx in 0..CpuFeature::COUNT {
            let feature = CpuFeature::from_idx(idx).expect("index within count");
            let count = FEATURE_TABLES.iter().flat_map(|table| table.bits.iter()).filter(|bit| bit.feature == feature).count();
            assert_eq!(count, 1, "{feature} is mapped {count} times");
            assert!(feature_location(feature).is_some());
        }
    }

    #[test]
    pub fn names_round_trip() {
        for idx in 0..CpuFeature::COUNT {
            let feature = CpuFeature::from_idx(idx).expect("index within count");
            assert_eq!(CpuFeature::parse(feature.name()), Some(feature));
        }
        assert_eq!(CpuFeature::Sse41.to_string(), "sse4.1");
        assert_eq!(CpuFeature::Amd3dNowPrefetch.name(), "3dnowprefetch");
        assert_eq!(CpuFeature::from_name("avx2"), Some(CpuFeature::Avx2));
        assert_eq!(CpuFeature::from_name("AVX2"), None);
    }

    #[test]
    pub fn shared_bits_apply_to_every_vendor() {
        let raw = raw_with_leaf1(1 << 0, 1 << 0);
        for vendor in [Vendor::Intel, Vendor::Amd, Vendor::Unknown] {
            let features = decode_features(&raw, vendor);
            assert!(features.contains(CpuFeature::Pni));
            assert!(features.contains(CpuFeature::Fpu));
        }
    }

    #[test]
    pub fn intel_only_bits_are_gated() {
        // VMX is bit 5 of leaf 1 ECX
        let raw = raw_with_leaf1(1 << 5, 0);
        assert!(decode_features(&raw, Vendor::Intel).contains(CpuFeature::Vmx));
        assert!(!decode_features(&raw, Vendor::Amd).contains(CpuFeature::Vmx));
        assert!(!decode_features(&raw, Vendor::Unknown).contains(CpuFeature::Vmx));
    }

    #[test]
    pub fn amd_only_bits_are_gated() {
        // SVM is bit 2 of extended leaf 1 ECX
        let mut raw = RawData::new();
        raw.cpuid_ext[0] = CpuidRegs::new(0x8000_0001, 0, 0, 0);
        raw.cpuid_ext[1] = CpuidRegs::new(0, 0, 1 << 2, 0);
        assert!(decode_features(&raw, Vendor::Amd).contains(CpuFeature::Svm));
        assert!(!decode_features(&raw, Vendor::Intel).contains(CpuFeature::Svm));
    }

    #[test]
    pub fn leaves_beyond_the_maximum_are_ignored() {
        let mut raw = raw_with_leaf1(0, 0);
        raw.cpuid[7] = CpuidRegs::new(0, 1 << 5, 0, 0);
        assert!(!decode_features(&raw, Vendor::Intel).contains(CpuFeature::Avx2));

        raw.cpuid[0].eax = 7;
        assert!(decode_features(&raw, Vendor::Intel).contains(CpuFeature::Avx2));
    }

    #[test]
    pub fn secure_memory_encryption_leaf() {
        let mut raw = RawData::new();
        raw.cpuid_ext[0] = CpuidRegs::new(0x8000_001F, 0, 0, 0);
        raw.cpuid_ext[31] = CpuidRegs::new(0b1011, 0, 0, 0);
        let features = decode_features(&raw, Vendor::Amd);
        assert_eq!(features.iter().collect::<Vec<_>>(), vec![CpuFeature::Sme, CpuFeature::Sev, CpuFeature::SevEs]);
        assert_eq!(features.to_string(), "sme sev sev_es");
    }
}
