//! Processor identification: decoding of [`RawData`] into [`CpuInfo`].

use core::fmt::{self, Write};

use crate::{
    backend::{self, CpuidBackend, DefaultBackend},
    cache::{decode_caches, Caches},
    features::{decode_features, CpuFeature, FeatureSet},
    fmt::Indenter,
    raw::RawData,
    signature::{ProcessorType, Signature},
    strings::{BrandString, VendorString},
    topology::{decode_topology, TopologySource},
    uarch::decode_codename,
    vendor::Vendor,
    xfeatures::{decode_extended_state_features, XFeature, XFeatureSet},
    Error, LOG_CAT,
};

/// Decoded processor information
#[derive(Clone, PartialEq, Debug)]
pub struct CpuInfo {
    /// Vendor string, e.g. "GenuineIntel"
    pub vendor_str:            VendorString,
    pub vendor:                Vendor,
    /// Brand string, e.g. "Intel(R) Core(TM) i7-8700K CPU @ 3.70GHz"
    pub brand_str:             BrandString,

    pub family:                u32,
    pub model:                 u32,
    pub stepping:              u32,
    pub ext_family:            u32,
    pub ext_model:             u32,
    pub processor_type:        ProcessorType,
    /// Full leaf 1 `EAX`
    pub signature:             u32,

    pub max_basic:             u32,
    pub max_ext:               u32,

    pub features:              FeatureSet,
    /// State components enabled by the OS
    pub xfeatures:             XFeatureSet,

    /// Number of physical cores
    pub cores:                 u32,
    /// Number of logical processors
    pub logical_cpus:          u32,

    pub caches:                Caches,

    pub physical_address_bits: u32,
    pub virtual_address_bits:  u32,

    /// Micro-architecture codename, "Unknown CPU uarch" when the processor isn't recognized
    pub codename:              &'static str,
}

impl CpuInfo {
    /// Check if the processor has a feature
    pub fn has_feature(&self, feature: CpuFeature) -> bool {
        self.features.contains(feature)
    }

    /// Check if the OS has enabled a state component
    pub fn has_xfeature(&self, xfeature: XFeature) -> bool {
        self.xfeatures.contains(xfeature)
    }

    /// Signature fields, as decoded from leaf 1
    pub fn signature_fields(&self) -> Signature {
        Signature {
            raw:            self.signature,
            family:         self.family,
            model:          self.model,
            stepping:       self.stepping,
            processor_type: self.processor_type,
            ext_family:     self.ext_family,
            ext_model:      self.ext_model,
        }
    }
}

/// Decode raw data
///
/// `read_xcr0` is only called when the OS has enabled `XSAVE`.
pub fn decode<F: FnOnce() -> u64>(raw: &RawData, read_xcr0: F) -> CpuInfo {
    let vendor_str = VendorString::from_raw(raw);
    let vendor = Vendor::from_vendor_string(&vendor_str);
    let brand_str = BrandString::from_raw(raw);
    crate::decode_log!("Decoding '{brand_str}', vendor '{vendor_str}' ({vendor})");

    let signature = Signature::from_raw(raw, vendor);
    let mut features = decode_features(raw, vendor);
    let xcr0 = if features.contains(CpuFeature::Osxsave) { read_xcr0() } else { 0 };
    let xfeatures = decode_extended_state_features(xcr0, &features);

    let topology = decode_topology(raw, vendor, &features);
    if vendor == Vendor::Intel && topology.source == TopologySource::Legacy && topology.logical_cpus == 1 {
        // A single logical processor isn't hyper-threaded
        features.remove(CpuFeature::Ht);
    }
    let caches = decode_caches(raw, vendor);

    let (physical_address_bits, virtual_address_bits) = if raw.has_leaf(0x8000_0008) {
        let eax = raw.extended(0x8000_0008).eax;
        (eax & 0xFF, (eax >> 8) & 0xFF)
    } else {
        (0, 0)
    };

    let codename = decode_codename(vendor, raw.max_basic(), &signature, topology.cores, &caches, &brand_str);

    CpuInfo {
        vendor_str,
        vendor,
        brand_str,
        family: signature.family,
        model: signature.model,
        stepping: signature.stepping,
        ext_family: signature.ext_family,
        ext_model: signature.ext_model,
        processor_type: signature.processor_type,
        signature: signature.raw,
        max_basic: raw.max_basic(),
        max_ext: raw.max_extended(),
        features,
        xfeatures,
        cores: topology.cores,
        logical_cpus: topology.logical_cpus,
        caches,
        physical_address_bits,
        virtual_address_bits,
        codename,
    }
}

/// Collect the raw data of the processor the program runs on
pub fn acquire_raw() -> Result<RawData, Error> {
    acquire_raw_with(&DefaultBackend::default())
}

/// Collect the raw data of the processor behind `backend`
pub fn acquire_raw_with<B: CpuidBackend + ?Sized>(backend: &B) -> Result<RawData, Error> {
    icuid_logging::log_verbose!(LOG_CAT, "Acquiring raw CPUID data");
    backend::acquire(backend)
}

/// Identify a processor
///
/// When `raw` is `None`, the raw data of the processor the program runs on is acquired first.
pub fn identify(raw: Option<RawData>) -> Result<CpuInfo, Error> {
    identify_with(raw, &DefaultBackend::default())
}

/// Identify a processor, acquiring the raw data through `backend` when `raw` is `None`
///
/// `XCR0` is always read through `backend`.
pub fn identify_with<B: CpuidBackend + ?Sized>(raw: Option<RawData>, backend: &B) -> Result<CpuInfo, Error> {
    let raw = match raw {
        Some(raw) => raw,
        None => acquire_raw_with(backend)?,
    };
    Ok(decode(&raw, || backend.read_xcr0()))
}

fn enabled(enabled: bool) -> &'static str {
    if enabled { "Enabled" } else { "Disabled" }
}

impl fmt::Display for CpuInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = Indenter::with_spaced(f, 1);
        writeln!(f, "Vendor      : {}", self.vendor_str)?;
        writeln!(f, "Vendor ID   : {}", self.vendor.id())?;
        writeln!(f, "CPU         : {}", self.brand_str)?;

        writeln!(f, "Cores       : {}", self.cores)?;
        writeln!(f, "Logical     : {}", self.logical_cpus)?;

        writeln!(f, "Codename    : {}", self.codename)?;
        writeln!(f, "Family      : {}", self.family)?;
        writeln!(f, "Model       : {}", self.model)?;
        writeln!(f, "Stepping    : {}", self.stepping)?;
        writeln!(f, "Type        : {}", self.processor_type)?;
        writeln!(f, "Ext Family  : {}", self.ext_family)?;
        writeln!(f, "Ext Model   : {}", self.ext_model)?;
        writeln!(f, "Signature   : {:#x}", self.signature)?;

        let caches = &self.caches;
        writeln!(f, "L1 D Cache  : {}kB", caches.l1_data.size_kb)?;
        writeln!(f, "L1 I Cache  : {}kB", caches.l1_instruction.size_kb)?;
        writeln!(f, "L2 Cache    : {}kB", caches.l2.size_kb)?;
        writeln!(f, "L3 Cache    : {}kB", caches.l3.size_kb)?;
        if caches.l4.is_present() {
            writeln!(f, "L4 Cache    : {}kB", caches.l4.size_kb)?;
        }
        writeln!(f, "L1 Assoc.   : {}-way", caches.l1_data.associativity)?;
        writeln!(f, "L2 Assoc.   : {}-way", caches.l2.associativity)?;
        writeln!(f, "L3 Assoc.   : {}-way", caches.l3.associativity)?;
        writeln!(f, "L1 Line sz  : {} bytes", caches.l1_data.line_size)?;
        writeln!(f, "L2 Line sz  : {} bytes", caches.l2.line_size)?;
        writeln!(f, "L3 Line sz  : {} bytes", caches.l3.line_size)?;

        writeln!(f, "Address szs : {} bits physical, {} bits virtual", self.physical_address_bits, self.virtual_address_bits)?;

        writeln!(f, "SSE State   : {}", enabled(self.has_xfeature(XFeature::Sse)))?;
        writeln!(f, "AVX State   : {}", enabled(self.has_xfeature(XFeature::Avx)))?;

        writeln!(f, "Features    : {}", self.features)
    }
}
