//! Extended processor state components, as enabled by the OS in `XCR0`.

use icuid_base::EnumCountT;
use icuid_macros::{EnumCount, EnumFromIndex, EnumDisplay, EnumName, EnumFromName};

use crate::{
    bitset::EnumSet,
    features::{CpuFeature, FeatureSet},
};

/// State component of `XCR0`, the index of a variant is its bit in `XCR0`
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumCount, EnumFromIndex, EnumDisplay, EnumName, EnumFromName)]
pub enum XFeature {
    /// x87 FPU state
    #[display("fp")]
    Fp,
    /// SSE state: `XMM0-15` and `MXCSR`
    #[display("sse")]
    Sse,
    /// Upper halves of `YMM0-15`
    #[display("avx")]
    Avx,
    /// MPX bound registers
    #[display("bndregs")]
    BndRegs,
    /// MPX bound configuration and status registers
    #[display("bndcsr")]
    BndCsr,
    /// AVX-512 opmask registers
    #[display("opmask")]
    Opmask,
    /// Upper halves of `ZMM0-15`
    #[display("zmm_hi256")]
    ZmmHi256,
    /// `ZMM16-31`
    #[display("hi16_zmm")]
    Hi16Zmm,
    /// Supervisor state, managed through `IA32_XSS`
    #[display("ia32_xss")]
    Ia32Xss,
    /// Protection key rights register
    #[display("pkru")]
    Pkru,
}

/// Set of [`XFeature`]s
pub type XFeatureSet = EnumSet<XFeature, 1>;

sa::const_assert!(XFeature::COUNT <= 64);

/// Decode the state components enabled in `xcr0`
///
/// `XCR0` can only be read when the OS has enabled `XSAVE`, so without `osxsave` the result is always empty.
pub fn decode_extended_state_features(xcr0: u64, features: &FeatureSet) -> XFeatureSet {
    let mut xfeatures = XFeatureSet::new();
    if !features.contains(CpuFeature::Osxsave) {
        return xfeatures;
    }

    for bit in 0..XFeature::COUNT {
        if (xcr0 >> bit) & 0x1 != 0 {
            if let Some(xfeature) = <XFeature as icuid_base::EnumFromIndexT>::from_idx(bit) {
                xfeatures.insert(xfeature);
            }
        }
    }
    xfeatures
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn requires_osxsave() {
        let features = FeatureSet::new();
        assert!(decode_extended_state_features(0x7, &features).is_empty());
    }

    #[test]
    pub fn maps_xcr0_bits() {
        let features : FeatureSet = [CpuFeature::Xsave, CpuFeature::Osxsave].into_iter().collect();
        let xfeatures = decode_extended_state_features(0x2E7, &features);
        assert_eq!(xfeatures.iter().collect::<Vec<_>>(), vec![
            XFeature::Fp, XFeature::Sse, XFeature::Avx, XFeature::Opmask, XFeature::ZmmHi256, XFeature::Hi16Zmm, XFeature::Pkru
        ]);
    }

    #[test]
    pub fn unknown_bits_are_ignored() {
        let features : FeatureSet = [CpuFeature::Osxsave].into_iter().collect();
        let xfeatures = decode_extended_state_features(1 << 17 | 1 << 1, &features);
        assert_eq!(xfeatures.iter().collect::<Vec<_>>(), vec![XFeature::Sse]);
    }
}
