//! Family, model and stepping decoding of leaf 1 `EAX`.

use core::fmt::{self, Write};
use icuid_base::EnumFromIndexT;
use icuid_macros::{EnumDisplay, EnumFromIndex};

use crate::{fmt::Indenter, raw::RawData, vendor::Vendor};

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumDisplay, Default, EnumFromIndex)]
pub enum ProcessorType {
    #[default]
    #[display("OEM")]
    Oem,
    #[display("Intel OverDrive")]
    IntelOverdrive,
    #[display("Dual processor")]
    DualProcessor,
    Reserved,
}

/// Processor signature
///
/// `family`, `model` and `stepping` are the raw nibbles,
/// `ext_family` and `ext_model` are the values resolved with the extended fields, following the vendor's rules.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Signature {
    /// Full leaf 1 `EAX`
    pub raw:            u32,
    pub family:         u32,
    pub model:          u32,
    pub stepping:       u32,
    pub processor_type: ProcessorType,
    pub ext_family:     u32,
    pub ext_model:      u32,
}

impl Signature {
    /// Decode a signature from leaf 1 `EAX`
    pub fn decode(eax: u32, vendor: Vendor) -> Self {
        let stepping = eax & 0xF;
        let model = (eax >> 4) & 0xF;
        let family = (eax >> 8) & 0xF;
        let processor_type = ProcessorType::from_idx_or(((eax >> 12) & 0x3) as usize, ProcessorType::Reserved);
        let raw_ext_model = (eax >> 16) & 0xF;
        let raw_ext_family = (eax >> 20) & 0xFF;

        let is_intel = vendor == Vendor::Intel;
        let is_amd = vendor == Vendor::Amd;

        let ext_family = if (is_intel || is_amd) && family == 0xF {
            family + raw_ext_family
        } else {
            family
        };

        let ext_model = if (is_intel && (family == 0x6 || family == 0xF)) || (is_amd && family == 0xF) {
            model | (raw_ext_model << 4)
        } else {
            model
        };

        Self { raw: eax, family, model, stepping, processor_type, ext_family, ext_model }
    }

    /// Decode the signature of a dump, all fields are 0 when leaf 1 isn't reported
    pub fn from_raw(raw: &RawData, vendor: Vendor) -> Self {
        if raw.max_basic() < 1 {
            return Self::default();
        }
        Self::decode(raw.basic(1).eax, vendor)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Signature {:#x}:", self.raw)?;

        let mut indenter = Indenter::new(f);
        writeln!(indenter, "Family:         {:#x} ({:#x})", self.family, self.ext_family)?;
        writeln!(indenter, "Model:          {:#x} ({:#x})", self.model, self.ext_model)?;
        writeln!(indenter, "Processor type: {}", self.processor_type)?;
        write!  (indenter, "Stepping:       {}", self.stepping)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn intel_family_6_uses_extended_model() {
        let sig = Signature::decode(0x000906EA, Vendor::Intel);
        assert_eq!(sig.family, 6);
        assert_eq!(sig.model, 0xE);
        assert_eq!(sig.stepping, 0xA);
        assert_eq!(sig.ext_family, 6);
        assert_eq!(sig.ext_model, 0x9E);
        assert_eq!(sig.processor_type, ProcessorType::Oem);
    }

    #[test]
    pub fn amd_family_f_uses_both_extended_fields() {
        let sig = Signature::decode(0x00800F11, Vendor::Amd);
        assert_eq!(sig.family, 0xF);
        assert_eq!(sig.ext_family, 0x17);
        assert_eq!(sig.model, 1);
        assert_eq!(sig.ext_model, 1);

        let sig = Signature::decode(0x00A20F10, Vendor::Amd);
        assert_eq!(sig.ext_family, 0x19);
        assert_eq!(sig.ext_model, 0x21);
    }

    #[test]
    pub fn intel_family_f_uses_both_extended_fields() {
        let sig = Signature::decode(0x00000F29, Vendor::Intel);
        assert_eq!((sig.family, sig.model, sig.stepping), (0xF, 2, 9));
        assert_eq!(sig.ext_family, 0xF);
        assert_eq!(sig.ext_model, 2);

        let sig = Signature::decode(0x00100F41, Vendor::Intel);
        assert_eq!(sig.ext_family, 0x10);
        assert_eq!(sig.ext_model, 4);

        let sig = Signature::decode(0x00020F47, Vendor::Intel);
        assert_eq!(sig.ext_family, 0xF);
        assert_eq!(sig.ext_model, 0x24);
    }

    #[test]
    pub fn amd_family_6_ignores_extended_model() {
        let sig = Signature::decode(0x00010662, Vendor::Amd);
        assert_eq!(sig.family, 6);
        assert_eq!(sig.ext_family, 6);
        assert_eq!(sig.ext_model, 6);
    }

    #[test]
    pub fn unknown_vendor_keeps_raw_values() {
        let sig = Signature::decode(0x00F10F23, Vendor::Unknown);
        assert_eq!(sig.ext_family, 0xF);
        assert_eq!(sig.ext_model, 2);
    }

    #[test]
    pub fn processor_type_field() {
        assert_eq!(Signature::decode(0x00001632, Vendor::Intel).processor_type, ProcessorType::IntelOverdrive);
        assert_eq!(Signature::decode(0x00003000, Vendor::Intel).processor_type, ProcessorType::Reserved);
    }

    #[test]
    pub fn missing_leaf_1_is_zero() {
        let mut raw = RawData::new();
        raw.cpuid[1].eax = 0x000906EA;
        assert_eq!(Signature::from_raw(&raw, Vendor::Intel), Signature::default());
    }
}
