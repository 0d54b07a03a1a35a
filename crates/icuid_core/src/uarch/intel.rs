//! Intel codename table.

use crate::limits::UNKNOWN_UARCH;
use super::{cpu, IntelBrand, UarchRow};

const NA : i32 = -1;

/// Generic rows first, rows refined by brand, core count or cache size last, so ties keep the generic row
pub(super) const UARCH_TABLE : &[UarchRow] = &[
    UarchRow::unknown(UNKNOWN_UARCH),

    // P5
    cpu(0x05,   NA, "Pentium"),
    cpu(0x05, 0x04, "Pentium MMX"),

    // P6
    cpu(0x06, 0x01, "Pentium Pro"),
    cpu(0x06, 0x03, "Klamath"),
    cpu(0x06, 0x05, "Deschutes"),
    cpu(0x06, 0x06, "Mendocino"),
    cpu(0x06, 0x07, "Katmai"),
    cpu(0x06, 0x08, "Coppermine"),
    cpu(0x06, 0x0A, "Coppermine"),
    cpu(0x06, 0x0B, "Tualatin"),
    cpu(0x06, 0x09, "Banias"),
    cpu(0x06, 0x0D, "Dothan"),
    cpu(0x06, 0x0E, "Yonah"),

    // NetBurst
    cpu(0x0F,   NA, "Unknown NetBurst"),
    cpu(0x0F, 0x00, "Willamette"),
    cpu(0x0F, 0x01, "Willamette"),
    cpu(0x0F, 0x02, "Northwood"),
    cpu(0x0F, 0x03, "Prescott"),
    cpu(0x0F, 0x04, "Prescott"),
    cpu(0x0F, 0x06, "Presler"),

    // Core
    cpu(0x06, 0x0F, "Merom"),
    cpu(0x06, 0x16, "Merom"),
    cpu(0x06, 0x17, "Penryn"),
    cpu(0x06, 0x1D, "Dunnington (MP)"),

    // Atom
    cpu(0x06, 0x1C, "Bonnell"),
    cpu(0x06, 0x26, "Lincroft"),
    cpu(0x06, 0x35, "Cloverview"),
    cpu(0x06, 0x36, "Cedarview"),
    cpu(0x06, 0x27, "Penwell"),
    cpu(0x06, 0x5D, "SoFIA"),
    cpu(0x06, 0x5A, "Anniedale"),
    cpu(0x06, 0x4D, "Silvermont"),
    cpu(0x06, 0x4A, "Tangier"),
    cpu(0x06, 0x37, "Bay Trail"),
    cpu(0x06, 0x4C, "Airmont"),
    cpu(0x06, 0x5C, "Apollo Lake"),
    cpu(0x06, 0x5F, "Denverton"),
    cpu(0x06, 0x7A, "Gemini Lake"),
    cpu(0x06, 0x86, "Tremont"),
    cpu(0x06, 0x96, "Elkhart Lake"),
    cpu(0x06, 0x9C, "Jasper Lake"),

    // Nehalem, Westmere
    cpu(0x06, 0x1A, "Nehalem"),
    cpu(0x06, 0x1E, "Clarksfield"),
    cpu(0x06, 0x2E, "Nehalem EX"),
    cpu(0x06, 0x25, "Westmere"),
    cpu(0x06, 0x2C, "Westmere"),
    cpu(0x06, 0x2F, "Westmere EX"),

    // Sandy Bridge, Ivy Bridge
    cpu(0x06, 0x2A, "Sandy Bridge"),
    cpu(0x06, 0x2D, "Sandy Bridge-E[NP]"),
    cpu(0x06, 0x3A, "Ivy Bridge"),
    cpu(0x06, 0x3E, "Ivy Bridge E"),

    // Haswell, Broadwell
    cpu(0x06, 0x3C, "Haswell"),
    cpu(0x06, 0x3F, "Haswell-E"),
    cpu(0x06, 0x45, "Haswell-ULT"),
    cpu(0x06, 0x46, "Crystal Well"),
    cpu(0x06, 0x3D, "Broadwell"),
    cpu(0x06, 0x47, "Broadwell"),
    cpu(0x06, 0x4F, "Broadwell"),
    cpu(0x06, 0x56, "Broadwell"),

    // Skylake and derivatives
    cpu(0x06, 0x4E, "Skylake"),
    cpu(0x06, 0x5E, "Skylake"),
    cpu(0x06, 0x55, "Skylake-SP"),
    cpu(0x06, 0x8E, "Kaby Lake"),
    cpu(0x06, 0x9E, "Coffee Lake"),
    cpu(0x06, 0x9E, "Kaby Lake").stepping(0x9),
    cpu(0x06, 0xA5, "Comet Lake"),
    cpu(0x06, 0xA6, "Comet Lake"),
    cpu(0x06, 0x66, "Cannon Lake"),
    cpu(0x06, 0xA7, "Rocket Lake"),

    // Xeon Phi
    cpu(0x06, 0x57, "Knights Landing"),
    cpu(0x06, 0x85, "Knights Mill"),

    // Sunny Cove and later
    cpu(0x06, 0x7D, "Ice Lake"),
    cpu(0x06, 0x7E, "Ice Lake"),
    cpu(0x06, 0x6A, "Ice Lake-SP"),
    cpu(0x06, 0x6C, "Ice Lake-SP"),
    cpu(0x06, 0x8C, "Tiger Lake"),
    cpu(0x06, 0x8D, "Tiger Lake"),
    cpu(0x06, 0x97, "Alder Lake"),
    cpu(0x06, 0x9A, "Alder Lake"),
    cpu(0x06, 0xB7, "Raptor Lake"),
    cpu(0x06, 0xBA, "Raptor Lake"),
    cpu(0x06, 0xBF, "Raptor Lake"),
    cpu(0x06, 0x8F, "Sapphire Rapids"),
    cpu(0x06, 0xCF, "Emerald Rapids"),
    cpu(0x06, 0xAA, "Meteor Lake"),

    // Refinements
    cpu(0x0F, 0x06, "Cedar Mill").brand(IntelBrand::Pentium),
    cpu(0x06, 0x0F, "Kentsfield").cores(4),
    cpu(0x06, 0x16, "Conroe-L").l2(512),
    cpu(0x06, 0x17, "Wolfdale").brand(IntelBrand::Wolfdale),
    cpu(0x06, 0x17, "Yorkfield").brand(IntelBrand::QuadCore),
    cpu(0x06, 0x1C, "Diamondville").brand(IntelBrand::AtomDiamondville),
    cpu(0x06, 0x1C, "Silverthorne").brand(IntelBrand::AtomSilverthorne),
    cpu(0x06, 0x1C, "Pineview").brand(IntelBrand::AtomPineview),
    cpu(0x06, 0x1A, "Gainestown").brand(IntelBrand::XeonGainestown),
    cpu(0x06, 0x1A, "Bloomfield").brand(IntelBrand::CoreI7),
    cpu(0x06, 0x1A, "Bloomfield").brand(IntelBrand::XeonI7),
    cpu(0x06, 0x25, "Clarkdale").brand(IntelBrand::CoreI3),
    cpu(0x06, 0x25, "Clarkdale").brand(IntelBrand::CoreI5),
    cpu(0x06, 0x2C, "Westmere-EP").brand(IntelBrand::XeonWestmere),
    cpu(0x06, 0x2C, "Gulftown").l3(12288),
    cpu(0x06, 0x2A, "Sandy Bridge (Core i3)").brand(IntelBrand::CoreI3),
    cpu(0x06, 0x2A, "Sandy Bridge (Core i5)").brand(IntelBrand::CoreI5),
    cpu(0x06, 0x2A, "Sandy Bridge (Core i7)").brand(IntelBrand::CoreI7),
    cpu(0x06, 0x2A, "Sandy Bridge (Xeon)").brand(IntelBrand::Xeon),
    cpu(0x06, 0x3C, "Devil's Canyon").brand(IntelBrand::DevilsCanyon),
];

#[cfg(test)]
mod test {
    use crate::uarch::{best_match, UarchAttributes};
    use super::*;

    fn intel(ext_model: i32, stepping: i32, brand: IntelBrand) -> UarchAttributes {
        UarchAttributes {
            family: 6,
            model: ext_model & 0xF,
            stepping,
            ext_family: 6,
            ext_model,
            cores: 4,
            brand: brand.code(),
            ..Default::default()
        }
    }

    #[test]
    pub fn coffee_lake_and_kaby_lake_share_a_model() {
        assert_eq!(best_match(&intel(0x9E, 0xA, IntelBrand::CoreI7), UARCH_TABLE), "Coffee Lake");
        assert_eq!(best_match(&intel(0x9E, 0x9, IntelBrand::CoreI7), UARCH_TABLE), "Kaby Lake");
    }

    #[test]
    pub fn brand_refinements() {
        assert_eq!(best_match(&intel(0x2A, 7, IntelBrand::CoreI5), UARCH_TABLE), "Sandy Bridge (Core i5)");
        assert_eq!(best_match(&intel(0x2A, 7, IntelBrand::NoCode), UARCH_TABLE), "Sandy Bridge");
        assert_eq!(best_match(&intel(0x1A, 5, IntelBrand::XeonGainestown), UARCH_TABLE), "Gainestown");
        assert_eq!(best_match(&intel(0x17, 0xA, IntelBrand::Wolfdale), UARCH_TABLE), "Wolfdale");
        assert_eq!(best_match(&intel(0x3C, 3, IntelBrand::DevilsCanyon), UARCH_TABLE), "Devil's Canyon");
    }

    #[test]
    pub fn core_count_refinement() {
        let mut attrs = intel(0x0F, 0xB, IntelBrand::QuadCore);
        assert_eq!(best_match(&attrs, UARCH_TABLE), "Kentsfield");
        attrs.cores = 2;
        attrs.brand = IntelBrand::NoCode.code();
        assert_eq!(best_match(&attrs, UARCH_TABLE), "Merom");
    }

    #[test]
    pub fn netburst() {
        let attrs = UarchAttributes { family: 0xF, model: 2, ext_family: 0xF, ext_model: 2, ..Default::default() };
        assert_eq!(best_match(&attrs, UARCH_TABLE), "Northwood");
        let attrs = UarchAttributes { family: 0xF, model: 9, ext_family: 0xF, ext_model: 9, ..Default::default() };
        assert_eq!(best_match(&attrs, UARCH_TABLE), "Unknown NetBurst");
    }
}
