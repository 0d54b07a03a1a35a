//! AMD codename table.

use crate::limits::UNKNOWN_UARCH;
use super::{cpu, UarchRow};

const NA : i32 = -1;

pub(super) const UARCH_TABLE : &[UarchRow] = &[
    UarchRow::unknown(UNKNOWN_UARCH),

    // 486
    cpu(0x04, 0x03, "Am486 DX2WT"),
    cpu(0x04, 0x07, "Am486 DX2WB"),
    cpu(0x04, 0x08, "Am486 DX4WT"),
    cpu(0x04, 0x09, "Am486 DX4WB"),
    cpu(0x04, 0x0A, "Elan SC4xx"),
    cpu(0x04, 0x0E, "Am5x86WT"),
    cpu(0x04, 0x0F, "Am5x86WB"),

    // K5, K6
    cpu(0x05,   NA, "Unknown K5"),
    cpu(0x05, 0x00, "K5"),
    cpu(0x05, 0x01, "K5"),
    cpu(0x05, 0x02, "K5"),
    cpu(0x05, 0x03, "K5"),
    cpu(0x05, 0x06, "K6"),
    cpu(0x05, 0x07, "K6"),
    cpu(0x05, 0x08, "K6-2"),
    cpu(0x05, 0x09, "K6-III"),
    cpu(0x05, 0x0D, "K6-2+"),

    // K7
    cpu(0x06, 0x01, "K7"),
    cpu(0x06, 0x02, "K7"),
    cpu(0x06, 0x03, "K7"),
    cpu(0x06, 0x04, "K7"),
    cpu(0x06, 0x06, "K7"),
    cpu(0x06, 0x07, "K7"),
    cpu(0x06, 0x08, "K7"),
    cpu(0x06, 0x0A, "K7"),

    // K8
    cpu(0x0F,   NA, "Unknown K8"),
    cpu(0x0F, 0x04, "K8"),
    cpu(0x0F, 0x05, "K8"),
    cpu(0x0F, 0x07, "K8 (Athlon 64)"),
    cpu(0x0F, 0x08, "K8"),
    cpu(0x0F, 0x0B, "K8 (Athlon 64)"),
    cpu(0x0F, 0x0C, "K8"),
    cpu(0x0F, 0x0E, "K8"),
    cpu(0x0F, 0x0F, "K8"),
    cpu(0x0F, 0x14, "K8"),
    cpu(0x0F, 0x15, "K8"),
    cpu(0x0F, 0x17, "K8"),
    cpu(0x0F, 0x1B, "K8 (Athlon 64)"),
    cpu(0x0F, 0x1C, "K8"),
    cpu(0x0F, 0x1F, "K8"),
    cpu(0x0F, 0x21, "K8 (rev. E)"),
    cpu(0x0F, 0x23, "Opteron K8 (rev. E)"),
    cpu(0x0F, 0x24, "K8 (rev. E)"),
    cpu(0x0F, 0x25, "K8 (rev. E)"),
    cpu(0x0F, 0x2B, "Athlon 64 X2 K8 (rev. E)"),
    cpu(0x0F, 0x2C, "K8 (rev. E)"),
    cpu(0x0F, 0x2F, "K8 (rev. E)"),
    cpu(0x0F, 0x41, "Opteron K8 (rev. F+)"),
    cpu(0x0F, 0x43, "K8 (rev. F+)"),
    cpu(0x0F, 0x48, "K8 (rev. F+)"),
    cpu(0x0F, 0x4B, "Athlon 64 X2 K8 (rev. F+)"),
    cpu(0x0F, 0x4C, "K8 (rev. F+)"),
    cpu(0x0F, 0x4F, "K8 (rev. F+)"),
    cpu(0x0F, 0x5D, "Opteron K8 (rev. F+)"),
    cpu(0x0F, 0x5F, "K8 (rev. F+)"),
    cpu(0x0F, 0x68, "K8 (rev. F+)"),
    cpu(0x0F, 0x6B, "K8 (rev. F+)"),
    cpu(0x0F, 0x6C, "K8 (rev. F+)"),
    cpu(0x0F, 0x6F, "K8 (rev. F+)"),
    cpu(0x0F, 0x7C, "K8 (rev. F+)"),
    cpu(0x0F, 0x7F, "K8 (rev. F+)"),
    cpu(0x0F, 0xC1, "Athlon 64 FX DC K8 (rev. F+)"),

    // K10
    cpu(0x10,   NA, "Unknown K10"),
    cpu(0x10, 0x02, "K10 (Barcelona)"),
    cpu(0x10, 0x04, "K10 (Deneb)"),
    cpu(0x10, 0x05, "K10 (Propus)"),
    cpu(0x10, 0x06, "K10 (Regor)"),
    cpu(0x10, 0x08, "K10 (Istanbul)"),
    cpu(0x10, 0x09, "K10 (Magny-Cours)"),
    cpu(0x10, 0x0A, "K10 (Thuban)"),
    cpu(0x11, 0x03, "K8 (rev. E+)"),
    cpu(0x12, 0x01, "K10 (Llano)"),

    // Bobcat
    cpu(0x14,   NA, "Unknown Bobcat"),
    cpu(0x14, 0x01, "Bobcat"),
    cpu(0x14, 0x02, "Bobcat"),

    // Bulldozer
    cpu(0x15,   NA, "Unknown Bulldozer"),
    cpu(0x15, 0x01, "Bulldozer"),
    cpu(0x15, 0x02, "Piledriver"),
    cpu(0x15, 0x10, "Piledriver"),
    cpu(0x15, 0x13, "Piledriver"),
    cpu(0x15, 0x30, "Steamroller"),
    cpu(0x15, 0x38, "Steamroller"),
    cpu(0x15, 0x60, "Excavator"),
    cpu(0x15, 0x65, "Excavator"),
    cpu(0x15, 0x70, "Excavator"),

    // Jaguar
    cpu(0x16, 0x00, "Jaguar"),
    cpu(0x16, 0x30, "Jaguar (Puma)"),

    // Zen
    cpu(0x17,   NA, "Zen"),
    cpu(0x17, 0x01, "Zen"),
    cpu(0x17, 0x11, "Zen"),
    cpu(0x17, 0x08, "Zen+"),
    cpu(0x17, 0x18, "Zen+"),
    cpu(0x17, 0x31, "Zen 2"),
    cpu(0x17, 0x60, "Zen 2"),
    cpu(0x17, 0x71, "Zen 2"),
    cpu(0x19,   NA, "Zen 3"),
    cpu(0x19, 0x01, "Zen 3"),
    cpu(0x19, 0x21, "Zen 3"),
    cpu(0x19, 0x50, "Zen 3"),
    cpu(0x19, 0x11, "Zen 4"),
    cpu(0x19, 0x61, "Zen 4"),
    cpu(0x19, 0x74, "Zen 4"),
    cpu(0x1A,   NA, "Zen 5"),
];

#[cfg(test)]
mod test {
    use crate::uarch::{best_match, UarchAttributes};
    use super::*;

    fn amd(ext_family: i32, ext_model: i32) -> UarchAttributes {
        UarchAttributes { ext_family, ext_model, ..Default::default() }
    }

    #[test]
    pub fn exact_models() {
        assert_eq!(best_match(&amd(0x0F, 0x2B), UARCH_TABLE), "Athlon 64 X2 K8 (rev. E)");
        assert_eq!(best_match(&amd(0x15, 0x02), UARCH_TABLE), "Piledriver");
        assert_eq!(best_match(&amd(0x17, 0x71), UARCH_TABLE), "Zen 2");
        assert_eq!(best_match(&amd(0x19, 0x61), UARCH_TABLE), "Zen 4");
    }

    #[test]
    pub fn unknown_models_fall_back_to_the_family() {
        assert_eq!(best_match(&amd(0x0F, 0x99), UARCH_TABLE), "Unknown K8");
        assert_eq!(best_match(&amd(0x17, 0xA0), UARCH_TABLE), "Zen");
        assert_eq!(best_match(&amd(0x1A, 0x44), UARCH_TABLE), "Zen 5");
    }

    #[test]
    pub fn unknown_families_stay_unknown() {
        assert_eq!(best_match(&amd(0x20, 0x01), UARCH_TABLE), UNKNOWN_UARCH);
    }
}
