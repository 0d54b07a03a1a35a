//! Coarse classification of Intel brand strings.

use icuid_macros::EnumDisplay;

use super::pattern::match_pattern;

/// Brand discriminator of Intel parts, used to tell apart processors sharing a signature
#[repr(i32)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, EnumDisplay)]
pub enum IntelBrand {
    #[default]
    #[display("no code")]
    NoCode = 0,

    Pentium = 10,
    #[display("Mobile Pentium")]
    MobilePentium = 11,

    Xeon = 20,
    #[display("Xeon MP")]
    XeonMp = 22,
    #[display("Xeon (i7)")]
    XeonI7 = 24,
    #[display("Xeon (Gainestown)")]
    XeonGainestown = 25,
    #[display("Xeon (Westmere)")]
    XeonWestmere = 26,

    #[display("Mobile Pentium M")]
    MobilePentiumM = 30,
    Celeron = 31,
    #[display("Mobile Celeron")]
    MobileCeleron = 32,

    #[display("Core Solo")]
    CoreSolo = 40,
    #[display("Mobile Core Solo")]
    MobileCoreSolo = 41,
    #[display("Core Duo")]
    CoreDuo = 42,
    #[display("Mobile Core Duo")]
    MobileCoreDuo = 43,

    Wolfdale = 50,
    Merom = 51,
    Penryn = 52,
    #[display("Quad core")]
    QuadCore = 53,
    #[display("Pentium D")]
    PentiumD = 56,

    Atom = 60,
    #[display("Atom (Silverthorne)")]
    AtomSilverthorne = 61,
    #[display("Atom (Diamondville)")]
    AtomDiamondville = 62,
    #[display("Atom (Pineview)")]
    AtomPineview = 63,
    #[display("Atom (Cedarview)")]
    AtomCedarview = 64,

    #[display("Core i3")]
    CoreI3 = 70,
    #[display("Core i5")]
    CoreI5 = 71,
    #[display("Core i7")]
    CoreI7 = 72,
    #[display("Devil's Canyon")]
    DevilsCanyon = 73,
}

impl IntelBrand {
    /// Brand code, as stored in the codename table
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Classification rule, applied when `needle` is found in the brand string
struct BrandRule {
    needle: &'static str,
    /// Checked in order, the first match refines the brand
    refine: &'static [(&'static str, IntelBrand)],
    brand:  IntelBrand,
}

impl BrandRule {
    const fn new(needle: &'static str, brand: IntelBrand) -> Self {
        Self { needle, refine: &[], brand }
    }

    const fn refined(needle: &'static str, refine: &'static [(&'static str, IntelBrand)], brand: IntelBrand) -> Self {
        Self { needle, refine, brand }
    }
}

// More specific needles come first, e.g. "Pentium(R) D CPU" before "Pentium"
const BRAND_RULES : &[BrandRule] = &[
    BrandRule::refined("Xeon", &[
        ("[EWLX]55##", IntelBrand::XeonGainestown),
        ("[EWLX]56##", IntelBrand::XeonWestmere),
        ("[EWLX]3[45]##", IntelBrand::XeonI7),
        (" MP", IntelBrand::XeonMp),
    ], IntelBrand::Xeon),
    BrandRule::refined("Atom", &[
        ("[ND]2###", IntelBrand::AtomCedarview),
        ("[ND][45]##", IntelBrand::AtomPineview),
        ("Z5##", IntelBrand::AtomSilverthorne),
        ("N2#0", IntelBrand::AtomDiamondville),
        (" [23]30", IntelBrand::AtomDiamondville),
    ], IntelBrand::Atom),
    BrandRule::refined("Core(TM) i7", &[("4790K", IntelBrand::DevilsCanyon)], IntelBrand::CoreI7),
    BrandRule::refined("Core(TM) i5", &[("4690K", IntelBrand::DevilsCanyon)], IntelBrand::CoreI5),
    BrandRule::new("Core(TM) i3", IntelBrand::CoreI3),
    BrandRule::new("Core(TM)2 Quad", IntelBrand::QuadCore),
    BrandRule::refined("Core(TM)2", &[
        ("E[78]###", IntelBrand::Wolfdale),
        ("[PT][89]###", IntelBrand::Penryn),
        ("[ET][4567]###", IntelBrand::Merom),
    ], IntelBrand::Merom),
    BrandRule::refined("Core(TM) Duo", &[("T2###", IntelBrand::MobileCoreDuo)], IntelBrand::CoreDuo),
    BrandRule::refined("Core(TM) Solo", &[("T1###", IntelBrand::MobileCoreSolo)], IntelBrand::CoreSolo),
    BrandRule::new("Pentium(R) D CPU", IntelBrand::PentiumD),
    BrandRule::new("Pentium(R) M", IntelBrand::MobilePentiumM),
    BrandRule::refined("Celeron", &[("Celeron(R) M", IntelBrand::MobileCeleron)], IntelBrand::Celeron),
    BrandRule::refined("Pentium", &[("Mobile", IntelBrand::MobilePentium)], IntelBrand::Pentium),
];

/// Classify an Intel brand string, `NoCode` when no rule applies
pub fn classify_intel_brand(brand: &str) -> IntelBrand {
    BRAND_RULES.iter()
        .find(|rule| match_pattern(brand, rule.needle))
        .map_or(IntelBrand::NoCode, |rule| {
            rule.refine.iter()
                .find(|(pattern, _)| match_pattern(brand, pattern))
                .map_or(rule.brand, |(_, brand)| *brand)
        })
}
