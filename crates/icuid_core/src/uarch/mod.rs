//! Micro-architecture (codename) matching.
//!
//! Each vendor has a table of [`UarchRow`]s, the decoded attributes of the processor are scored against every row,
//! and the name of the best scoring row is reported. Keys set to [`Key::NA`] don't take part in the scoring.

use core::fmt;

use crate::{
    cache::Caches,
    limits::UNKNOWN_UARCH,
    signature::Signature,
    strings::BrandString,
    vendor::Vendor,
};

mod pattern;
mod brand;
mod intel;
mod amd;

pub use pattern::match_pattern;
pub use brand::*;

/// Key of a codename table row
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Key(pub i32);

impl Key {
    /// Not applicable, never matches a decoded attribute
    pub const NA : Key = Key(-1);

    pub const fn is_na(self) -> bool {
        self.0 == Self::NA.0
    }

    /// Check if the key matches a decoded attribute
    pub const fn matches(self, value: i32) -> bool {
        !self.is_na() && self.0 == value
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_na() {
            f.write_str("NA")
        } else {
            write!(f, "{:#x}", self.0)
        }
    }
}

/// Row of a codename table
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct UarchRow {
    pub family:     Key,
    pub model:      Key,
    pub stepping:   Key,
    pub ext_family: Key,
    pub ext_model:  Key,
    pub cores:      Key,
    /// L2 size in kB
    pub l2_cache:   Key,
    /// L3 size in kB
    pub l3_cache:   Key,
    pub brand:      Key,
    pub name:       &'static str,
}

impl UarchRow {
    /// Row where every key is NA and the brand is "no code"
    pub const fn unknown(name: &'static str) -> Self {
        Self {
            family:     Key::NA,
            model:      Key::NA,
            stepping:   Key::NA,
            ext_family: Key::NA,
            ext_model:  Key::NA,
            cores:      Key::NA,
            l2_cache:   Key::NA,
            l3_cache:   Key::NA,
            brand:      Key(IntelBrand::NoCode.code()),
            name,
        }
    }

    pub const fn stepping(mut self, stepping: i32) -> Self {
        self.stepping = Key(stepping);
        self
    }

    pub const fn brand(mut self, brand: IntelBrand) -> Self {
        self.brand = Key(brand.code());
        self
    }

    pub const fn cores(mut self, cores: i32) -> Self {
        self.cores = Key(cores);
        self
    }

    pub const fn l2(mut self, size_kb: i32) -> Self {
        self.l2_cache = Key(size_kb);
        self
    }

    pub const fn l3(mut self, size_kb: i32) -> Self {
        self.l3_cache = Key(size_kb);
        self
    }

    /// Score of the row against decoded attributes
    pub fn score(&self, attrs: &UarchAttributes) -> u32 {
        let weighted : [(Key, i32, u32); 9] = [
            (self.family,     attrs.family,     2),
            (self.model,      attrs.model,      2),
            (self.stepping,   attrs.stepping,   2),
            (self.ext_family, attrs.ext_family, 2),
            (self.ext_model,  attrs.ext_model,  2),
            (self.cores,      attrs.cores,      2),
            (self.l2_cache,   attrs.l2_cache,   1),
            (self.l3_cache,   attrs.l3_cache,   1),
            (self.brand,      attrs.brand,      2),
        ];
        weighted.iter()
            .filter(|(key, value, _)| key.matches(*value))
            .map(|(_, _, weight)| *weight)
            .sum()
    }
}

/// Row keyed on the resolved family and model, the raw family and model are left out
pub(crate) const fn cpu(ext_family: i32, ext_model: i32, name: &'static str) -> UarchRow {
    let mut row = UarchRow::unknown(name);
    row.ext_family = Key(ext_family);
    row.ext_model = Key(ext_model);
    row
}

/// Decoded attributes a processor is matched on
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct UarchAttributes {
    pub family:     i32,
    pub model:      i32,
    pub stepping:   i32,
    pub ext_family: i32,
    pub ext_model:  i32,
    pub cores:      i32,
    pub l2_cache:   i32,
    pub l3_cache:   i32,
    pub brand:      i32,
}

impl UarchAttributes {
    pub fn new(signature: &Signature, cores: u32, caches: &Caches, brand: i32) -> Self {
        let key = |val: u32| i32::try_from(val).unwrap_or(i32::MAX);
        Self {
            family:     key(signature.family),
            model:      key(signature.model),
            stepping:   key(signature.stepping),
            ext_family: key(signature.ext_family),
            ext_model:  key(signature.ext_model),
            cores:      key(cores),
            l2_cache:   key(caches.l2.size_kb),
            l3_cache:   key(caches.l3.size_kb),
            brand,
        }
    }
}

/// Find the index and score of the best matching row
///
/// The first row is the initial best match with a score of 0, later rows only replace it with a strictly higher score.
/// Returns `None` for an empty table.
pub fn best_match_index(attrs: &UarchAttributes, table: &[UarchRow]) -> Option<(usize, u32)> {
    if table.is_empty() {
        return None;
    }

    let mut best = (0, 0);
    for (idx, row) in table.iter().enumerate() {
        let score = row.score(attrs);
        if score > best.1 {
            best = (idx, score);
        }
    }
    Some(best)
}

/// Name of the best matching row, [`UNKNOWN_UARCH`] for an empty table
pub fn best_match(attrs: &UarchAttributes, table: &'static [UarchRow]) -> &'static str {
    best_match_index(attrs, table).map_or(UNKNOWN_UARCH, |(idx, _)| table[idx].name)
}

/// Codename table of a vendor, if the vendor has one
pub fn vendor_table(vendor: Vendor) -> Option<&'static [UarchRow]> {
    match vendor {
        Vendor::Intel => Some(intel::UARCH_TABLE),
        Vendor::Amd => Some(amd::UARCH_TABLE),
        _ => None,
    }
}

/// Brand code of the brand string, only Intel brands are classified
pub fn brand_code(vendor: Vendor, brand: &BrandString) -> i32 {
    match vendor {
        Vendor::Intel => classify_intel_brand(&brand.as_str()).code(),
        _ => IntelBrand::NoCode.code(),
    }
}

/// Find the codename of a processor
///
/// Processors that don't report leaf 1, and vendors without a table, are reported as [`UNKNOWN_UARCH`].
pub fn decode_codename(vendor: Vendor, max_basic: u32, signature: &Signature, cores: u32, caches: &Caches, brand: &BrandString) -> &'static str {
    if max_basic < 1 {
        return UNKNOWN_UARCH;
    }
    let Some(table) = vendor_table(vendor) else {
        return UNKNOWN_UARCH;
    };

    let attrs = UarchAttributes::new(signature, cores, caches, brand_code(vendor, brand));
    match best_match_index(&attrs, table) {
        Some((idx, score)) => {
            crate::decode_log!("Codename '{}' matched with a score of {score} (row {idx})", table[idx].name);
            table[idx].name
        },
        None => UNKNOWN_UARCH,
    }
}

#[cfg(test)]
mod test {
    use crate::cache::CacheInfo;
    use super::*;

    const TABLE : &[UarchRow] = &[
        UarchRow::unknown(UNKNOWN_UARCH),
        cpu(6, NA, "Family 6"),
        cpu(6, 0x9E, "First"),
        cpu(6, 0x9E, "Second"),
        cpu(6, 0x9E, "Stepping 9").stepping(9),
        cpu(6, 0x2A, "Branded").brand(IntelBrand::CoreI7),
    ];

    const NA : i32 = Key::NA.0;

    fn attrs(ext_family: i32, ext_model: i32, stepping: i32, brand: IntelBrand) -> UarchAttributes {
        UarchAttributes {
            family: ext_family.min(0xF),
            model: ext_model & 0xF,
            stepping,
            ext_family,
            ext_model,
            brand: brand.code(),
            ..Default::default()
        }
    }

    #[test]
    pub fn na_never_matches() {
        assert!(!Key::NA.matches(-1));
        assert!(Key(0).matches(0));
        assert_eq!(UarchRow::unknown("x").score(&UarchAttributes { brand: 5, ..Default::default() }), 0);
    }

    #[test]
    pub fn sentinel_scores_brand_baseline() {
        let attrs = attrs(0x17, 1, 0, IntelBrand::NoCode);
        assert_eq!(TABLE[0].score(&attrs), 2);
        assert_eq!(best_match(&attrs, TABLE), UNKNOWN_UARCH);
    }

    #[test]
    pub fn ties_keep_the_earliest_row() {
        let attrs = attrs(6, 0x9E, 0xA, IntelBrand::NoCode);
        assert_eq!(best_match_index(&attrs, TABLE), Some((2, 6)));
        assert_eq!(best_match(&attrs, TABLE), "First");
    }

    fn winner(attrs: &UarchAttributes, table: &[UarchRow]) -> &'static str {
        best_match_index(attrs, table).map_or(UNKNOWN_UARCH, |(idx, _)| table[idx].name)
    }

    #[test]
    pub fn row_order_only_matters_for_ties() {
        let stepping_9 = attrs(6, 0x9E, 9, IntelBrand::NoCode);
        let rows = [TABLE[1], TABLE[4], TABLE[5]];
        for order in [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
            let table = [TABLE[0], rows[order[0]], rows[order[1]], rows[order[2]]];
            assert_eq!(winner(&stepping_9, &table), "Stepping 9");
        }

        let tied = attrs(6, 0x9E, 0xA, IntelBrand::NoCode);
        assert_eq!(winner(&tied, &[TABLE[0], TABLE[2], TABLE[3], TABLE[1]]), "First");
        assert_eq!(winner(&tied, &[TABLE[0], TABLE[3], TABLE[2], TABLE[1]]), "Second");
        assert_eq!(winner(&tied, &[TABLE[0], TABLE[1], TABLE[3], TABLE[2]]), "Second");
    }

    #[test]
    pub fn more_specific_rows_win() {
        assert_eq!(best_match(&attrs(6, 0x9E, 9, IntelBrand::NoCode), TABLE), "Stepping 9");
        assert_eq!(best_match(&attrs(6, 0x55, 0, IntelBrand::NoCode), TABLE), "Family 6");
    }

    #[test]
    pub fn brand_refines_rows() {
        assert_eq!(best_match(&attrs(6, 0x2A, 7, IntelBrand::CoreI7), TABLE), "Branded");
        // Without the brand, the generic row with the "no code" brand scores higher
        assert_eq!(best_match(&attrs(6, 0x2A, 7, IntelBrand::NoCode), TABLE), "Family 6");
    }

    #[test]
    pub fn empty_table() {
        assert_eq!(best_match_index(&UarchAttributes::default(), &[]), None);
        assert_eq!(best_match(&UarchAttributes::default(), &[]), UNKNOWN_UARCH);
    }

    #[test]
    pub fn codename_requires_leaf_1_and_a_known_vendor() {
        let sig = Signature::decode(0x000906EA, Vendor::Intel);
        let caches = Caches { l2: CacheInfo::new(256, 4, 64), ..Default::default() };
        let brand = BrandString::from_bytes(b"Intel(R) Core(TM) i7-8700K CPU @ 3.70GHz");

        assert_eq!(decode_codename(Vendor::Intel, 0x16, &sig, 6, &caches, &brand), "Coffee Lake");
        assert_eq!(decode_codename(Vendor::Intel, 0, &sig, 6, &caches, &brand), UNKNOWN_UARCH);
        assert_eq!(decode_codename(Vendor::Via, 0x16, &sig, 6, &caches, &brand), UNKNOWN_UARCH);
    }

    #[test]
    pub fn amd_parts() {
        let caches = Caches::default();
        let brand = BrandString::from_bytes(b"AMD Ryzen 7 1700 Eight-Core Processor");

        let zen = Signature::decode(0x00800F11, Vendor::Amd);
        assert_eq!(decode_codename(Vendor::Amd, 0xD, &zen, 8, &caches, &brand), "Zen");

        let zen3 = Signature::decode(0x00A20F10, Vendor::Amd);
        assert_eq!(decode_codename(Vendor::Amd, 0x10, &zen3, 8, &caches, &brand), "Zen 3");

        let k7 = Signature::decode(0x00000662, Vendor::Amd);
        assert_eq!(decode_codename(Vendor::Amd, 1, &k7, 1, &caches, &BrandString::empty()), "K7");
    }

    #[test]
    pub fn every_table_starts_with_the_sentinel() {
        for vendor in [Vendor::Intel, Vendor::Amd] {
            let table = vendor_table(vendor).expect("vendor should have a table");
            assert_eq!(table[0], UarchRow::unknown(UNKNOWN_UARCH));
            assert!(table[1..].iter().all(|row| !row.ext_family.is_na()));
        }
    }
}
