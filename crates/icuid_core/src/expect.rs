//! Expected identification results, stored after a raw dump.
//!
//! A fixture is a raw dump, followed by [`EXPECTED_RESULTS_HEADER`] and a `key=value` line per expected value:
//!
//! ```text
//! cpuid[0]=00000016 756e6547 6c65746e 49656e69
//! ...
//! ################EXPECTED RESULTS###############
//! vendor_str=GenuineIntel
//! cores=6
//! codename=Coffee Lake
//! ```

use core::fmt::{self, Write as _};

use icuid_base::EnumFromIndexT;
use icuid_parser_utils::StrParser;

use crate::{
    raw::RawData,
    serializer::{deserialize, ParseError},
    CpuInfo,
};

/// Line separating the raw dump from the expected results
pub const EXPECTED_RESULTS_HEADER : &str = "################EXPECTED RESULTS###############";

/// Keys that can be expected, in the order they are rendered
pub const EXPECTATION_KEYS : &[&str] = &[
    "vendor_str",
    "vendor_id",
    "cpu_name",
    "cores",
    "logical",
    "codename",
    "family",
    "model",
    "stepping",
    "type",
    "ext_family",
    "ext_model",
    "signature",
    "l1d_cache",
    "l1i_cache",
    "l2_cache",
    "l3_cache",
    "l1_assoc",
    "l2_assoc",
    "l3_assoc",
    "l1_linesz",
    "l2_linesz",
    "l3_linesz",
    "physical_addrsz",
    "virtual_addrsz",
    "features",
];

/// Way an expected value is compared to the decoded value
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Comparison {
    Text,
    Number,
    /// Space separated names, in any order
    NameSet,
}

fn comparison(key: &str) -> Comparison {
    match key {
        "vendor_str" | "cpu_name" | "codename" => Comparison::Text,
        "features" => Comparison::NameSet,
        _ => Comparison::Number,
    }
}

/// Decoded value of a key, as rendered in a fixture
fn actual_value(info: &CpuInfo, key: &str) -> Option<String> {
    let caches = &info.caches;
    let value = match key {
        "vendor_str"      => info.vendor_str.to_string(),
        "vendor_id"       => info.vendor.id().to_string(),
        "cpu_name"        => info.brand_str.to_string(),
        "cores"           => info.cores.to_string(),
        "logical"         => info.logical_cpus.to_string(),
        "codename"        => info.codename.to_string(),
        "family"          => info.family.to_string(),
        "model"           => info.model.to_string(),
        "stepping"        => info.stepping.to_string(),
        "type"            => info.processor_type.to_idx().to_string(),
        "ext_family"      => info.ext_family.to_string(),
        "ext_model"       => info.ext_model.to_string(),
        "signature"       => info.signature.to_string(),
        "l1d_cache"       => caches.l1_data.size_kb.to_string(),
        "l1i_cache"       => caches.l1_instruction.size_kb.to_string(),
        "l2_cache"        => caches.l2.size_kb.to_string(),
        "l3_cache"        => caches.l3.size_kb.to_string(),
        "l1_assoc"        => caches.l1_data.associativity.to_string(),
        "l2_assoc"        => caches.l2.associativity.to_string(),
        "l3_assoc"        => caches.l3.associativity.to_string(),
        "l1_linesz"       => caches.l1_data.line_size.to_string(),
        "l2_linesz"       => caches.l2.line_size.to_string(),
        "l3_linesz"       => caches.l3.line_size.to_string(),
        "physical_addrsz" => info.physical_address_bits.to_string(),
        "virtual_addrsz"  => info.virtual_address_bits.to_string(),
        "features"        => info.features.to_string(),
        _ => return None,
    };
    Some(value)
}

/// Value that doesn't match the expectation
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Mismatch {
    pub key:      &'static str,
    pub expected: String,
    pub actual:   String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}: got '{}' instead of '{}'", self.key, self.actual, self.expected))
    }
}

/// Expected identification results
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Expectations {
    entries: Vec<(&'static str, String)>,
}

impl Expectations {
    /// Parse the `key=value` lines following the header
    ///
    /// `first_line` is the line number of the first line of `text`, used for error reporting.
    pub fn parse(text: &str, first_line: usize) -> Result<Self, ParseError> {
        let mut entries : Vec<(&'static str, String)> = Vec::new();
        for (line_idx, line) in text.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parser = StrParser::at_line(line, first_line + line_idx);
            let key_start = parser;
            let key = parser.extract_until(|ch| ch == '=');
            let Some(key) = EXPECTATION_KEYS.iter().copied().find(|known| *known == key.trim()) else {
                return Err(ParseError(key_start.error("Unknown expectation key")));
            };
            if !parser.consume_char('=') {
                return Err(ParseError(parser.error("Expected '='")));
            }

            let value = parser.string.to_string();
            match entries.iter_mut().find(|(entry_key, _)| *entry_key == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
        Ok(Self { entries })
    }

    /// Expected value of a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(entry_key, _)| *entry_key == key).map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compare the decoded results against the expectations
    pub fn check(&self, info: &CpuInfo) -> Vec<Mismatch> {
        let mut mismatches = Vec::new();
        for (key, expected) in &self.entries {
            let actual = actual_value(info, key).unwrap_or_default();
            let matches = match comparison(key) {
                Comparison::Text => actual == *expected,
                Comparison::Number => expected.trim().parse::<u64>().map_or(false, |val| actual.parse::<u64>() == Ok(val)),
                Comparison::NameSet => {
                    let mut expected_names : Vec<&str> = expected.split_whitespace().collect();
                    let mut actual_names : Vec<&str> = actual.split_whitespace().collect();
                    expected_names.sort_unstable();
                    actual_names.sort_unstable();
                    expected_names == actual_names
                },
            };

            if !matches {
                mismatches.push(Mismatch { key: *key, expected: expected.clone(), actual });
            }
        }
        mismatches
    }

    /// Render the expectations of decoded results, starting with the header
    pub fn render(info: &CpuInfo) -> String {
        let mut res = String::new();
        _ = writeln!(res, "{EXPECTED_RESULTS_HEADER}");
        for key in EXPECTATION_KEYS {
            if let Some(value) = actual_value(info, key) {
                _ = writeln!(res, "{key}={value}");
            }
        }
        res
    }
}

/// Raw dump with its expected results
#[derive(Clone, PartialEq, Debug)]
pub struct Fixture {
    pub raw:          RawData,
    pub expectations: Expectations,
}

impl Fixture {
    /// Parse a fixture, a dump without a header has no expectations
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let Some(header_idx) = text.find(EXPECTED_RESULTS_HEADER) else {
            return Ok(Self { raw: deserialize(text)?, expectations: Expectations::default() });
        };

        let dump = &text[..header_idx];
        let rest = &text[header_idx + EXPECTED_RESULTS_HEADER.len()..];
        let header_line = dump.matches('\n').count() + 1;

        let raw = deserialize(dump)?;
        // `rest` starts with the remainder of the header line
        let expectations = Expectations::parse(rest, header_line)?;
        Ok(Self { raw, expectations })
    }
}

#[cfg(test)]
mod test {
    use crate::decode;
    use super::*;

    const DUMP : &str = "cpuid[0]=00000001 756e6547 6c65746e 49656e69\ncpuid[1]=000906ea 00100800 00000001 00000001\n";

    #[test]
    pub fn parses_fixture() {
        let text = format!("{DUMP}{EXPECTED_RESULTS_HEADER}\nvendor_str=GenuineIntel\r\ncores=1\nfeatures=fpu pni\n");
        let fixture = Fixture::parse(&text).expect("fixture should parse");
        assert_eq!(fixture.raw.cpuid[1].eax, 0x906EA);
        assert_eq!(fixture.expectations.len(), 3);
        assert_eq!(fixture.expectations.get("vendor_str"), Some("GenuineIntel"));
        assert_eq!(fixture.expectations.get("codename"), None);

        let info = decode(&fixture.raw, || 0);
        assert_eq!(fixture.expectations.check(&info), Vec::new());
    }

    #[test]
    pub fn reports_mismatches() {
        let info = decode(&deserialize(DUMP).expect("dump should parse"), || 0);
        let expectations = Expectations::parse("cores=4\ncodename=Kaby Lake\nfeatures=pni\nstepping=10", 1).expect("expectations should parse");
        let mismatches = expectations.check(&info);
        assert_eq!(mismatches.len(), 3);
        assert_eq!(mismatches[0], Mismatch { key: "cores", expected: "4".to_string(), actual: "1".to_string() });
        assert_eq!(mismatches[0].to_string(), "cores: got '1' instead of '4'");
        assert_eq!(mismatches[1].key, "codename");
        assert_eq!(mismatches[2].key, "features");
    }

    #[test]
    pub fn unknown_keys_are_rejected() {
        let err = Expectations::parse("cores=1\nbogus=2", 10).expect_err("unknown key should fail");
        assert_eq!((err.line(), err.column()), (11, 1));
        assert_eq!(Expectations::parse("cores", 1).expect_err("missing '=' should fail").msg(), "Expected '='");
    }

    #[test]
    pub fn rendered_expectations_match() {
        let info = decode(&deserialize(DUMP).expect("dump should parse"), || 0);
        let rendered = Expectations::render(&info);
        assert!(rendered.starts_with(EXPECTED_RESULTS_HEADER));
        assert!(rendered.contains("\nvendor_id=1\n"));

        let fixture = Fixture::parse(&format!("{DUMP}{rendered}")).expect("rendered fixture should parse");
        assert_eq!(fixture.expectations.len(), EXPECTATION_KEYS.len());
        assert!(fixture.expectations.check(&info).is_empty());
    }
}
