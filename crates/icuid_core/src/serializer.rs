//! Text format of [`RawData`].
//!
//! Each entry is written on its own line, as `<family>[<index>]=<eax> <ebx> <ecx> <edx>`, where the registers are 8 lowercase hex digits.
//! Lines starting with `#` are comments, and blank lines are ignored.
//!
//! ```text
//! cpuid[0]=00000016 756e6547 6c65746e 49656e69
//! cpuid_ext[0]=80000008 00000000 00000000 00000000
//! intel_dc[0]=1c004121 01c0003f 0000003f 00000000
//! ```

use core::fmt::{self, Write as _};
use std::{fs, io::{self, Read, Write}};

use icuid_base::EnumFromNameT;
use icuid_parser_utils::{ParserError, StrParser};

use crate::{
    raw::{CpuidRegs, LeafFamily, RawData},
    Error, LOG_CAT,
};

/// Raw data parsing error
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ParseError(pub ParserError);

impl ParseError {
    pub fn line(&self) -> usize {
        self.0.line
    }

    pub fn column(&self) -> usize {
        self.0.column
    }

    pub fn msg(&self) -> &'static str {
        self.0.msg
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("Failed to parse cpuid data at {}:{}, err: {}", self.0.line, self.0.column, self.0.msg))
    }
}

impl std::error::Error for ParseError {}

const REGISTER_DIGITS : usize = 8;

/// Write raw data to text
///
/// Every entry in the valid range of a family is written, as is every non-zero entry outside of it,
/// so [`deserialize`] gives back the same data.
pub fn serialize(raw: &RawData) -> String {
    let mut res = String::new();
    for family in LeafFamily::ALL {
        let valid_len = raw.valid_len(family);
        for (idx, regs) in raw.family(family).iter().enumerate() {
            if idx < valid_len || !regs.is_zero() {
                _ = writeln!(res, "{family}[{idx}]={regs}");
            }
        }
    }
    res
}

/// Parse raw data from text
///
/// When an entry occurs more than once, the last one is kept.
pub fn deserialize(data: &str) -> Result<RawData, ParseError> {
    let mut raw = RawData::new();
    for (line_idx, line) in data.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parser = StrParser::at_line(line, line_idx + 1);
        let (family, idx, regs) = parse_entry(&mut parser)?;
        raw.set(family, idx, regs);
    }
    Ok(raw)
}

fn parse_entry(parser: &mut StrParser) -> Result<(LeafFamily, usize, CpuidRegs), ParseError> {
    parser.consume_whitespace(false);

    let family_start = *parser;
    let token = parser.extract_until(|ch| ch == '[' || ch == '=' || ch.is_whitespace());
    let family = LeafFamily::parse(token).ok_or_else(|| ParseError(family_start.error("Unknown leaf family")))?;

    if !parser.consume_char('[') {
        return Err(ParseError(parser.error("Expected '['")));
    }

    let idx_start = *parser;
    let idx_str = parser.extract_while(|ch| ch.is_ascii_digit());
    if idx_str.is_empty() {
        return Err(ParseError(parser.error("Expected a decimal index")));
    }
    let idx = match idx_str.parse::<usize>() {
        Ok(idx) if idx < family.capacity() => idx,
        _ => return Err(ParseError(idx_start.error("Index exceeds the capacity of the leaf family"))),
    };

    if !parser.consume_char(']') {
        return Err(ParseError(parser.error("Expected ']'")));
    }
    if !parser.consume_char('=') {
        return Err(ParseError(parser.error("Expected '='")));
    }

    let mut regs = [0u32; 4];
    for (reg_idx, reg) in regs.iter_mut().enumerate() {
        if reg_idx != 0 {
            let separator = parser.extract_while(|ch| ch == ' ' || ch == '\t');
            if separator.is_empty() {
                return Err(ParseError(parser.error("Expected whitespace between registers")));
            }
        }

        let digits = parser.extract_exact(REGISTER_DIGITS, |ch| matches!(ch, '0'..='9' | 'a'..='f'))
            .ok_or_else(|| ParseError(parser.error("Expected a register of 8 lowercase hex digits")))?;
        *reg = u32::from_str_radix(digits, 16).map_err(|_| ParseError(parser.error("Invalid register value")))?;
    }

    parser.consume_whitespace(false);
    if parser.can_parse() {
        return Err(ParseError(parser.error("Unexpected characters after the registers")));
    }

    Ok((family, idx, CpuidRegs::from(regs)))
}

/// Read raw data from the file at `path`, an empty path reads from stdin
pub fn read_raw(path: Option<&str>) -> Result<RawData, Error> {
    let Some(path) = path else {
        return Err(Error::NullArgument);
    };

    let bytes = if path.is_empty() {
        let mut bytes = Vec::new();
        io::stdin().lock().read_to_end(&mut bytes).map_err(|err| Error::OpenFailure(err.kind()))?;
        bytes
    } else {
        fs::read(path).map_err(|err| {
            icuid_logging::log_warning!(LOG_CAT, "Failed to open '{path}': {err}");
            Error::OpenFailure(err.kind())
        })?
    };

    let text = match core::str::from_utf8(&bytes) {
        Ok(text) => text,
        Err(err) => {
            let mut parser = StrParser::new("");
            let valid = &bytes[..err.valid_up_to()];
            parser.line = valid.iter().filter(|b| **b == b'\n').count() + 1;
            parser.column = valid.iter().rev().take_while(|b| **b != b'\n').count() + 1;
            let err = ParseError(parser.error("Input is not valid UTF-8"));
            icuid_logging::log_warning!(LOG_CAT, "{err}");
            return Err(Error::ParseFailure(err));
        },
    };

    deserialize(text).map_err(|err| {
        icuid_logging::log_warning!(LOG_CAT, "{err}");
        Error::from(err)
    })
}

/// Write raw data to the file at `path`, an empty path writes to stdout
pub fn write_raw(raw: &RawData, path: Option<&str>) -> Result<(), Error> {
    let Some(path) = path else {
        return Err(Error::NullArgument);
    };

    let text = serialize(raw);
    let res = if path.is_empty() {
        io::stdout().lock().write_all(text.as_bytes())
    } else {
        fs::write(path, text.as_bytes())
    };
    res.map_err(|err| {
        icuid_logging::log_warning!(LOG_CAT, "Failed to write raw data to '{path}': {err}");
        Error::OpenFailure(err.kind())
    })
}
