//! Vendor and brand strings.

use core::fmt;

use crate::{
    limits::{VENDOR_STR_LEN, BRAND_STR_LEN},
    raw::{CpuidRegs, RawData},
};

/// 12-byte vendor string, as stored in leaf 0 (`ebx`, `edx`, `ecx`)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VendorString {
    bytes: [u8; VENDOR_STR_LEN],
}

impl VendorString {
    pub const fn from_bytes(bytes: [u8; VENDOR_STR_LEN]) -> Self {
        Self { bytes }
    }

    /// Extract the vendor string from leaf 0
    pub fn from_raw(raw: &RawData) -> Self {
        let leaf0 = raw.basic(0);
        let mut bytes = [0u8; VENDOR_STR_LEN];
        bytes[0..4].copy_from_slice(&leaf0.ebx.to_le_bytes());
        bytes[4..8].copy_from_slice(&leaf0.edx.to_le_bytes());
        bytes[8..12].copy_from_slice(&leaf0.ecx.to_le_bytes());
        Self { bytes }
    }

    pub const fn as_bytes(&self) -> &[u8; VENDOR_STR_LEN] {
        &self.bytes
    }

    /// Text up to the first NUL, invalid UTF-8 is replaced
    pub fn as_str(&self) -> String {
        let len = self.bytes.iter().position(|b| *b == 0).unwrap_or(VENDOR_STR_LEN);
        String::from_utf8_lossy(&self.bytes[..len]).into_owned()
    }
}

impl fmt::Display for VendorString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.as_str())
    }
}

impl fmt::Debug for VendorString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:?}", self.as_str()))
    }
}

/// Processor brand string, up to 48 bytes from extended leaves `0x8000_0002..=0x8000_0004`
///
/// The string is cut at the first NUL, and leading spaces are stripped.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrandString {
    bytes : [u8; BRAND_STR_LEN],
    len   : u8,
}

impl BrandString {
    pub const fn empty() -> Self {
        Self { bytes: [0; BRAND_STR_LEN], len: 0 }
    }

    /// Extract the brand string, empty if the brand leaves aren't reported
    pub fn from_raw(raw: &RawData) -> Self {
        if raw.max_extended() < 0x8000_0004 {
            return Self::empty();
        }

        let mut full = [0u8; BRAND_STR_LEN];
        for (idx, leaf) in (0x8000_0002..=0x8000_0004u32).enumerate() {
            let regs : CpuidRegs = raw.extended(leaf);
            for (reg_idx, reg) in regs.to_array().into_iter().enumerate() {
                let offset = idx * 16 + reg_idx * 4;
                full[offset..offset + 4].copy_from_slice(&reg.to_le_bytes());
            }
        }
        Self::from_bytes(&full)
    }

    /// Create a brand string from bytes, the input is cut at the first NUL and at 48 bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let end = bytes.iter().take(BRAND_STR_LEN).position(|b| *b == 0).unwrap_or(bytes.len().min(BRAND_STR_LEN));
        let start = bytes[..end].iter().position(|b| *b != b' ').unwrap_or(end);

        let mut res = Self::empty();
        let len = end - start;
        res.bytes[..len].copy_from_slice(&bytes[start..end]);
        res.len = len as u8;
        res
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Brand as text, invalid UTF-8 is replaced
    pub fn as_str(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for BrandString {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for BrandString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.as_str())
    }
}

impl fmt::Debug for BrandString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:?}", self.as_str()))
    }
}
