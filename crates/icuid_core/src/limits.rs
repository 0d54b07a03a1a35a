//! Capacities and fixed constants of the raw data container.
//!
//! These are part of the text format: an index is only accepted by the deserializer when it is below the capacity of its family.

/// Number of basic leaves that are stored, starting at leaf `0`
pub const MAX_BASIC_LEAVES : usize = 32;
/// Number of extended leaves that are stored, starting at leaf `0x8000_0000`
pub const MAX_EXTENDED_LEAVES : usize = 32;
/// Number of deterministic cache parameter sub-leaves (leaf `4`) that are stored
pub const MAX_INTEL_DC_LEVELS : usize = 4;
/// Number of extended topology sub-leaves (leaf `0xB`) that are stored
pub const MAX_INTEL_ET_LEVELS : usize = 4;

/// First extended leaf
pub const EXTENDED_LEAF_BASE : u32 = 0x8000_0000;

/// Leaf for deterministic cache parameters
pub const INTEL_DC_LEAF : u32 = 0x4;
/// Leaf for extended topology enumeration
pub const INTEL_ET_LEAF : u32 = 0xB;

/// Size of the vendor string, in bytes
pub const VENDOR_STR_LEN : usize = 12;
/// Size of the brand string, in bytes
pub const BRAND_STR_LEN : usize = 48;

/// Codename reported when no reference row scores above the sentinel
pub const UNKNOWN_UARCH : &str = "Unknown CPU uarch";
