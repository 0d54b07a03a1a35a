//! CPU identification from raw CPUID register dumps.
//!
//! The library works in 2 stages:
//! - acquisition: the CPUID leaves of the processor are collected into a [`RawData`], either by executing the instruction
//!   through a [`CpuidBackend`], or by reading a dump written earlier with [`write_raw`]
//! - decoding: the [`RawData`] is turned into a [`CpuInfo`], containing the vendor, signature, features, caches, topology and a best-guess codename
//!
//! Decoding never touches the processor, apart from reading `XCR0` when the OS has enabled `XSAVE`, so dumps from any machine can be decoded anywhere.
//!
//! # Logging
//!
//! All logs are written through `icuid_logging`, nothing is written until the application installs a logger using `icuid_logging::set_logger`.

extern crate static_assertions as sa;

/// Log a decoding step, compiled away without the `decode_logging` feature
macro_rules! decode_log {
    ($($arg:tt)+) => {
        #[cfg(feature = "decode_logging")]
        icuid_logging::log_verbose!($crate::LOG_CAT, $($arg)+);
    };
}
pub(crate) use decode_log;

mod fmt;
mod bitset;
mod error;

pub mod limits;
pub mod raw;
pub mod backend;
pub mod vendor;
pub mod strings;
pub mod signature;
pub mod features;
pub mod xfeatures;
pub mod cache;
pub mod topology;
pub mod uarch;
pub mod serializer;
pub mod identify;
pub mod expect;

pub use bitset::*;
pub use error::*;
pub use raw::{CpuidRegs, RawData, LeafFamily, Register};
pub use backend::CpuidBackend;
pub use vendor::Vendor;
pub use features::{CpuFeature, FeatureSet};
pub use xfeatures::{XFeature, XFeatureSet};
pub use serializer::{serialize, deserialize, read_raw, write_raw, ParseError};
pub use expect::{Expectations, Fixture, Mismatch, EXPECTED_RESULTS_HEADER};
pub use identify::*;

use icuid_logging::LogCategory;

const LOG_CAT : LogCategory = LogCategory::new("icuid");

/// Version of the library
pub const VERSION : &str = env!("CARGO_PKG_VERSION");
