//! Traits implemented by the icuid derive macros, usable from `#![no_std]` code.
#![no_std]

mod macro_traits;
pub use macro_traits::*;
