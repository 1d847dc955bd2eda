//! compression/codecs/mod.rs
//! Push-based software codecs.

pub mod software;

pub use software::*;
