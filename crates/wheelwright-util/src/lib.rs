#![forbid(unsafe_code)]
//! Filesystem, hashing, and process helpers shared by the wheelwright crates.

pub mod error;
pub mod fs;
pub mod hash;
pub mod process;
