//! Shared utilities for encoding and decoding

pub mod escape;
pub mod validation;

pub use escape::*;
pub use validation::*;
