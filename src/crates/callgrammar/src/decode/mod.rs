//! Call decoding module

pub mod arguments;
pub mod json_action;
pub mod scanner;
pub mod strategy;

pub use arguments::*;
pub use json_action::*;
pub use scanner::*;
pub use strategy::*;
