//! Grammar encoding module

pub mod call;
pub mod declarations;
pub mod prompt;
pub mod writer;

pub use call::*;
pub use declarations::*;
pub use prompt::*;
pub use writer::*;
