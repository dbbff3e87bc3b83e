//! Async utilities
//!
//! ```rust,ignore
//! use tooling::async_utils::timeout::{with_timeout, TimeoutError};
//! use std::time::Duration;
//!
//! match with_timeout(Duration::from_secs(30), backend.generate(request)).await {
//!     Ok(generation) => { /* use it */ }
//!     Err(TimeoutError::Timeout(d)) => { /* gave up after d */ }
//!     Err(TimeoutError::OperationFailed(e)) => { /* backend error */ }
//! }
//! ```

pub mod timeout;
