//! Deadline for a fallible async call

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Why a deadline-bounded call produced no value
#[derive(Debug, Error)]
pub enum TimeoutError<E> {
    /// The call finished in time but returned an error
    #[error("{0}")]
    OperationFailed(E),
    /// The deadline passed first; the call was dropped
    #[error("no result within {0:?}")]
    Timeout(Duration),
}

/// Await `operation` for at most `limit`
///
/// On expiry the future is dropped, which cancels an in-flight request.
pub async fn with_timeout<F, T, E>(limit: Duration, operation: F) -> Result<T, TimeoutError<E>>
where
    F: Future<Output = Result<T, E>>,
{
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| TimeoutError::Timeout(limit))?
        .map_err(TimeoutError::OperationFailed)
}
