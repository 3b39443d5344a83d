//! Deadlines for calls into external stores.

use crate::AsideError;
use std::future::Future;
use std::time::Duration;

/// Runs `fut` with a deadline.
///
/// `what` names the operation in the resulting [`AsideError::Timeout`].
pub async fn with_timeout<Fut, T>(duration: Duration, what: &str, fut: Fut) -> Result<T, AsideError>
where
    Fut: Future<Output = Result<T, AsideError>>,
{
    tokio::time::timeout(duration, fut)
        .await
        .map_err(|_| AsideError::Timeout(format!("{} timed out after {:?}", what, duration)))?
}
