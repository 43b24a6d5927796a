//! Request body draining.

use std::time::Duration;

use axum::body::Body;
use futures_util::StreamExt;

use crate::config::LimitsConfig;
use crate::http::error::DrainError;

/// [`drain`] bounded by the size limit and the request timeout.
///
/// A body still arriving when the timeout expires is a drain failure, so the
/// request is answered and accounted like any other.
pub async fn drain_within(
    body: Body,
    limits: &LimitsConfig,
    bytes_in: &mut u64,
) -> Result<(), DrainError> {
    let window = Duration::from_secs(limits.request_timeout_secs);
    match tokio::time::timeout(window, drain(body, limits.max_drain_bytes, bytes_in)).await {
        Ok(result) => result,
        Err(_) => Err(DrainError::Timeout {
            secs: limits.request_timeout_secs,
        }),
    }
}

/// Consume and discard the whole body, adding its size to `bytes_in`.
///
/// `bytes_in` is updated as chunks arrive, so it is accurate even when the
/// drain fails halfway.
pub async fn drain(body: Body, limit: u64, bytes_in: &mut u64) -> Result<(), DrainError> {
    let mut stream = body.into_data_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        *bytes_in += chunk.len() as u64;
        if *bytes_in > limit {
            return Err(DrainError::TooLarge { limit });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use futures_util::stream;

    #[tokio::test]
    async fn test_drain_counts_bytes() {
        let mut bytes_in = 0;
        drain(Body::from("hello world"), 1024, &mut bytes_in).await.unwrap();
        assert_eq!(bytes_in, 11);
    }

    #[tokio::test]
    async fn test_drain_empty_body() {
        let mut bytes_in = 0;
        drain(Body::empty(), 1024, &mut bytes_in).await.unwrap();
        assert_eq!(bytes_in, 0);
    }

    #[tokio::test]
    async fn test_drain_over_limit() {
        let mut bytes_in = 0;
        let err = drain(Body::from(vec![0u8; 64]), 16, &mut bytes_in).await.unwrap_err();
        assert!(matches!(err, DrainError::TooLarge { limit: 16 }));
        assert_eq!(bytes_in, 64);
    }

    #[tokio::test]
    async fn test_drain_within_times_out_stalled_body() {
        let chunks = stream::iter(vec![Ok::<_, std::io::Error>(Bytes::from_static(b"abc"))])
            .chain(stream::pending());
        let limits = LimitsConfig {
            request_timeout_secs: 1,
            ..Default::default()
        };

        let mut bytes_in = 0;
        let err = drain_within(Body::from_stream(chunks), &limits, &mut bytes_in)
            .await
            .unwrap_err();
        assert!(matches!(err, DrainError::Timeout { secs: 1 }));
        assert_eq!(bytes_in, 3);
    }

    #[tokio::test]
    async fn test_drain_within_completes_in_time() {
        let mut bytes_in = 0;
        drain_within(Body::from("abc"), &LimitsConfig::default(), &mut bytes_in)
            .await
            .unwrap();
        assert_eq!(bytes_in, 3);
    }

    #[tokio::test]
    async fn test_drain_read_failure_keeps_partial_count() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"abcd")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];
        let body = Body::from_stream(stream::iter(chunks));

        let mut bytes_in = 0;
        let err = drain(body, 1024, &mut bytes_in).await.unwrap_err();
        assert!(matches!(err, DrainError::Read(_)));
        assert_eq!(bytes_in, 4);
    }
}
