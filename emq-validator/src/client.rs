//! Validating client front
//!
//! `QueueClient` runs every request through the validator and only hands it to
//! the transport once it is well-formed. The transport itself (wire protocol,
//! authentication, retries) lives outside this crate.

use async_trait::async_trait;
use emq_core::ValidationError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::request::Request;
use crate::validator::RequestValidator;

/// Sends validated requests to the queue service
#[async_trait]
pub trait Transport: Send + Sync {
    type Response: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn send(&self, request: Request) -> Result<Self::Response, Self::Error>;
}

#[derive(Debug, Error)]
pub enum ClientError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Transport error: {0}")]
    Transport(#[source] E),
}

pub struct QueueClient<T> {
    validator: Arc<RequestValidator>,
    transport: T,
}

impl<T: Transport> QueueClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_validator(transport, Arc::new(RequestValidator::default()))
    }

    pub fn with_validator(transport: T, validator: Arc<RequestValidator>) -> Self {
        Self {
            validator,
            transport,
        }
    }

    pub fn validator(&self) -> &RequestValidator {
        &self.validator
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate `request` and send it
    pub async fn execute(
        &self,
        request: impl Into<Request>,
    ) -> Result<T::Response, ClientError<T::Error>> {
        let request = request.into();
        self.validator.validate(&request)?;

        debug!(request = %request, "Sending request");
        let kind = request.kind();
        let response = self
            .transport
            .send(request)
            .await
            .map_err(ClientError::Transport)?;
        info!(kind = kind, "Request completed");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{DeleteMessageRequest, ReceiveMessageRequest, SendMessageRequest};
    use std::sync::Mutex;

    #[derive(Debug, Error)]
    #[error("connection refused")]
    struct Refused;

    /// Records every request that reaches the wire
    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<Request>>,
        fail: bool,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        type Response = usize;
        type Error = Refused;

        async fn send(&self, request: Request) -> Result<usize, Refused> {
            if self.fail {
                return Err(Refused);
            }
            let mut sent = self.sent.lock().unwrap();
            sent.push(request);
            Ok(sent.len())
        }
    }

    #[tokio::test]
    async fn test_valid_request_is_sent() {
        let client = QueueClient::new(RecordingTransport::default());

        let n = client
            .execute(SendMessageRequest::new("app/orders", "hello"))
            .await
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(client.transport().sent.lock().unwrap()[0].kind(), "SendMessage");
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_transport() {
        let client = QueueClient::new(RecordingTransport::default());

        let err = client
            .execute(DeleteMessageRequest::new("app/orders", ""))
            .await
            .unwrap_err();
        match err {
            ClientError::Validation(e) => {
                assert_eq!(e.message, "Bad request, the receiptHandle shouldn't be empty!");
            }
            ClientError::Transport(e) => panic!("unexpected transport error: {e}"),
        }
        assert!(client.transport().sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_is_wrapped() {
        let client = QueueClient::new(RecordingTransport {
            fail: true,
            ..Default::default()
        });

        let err = client
            .execute(ReceiveMessageRequest::new("app/orders"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(Refused)));
        assert_eq!(err.to_string(), "Transport error: connection refused");
    }

    #[tokio::test]
    async fn test_shared_validator() {
        use emq_core::{FieldRange, RangeKey, RangeTable};

        let ranges = RangeTable::default()
            .with(RangeKey::ReceiveMessageMaximumNumber, FieldRange::new(1, 32));
        let validator = Arc::new(RequestValidator::new(ranges));
        let client = QueueClient::with_validator(RecordingTransport::default(), validator);

        client
            .execute(ReceiveMessageRequest::new("app/orders").max_receive_message_number(32))
            .await
            .unwrap();
        assert!(client
            .execute(ReceiveMessageRequest::new("app/orders").max_receive_message_number(33))
            .await
            .is_err());
    }
}
