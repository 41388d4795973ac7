use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::errors::RelayError;
use crate::models::message::Message;

/// Raw bytes of an upstream streaming response, in arrival order
pub type ByteStream = BoxStream<'static, Result<Bytes, RelayError>>;

/// Base trait for streaming chat completion services
#[async_trait]
pub trait Provider: Send + Sync {
    /// Start a streamed completion.
    ///
    /// Errors returned here happen before any byte of the answer exists: missing
    /// configuration, transport failures and non-2xx responses. Failures after the
    /// stream started are yielded as stream items instead.
    async fn stream(&self, system: &str, messages: &[Message]) -> Result<ByteStream, RelayError>;
}
