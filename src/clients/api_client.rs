use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::framework::{ServiceClient, ServiceError};
use crate::lifecycle::Service;

/// Trait for service-specific clients to inherit the typed request path.
///
/// Implementors pick their [`Service`] and expose the region's [`ServiceClient`];
/// [`call`](ApiClient::call) then serializes the input, invokes the operation on
/// the region actor and decodes the response.
#[async_trait]
pub trait ApiClient: Send + Sync {
    const SERVICE: Service;

    /// Access the region's untyped client.
    fn inner(&self) -> &ServiceClient<Service>;

    /// Invoke `operation` with a typed input and decode the typed output.
    #[tracing::instrument(skip(self, input))]
    async fn call<I, O>(&self, operation: &str, input: &I) -> Result<O, ServiceError>
    where
        I: Serialize + Sync,
        O: DeserializeOwned,
    {
        tracing::debug!(service = %Self::SERVICE, "Sending request");
        let params = serde_json::to_value(input).map_err(ServiceError::serialization)?;
        let output = self.inner().invoke(Self::SERVICE, operation, params).await?;
        serde_json::from_value(output).map_err(|e| ServiceError::internal(format!("Undecodable {operation} response: {e}")))
    }
}
