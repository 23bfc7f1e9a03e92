use tracing::instrument;

use crate::clients::ApiClient;
use crate::framework::{ServiceClient, ServiceError};
use crate::lifecycle::Service;
use crate::model::signer::*;
use crate::model::Empty;

/// Client for the code-signing service of one region.
#[derive(Clone)]
pub struct SignerClient {
    inner: ServiceClient<Service>,
}

impl SignerClient {
    pub fn new(inner: ServiceClient<Service>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn put_signing_profile(&self, input: &PutSigningProfileInput) -> Result<PutSigningProfileOutput, ServiceError> {
        self.call("PutSigningProfile", input).await
    }

    #[instrument(skip(self))]
    pub async fn get_signing_profile(&self, profile_name: &str) -> Result<TaggedProfile, ServiceError> {
        let input = ProfileNameInput {
            profile_name: profile_name.to_string(),
        };
        self.call("GetSigningProfile", &input).await
    }

    #[instrument(skip(self))]
    pub async fn cancel_signing_profile(&self, profile_name: &str) -> Result<(), ServiceError> {
        let input = ProfileNameInput {
            profile_name: profile_name.to_string(),
        };
        let _: Empty = self.call("CancelSigningProfile", &input).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_signing_platforms(&self) -> Result<Vec<SigningPlatform>, ServiceError> {
        let output: ListSigningPlatformsOutput = self
            .call("ListSigningPlatforms", &ListSigningPlatformsInput::default())
            .await?;
        Ok(output.platforms)
    }
}

impl ApiClient for SignerClient {
    const SERVICE: Service = Service::Signer;

    fn inner(&self) -> &ServiceClient<Service> {
        &self.inner
    }
}
