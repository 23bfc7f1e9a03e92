use tracing::{debug, instrument};

use crate::clients::ApiClient;
use crate::framework::{ServiceClient, ServiceError};
use crate::lifecycle::Service;
use crate::model::ds::*;
use crate::model::Empty;

/// Client for the directory service of one region.
///
/// Inputs carry passwords, so none of these methods record their input.
#[derive(Clone)]
pub struct DirectoryClient {
    inner: ServiceClient<Service>,
}

impl DirectoryClient {
    pub fn new(inner: ServiceClient<Service>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_directory(&self, input: &CreateDirectoryInput) -> Result<String, ServiceError> {
        debug!("Sending request");
        let output: DirectoryIdOutput = self.call("CreateDirectory", input).await?;
        Ok(output.directory_id)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_microsoft_ad(&self, input: &CreateMicrosoftAdInput) -> Result<String, ServiceError> {
        debug!("Sending request");
        let output: DirectoryIdOutput = self.call("CreateMicrosoftAD", input).await?;
        Ok(output.directory_id)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn connect_directory(&self, input: &ConnectDirectoryInput) -> Result<String, ServiceError> {
        debug!("Sending request");
        let output: DirectoryIdOutput = self.call("ConnectDirectory", input).await?;
        Ok(output.directory_id)
    }

    #[instrument(skip(self))]
    pub async fn delete_directory(&self, directory_id: &str) -> Result<String, ServiceError> {
        let input = DirectoryIdInput {
            directory_id: directory_id.to_string(),
        };
        let output: DirectoryIdOutput = self.call("DeleteDirectory", &input).await?;
        Ok(output.directory_id)
    }

    #[instrument(skip(self))]
    pub async fn describe_directories(&self, input: &DescribeDirectoriesInput) -> Result<DescribeDirectoriesOutput, ServiceError> {
        self.call("DescribeDirectories", input).await
    }

    #[instrument(skip(self))]
    pub async fn get_directory_limits(&self) -> Result<DirectoryLimits, ServiceError> {
        let output: GetDirectoryLimitsOutput = self.call("GetDirectoryLimits", &Empty {}).await?;
        Ok(output.directory_limits)
    }

    #[instrument(skip(self))]
    pub async fn create_alias(&self, directory_id: &str, alias: &str) -> Result<CreateAliasOutput, ServiceError> {
        let input = CreateAliasInput {
            directory_id: directory_id.to_string(),
            alias: alias.to_string(),
        };
        self.call("CreateAlias", &input).await
    }
}

impl ApiClient for DirectoryClient {
    const SERVICE: Service = Service::Ds;

    fn inner(&self) -> &ServiceClient<Service> {
        &self.inner
    }
}
