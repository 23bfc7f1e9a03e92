use tracing::instrument;

use crate::clients::ApiClient;
use crate::framework::{ServiceClient, ServiceError};
use crate::lifecycle::Service;
use crate::model::firehose::*;
use crate::model::Empty;

/// Client for the delivery stream service of one region.
#[derive(Clone)]
pub struct FirehoseClient {
    inner: ServiceClient<Service>,
}

impl FirehoseClient {
    pub fn new(inner: ServiceClient<Service>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_delivery_stream(&self, input: &CreateDeliveryStreamInput) -> Result<String, ServiceError> {
        let output: CreateDeliveryStreamOutput = self.call("CreateDeliveryStream", input).await?;
        Ok(output.delivery_stream_arn)
    }

    #[instrument(skip(self))]
    pub async fn describe_delivery_stream(&self, name: &str) -> Result<DeliveryStream, ServiceError> {
        let input = DeliveryStreamNameInput {
            delivery_stream_name: name.to_string(),
        };
        let output: DescribeDeliveryStreamOutput = self.call("DescribeDeliveryStream", &input).await?;
        Ok(output.delivery_stream_description)
    }

    #[instrument(skip(self))]
    pub async fn delete_delivery_stream(&self, name: &str) -> Result<(), ServiceError> {
        let input = DeliveryStreamNameInput {
            delivery_stream_name: name.to_string(),
        };
        let _: Empty = self.call("DeleteDeliveryStream", &input).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_delivery_streams(&self, input: &ListDeliveryStreamsInput) -> Result<ListDeliveryStreamsOutput, ServiceError> {
        self.call("ListDeliveryStreams", input).await
    }
}

impl ApiClient for FirehoseClient {
    const SERVICE: Service = Service::Firehose;

    fn inner(&self) -> &ServiceClient<Service> {
        &self.inner
    }
}
