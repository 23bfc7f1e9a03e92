use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::framework::Tag;

pub const DIRECT_PUT: &str = "DirectPut";
pub const KINESIS_STREAM_AS_SOURCE: &str = "KinesisStreamAsSource";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinesisStreamSourceDescription {
    #[serde(rename = "KinesisStreamARN")]
    pub kinesis_stream_arn: String,
    #[serde(rename = "RoleARN")]
    pub role_arn: String,
    #[serde(rename = "DeliveryStartTimestamp")]
    pub delivery_start_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourceDescription {
    pub kinesis_stream_source_description: KinesisStreamSourceDescription,
}

/// One destination, described under the key its configuration family uses
/// (`S3DestinationDescription`, `HttpEndpointDestinationDescription`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationDescription {
    #[serde(rename = "DestinationId")]
    pub destination_id: String,
    #[serde(flatten)]
    pub description: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeliveryStream {
    pub delivery_stream_name: String,
    #[serde(rename = "DeliveryStreamARN")]
    pub delivery_stream_arn: String,
    pub delivery_stream_status: String,
    pub delivery_stream_type: String,
    pub version_id: String,
    pub create_timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceDescription>,
    pub destinations: Vec<DestinationDescription>,
    pub has_more_destinations: bool,
}

/// Per-region delivery stream quotas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirehoseQuotas {
    pub delivery_streams: usize,
    pub tags_per_stream: usize,
}

impl Default for FirehoseQuotas {
    fn default() -> Self {
        Self {
            delivery_streams: 50,
            tags_per_stream: 50,
        }
    }
}

// --- Requests / responses ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KinesisStreamSourceConfiguration {
    #[serde(rename = "KinesisStreamARN")]
    pub kinesis_stream_arn: String,
    #[serde(rename = "RoleARN")]
    pub role_arn: String,
}

/// Destination configurations are kept as given; only their presence is checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDeliveryStreamInput {
    pub delivery_stream_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_stream_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinesis_stream_source_configuration: Option<KinesisStreamSourceConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_destination_configuration: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_s3_destination_configuration: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redshift_destination_configuration: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elasticsearch_destination_configuration: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splunk_destination_configuration: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_endpoint_destination_configuration: Option<Value>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl CreateDeliveryStreamInput {
    /// Every destination family present in the request, by description key.
    pub fn destinations(&self) -> Vec<(&'static str, &Value)> {
        [
            ("S3DestinationDescription", &self.s3_destination_configuration),
            ("ExtendedS3DestinationDescription", &self.extended_s3_destination_configuration),
            ("RedshiftDestinationDescription", &self.redshift_destination_configuration),
            ("ElasticsearchDestinationDescription", &self.elasticsearch_destination_configuration),
            ("SplunkDestinationDescription", &self.splunk_destination_configuration),
            ("HttpEndpointDestinationDescription", &self.http_endpoint_destination_configuration),
        ]
        .into_iter()
        .filter_map(|(key, config)| config.as_ref().map(|c| (key, c)))
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDeliveryStreamOutput {
    #[serde(rename = "DeliveryStreamARN")]
    pub delivery_stream_arn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeliveryStreamNameInput {
    pub delivery_stream_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDeliveryStreamOutput {
    pub delivery_stream_description: DeliveryStream,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListDeliveryStreamsInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_stream_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_start_delivery_stream_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListDeliveryStreamsOutput {
    pub delivery_stream_names: Vec<String>,
    pub has_more_delivery_streams: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagDeliveryStreamInput {
    pub delivery_stream_name: String,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UntagDeliveryStreamInput {
    pub delivery_stream_name: String,
    pub tag_keys: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsForDeliveryStreamInput {
    pub delivery_stream_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_start_tag_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsForDeliveryStreamOutput {
    pub tags: Vec<Tag>,
    pub has_more_tags: bool,
}
