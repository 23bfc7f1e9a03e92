//! Delivery stream backend.
//!
//! Streams are keyed by name. Tags are kept against the stream ARN even though
//! the tagging operations address streams by name.

pub mod dispatch;
pub mod entity;
pub mod error;

pub use dispatch::dispatch;
pub use error::*;

use std::sync::LazyLock;

use chrono::Utc;
use serde_json::Map;
use tracing::{debug, info};

use crate::framework::tagging::validate_tags;
use crate::framework::validation::{matches, max_length, max_value, min_length, min_value, one_of, Pattern, Validator};
use crate::framework::{Resource, ResourceRegistry, Scope, Tag, TaggingService};
use crate::model::firehose::*;

pub const STREAM_TYPES: &[&str] = &[DIRECT_PUT, KINESIS_STREAM_AS_SOURCE];

const DEFAULT_LIST_LIMIT: u32 = 10;

static STREAM_NAME: LazyLock<Pattern> = LazyLock::new(|| Pattern::new("[a-zA-Z0-9_.-]+"));

/// `['a', 'b']`, the rendering clients of the real service see in quota messages.
fn quoted_list<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = names.map(|n| format!("'{n}'")).collect();
    format!("[{}]", quoted.join(", "))
}

fn check_limit(v: &mut Validator, limit: Option<u32>, max: u32) {
    v.check_opt("limit", limit.as_ref(), min_value(1u32));
    v.check_opt("limit", limit.as_ref(), max_value(max));
}

#[derive(Debug)]
pub struct FirehoseBackend {
    scope: Scope,
    quotas: FirehoseQuotas,
    streams: ResourceRegistry<DeliveryStream>,
    tagger: TaggingService,
}

impl FirehoseBackend {
    pub fn new(scope: Scope, quotas: FirehoseQuotas) -> Self {
        Self {
            scope,
            quotas,
            streams: ResourceRegistry::new(),
            tagger: TaggingService::new(),
        }
    }

    fn not_found(&self, name: &str) -> FirehoseError {
        FirehoseError::ResourceNotFound {
            name: name.to_string(),
            account: self.scope.account_id.clone(),
        }
    }

    pub fn get_stream(&self, name: &str) -> Result<&DeliveryStream, FirehoseError> {
        self.streams.get(name).ok_or_else(|| self.not_found(name))
    }

    fn stream_arn(&self, name: &str) -> Result<String, FirehoseError> {
        Ok(self.get_stream(name)?.delivery_stream_arn.clone())
    }

    pub fn create_delivery_stream(&mut self, input: &CreateDeliveryStreamInput) -> Result<DeliveryStream, FirehoseError> {
        let name = input.delivery_stream_name.as_str();
        let stream_type = input.delivery_stream_type.as_deref().unwrap_or(DIRECT_PUT);
        debug!(%name, %stream_type, tags = input.tags.len(), "CreateDeliveryStream");

        let mut v = Validator::new();
        v.check("deliveryStreamName", name, max_length(64));
        v.check("deliveryStreamName", name, min_length(1));
        v.check("deliveryStreamName", name, matches(&STREAM_NAME));
        v.check("deliveryStreamType", stream_type, one_of(STREAM_TYPES));
        v.finish()?;

        if self.streams.contains(name) {
            return Err(FirehoseError::ResourceInUse {
                name: name.to_string(),
                account: self.scope.account_id.clone(),
            });
        }
        if self.streams.len() >= self.quotas.delivery_streams {
            return Err(FirehoseError::LimitExceeded(format!(
                "You have already consumed your firehose quota of {} hoses. Firehose names: {}",
                self.quotas.delivery_streams,
                quoted_list(self.streams.iter().map(|s| s.delivery_stream_name.as_str()))
            )));
        }
        let source = match (&input.kinesis_stream_source_configuration, stream_type) {
            (Some(_), t) if t != KINESIS_STREAM_AS_SOURCE => {
                return Err(FirehoseError::InvalidArgument(
                    "KinesisSourceStreamConfig is only applicable for KinesisStreamAsSource stream type".to_string(),
                ))
            }
            (None, KINESIS_STREAM_AS_SOURCE) => {
                return Err(FirehoseError::InvalidArgument(
                    "KinesisStreamSourceConfiguration is required for KinesisStreamAsSource stream type".to_string(),
                ))
            }
            (Some(config), _) => Some(SourceDescription {
                kinesis_stream_source_description: KinesisStreamSourceDescription {
                    kinesis_stream_arn: config.kinesis_stream_arn.clone(),
                    role_arn: config.role_arn.clone(),
                    delivery_start_timestamp: Utc::now(),
                },
            }),
            (None, _) => None,
        };
        let destinations = input.destinations();
        if destinations.len() != 1 {
            return Err(FirehoseError::InvalidArgument(
                "Exactly one destination configuration is supported for a Firehose".to_string(),
            ));
        }
        validate_tags(&input.tags, self.quotas.tags_per_stream)?;

        let destinations = destinations
            .into_iter()
            .enumerate()
            .map(|(i, (key, config))| {
                let mut description = Map::new();
                description.insert(key.to_string(), config.clone());
                DestinationDescription {
                    destination_id: format!("destinationId-{:012}", i + 1),
                    description,
                }
            })
            .collect();
        let arn = self.scope.arn("firehose", &format!("deliverystream/{name}"));
        let stream = DeliveryStream {
            delivery_stream_name: name.to_string(),
            delivery_stream_arn: arn.clone(),
            // Provisioning completes immediately.
            delivery_stream_status: "ACTIVE".to_string(),
            delivery_stream_type: stream_type.to_string(),
            version_id: "1".to_string(),
            create_timestamp: Utc::now(),
            source,
            destinations,
            has_more_destinations: false,
        };
        self.streams.insert(stream.clone());
        self.tagger.tag_resource(&arn, &input.tags);
        info!(kind = DeliveryStream::KIND, id = %name, size = self.streams.len(), "Created");
        Ok(stream)
    }

    pub fn delete_delivery_stream(&mut self, name: &str) -> Result<(), FirehoseError> {
        let stream = self.streams.remove(name).ok_or_else(|| self.not_found(name))?;
        self.tagger.delete_all_tags_for_resource(&stream.delivery_stream_arn);
        info!(kind = DeliveryStream::KIND, id = %name, size = self.streams.len(), "Deleted");
        Ok(())
    }

    /// Names in alphabetical order, optionally of one type and after a given name.
    pub fn list_delivery_streams(&self, input: &ListDeliveryStreamsInput) -> Result<ListDeliveryStreamsOutput, FirehoseError> {
        let mut v = Validator::new();
        check_limit(&mut v, input.limit, 10000);
        v.check_opt("deliveryStreamType", input.delivery_stream_type.as_deref(), one_of(STREAM_TYPES));
        v.finish()?;

        let wanted_type = input.delivery_stream_type.as_deref();
        let mut names: Vec<String> = self
            .streams
            .list(|s| wanted_type.is_none_or(|t| s.delivery_stream_type == t))
            .into_iter()
            .map(|s| s.delivery_stream_name.clone())
            .collect();
        names.sort();
        if let Some(start) = &input.exclusive_start_delivery_stream_name {
            names.retain(|n| n > start);
        }
        let limit = input.limit.unwrap_or(DEFAULT_LIST_LIMIT) as usize;
        let has_more_delivery_streams = names.len() > limit;
        names.truncate(limit);
        Ok(ListDeliveryStreamsOutput {
            delivery_stream_names: names,
            has_more_delivery_streams,
        })
    }

    // --- Tags ---

    pub fn tag_delivery_stream(&mut self, name: &str, tags: &[Tag]) -> Result<(), FirehoseError> {
        let arn = self.stream_arn(name)?;
        validate_tags(tags, self.quotas.tags_per_stream)?;
        let existing = self.tagger.list_tags_for_resource(&arn);
        let added = tags.iter().filter(|t| !existing.iter().any(|e| e.key == t.key)).count();
        if existing.len() + added > self.quotas.tags_per_stream {
            return Err(FirehoseError::LimitExceeded(format!(
                "You can't add more than {} tags to a delivery stream",
                self.quotas.tags_per_stream
            )));
        }
        self.tagger.tag_resource(&arn, tags);
        Ok(())
    }

    pub fn untag_delivery_stream(&mut self, name: &str, tag_keys: &[String]) -> Result<(), FirehoseError> {
        let arn = self.stream_arn(name)?;
        self.tagger.untag_resource_using_names(&arn, tag_keys);
        Ok(())
    }

    pub fn list_tags_for_delivery_stream(
        &self,
        input: &ListTagsForDeliveryStreamInput,
    ) -> Result<ListTagsForDeliveryStreamOutput, FirehoseError> {
        let mut v = Validator::new();
        check_limit(&mut v, input.limit, 50);
        v.finish()?;

        let arn = self.stream_arn(&input.delivery_stream_name)?;
        let tags = self.tagger.list_tags_for_resource(&arn);
        let start = input
            .exclusive_start_tag_key
            .as_ref()
            .and_then(|key| tags.iter().position(|t| &t.key == key))
            .map_or(0, |position| position + 1);
        let limit = input.limit.map_or(self.quotas.tags_per_stream, |l| l as usize);
        let remaining = &tags[start..];
        Ok(ListTagsForDeliveryStreamOutput {
            tags: remaining.iter().take(limit).cloned().collect(),
            has_more_tags: remaining.len() > limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::ErrorCode;
    use serde_json::json;

    fn backend() -> FirehoseBackend {
        FirehoseBackend::new(Scope::new("123456789012", "us-east-1", "aws"), FirehoseQuotas::default())
    }

    fn s3_input(name: &str) -> CreateDeliveryStreamInput {
        CreateDeliveryStreamInput {
            delivery_stream_name: name.into(),
            s3_destination_configuration: Some(json!({
                "RoleARN": "arn:aws:iam::123456789012:role/firehose",
                "BucketARN": "arn:aws:s3:::firehose-test",
            })),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_and_describe() {
        let mut firehose = backend();
        let stream = firehose.create_delivery_stream(&s3_input("stream-1")).unwrap();
        assert_eq!(
            stream.delivery_stream_arn,
            "arn:aws:firehose:us-east-1:123456789012:deliverystream/stream-1"
        );
        assert_eq!(stream.delivery_stream_status, "ACTIVE");
        assert_eq!(stream.delivery_stream_type, DIRECT_PUT);

        let json = serde_json::to_value(firehose.get_stream("stream-1").unwrap()).unwrap();
        assert_eq!(json["Destinations"][0]["DestinationId"], "destinationId-000000000001");
        assert_eq!(
            json["Destinations"][0]["S3DestinationDescription"]["BucketARN"],
            "arn:aws:s3:::firehose-test"
        );

        let err = firehose.create_delivery_stream(&s3_input("stream-1")).unwrap_err();
        assert_eq!(err.code(), "ResourceInUseException");
        assert_eq!(err.to_string(), "Firehose stream-1 under accountId 123456789012 already exists");
    }

    #[test]
    fn test_create_rejects_bad_arguments() {
        let mut firehose = backend();
        let mut input = s3_input("bad name!");
        input.delivery_stream_type = Some("Firehose".into());
        let err = firehose.create_delivery_stream(&input).unwrap_err();
        assert!(err.to_string().starts_with("2 validation errors detected"));
        assert!(err
            .to_string()
            .contains("Member must satisfy enum value set: [DirectPut, KinesisStreamAsSource]"));

        let mut input = s3_input("stream");
        input.kinesis_stream_source_configuration = Some(KinesisStreamSourceConfiguration::default());
        assert_eq!(firehose.create_delivery_stream(&input).unwrap_err().code(), "InvalidArgumentException");

        let mut input = s3_input("stream");
        input.http_endpoint_destination_configuration = Some(json!({"EndpointConfiguration": {}}));
        assert_eq!(
            firehose.create_delivery_stream(&input).unwrap_err(),
            FirehoseError::InvalidArgument("Exactly one destination configuration is supported for a Firehose".into())
        );

        let mut input = s3_input("stream");
        input.tags = (0..51).map(|i| Tag::new(format!("k{i}"), "v")).collect();
        let err = firehose.create_delivery_stream(&input).unwrap_err();
        assert_eq!(err.code(), "ValidationException");
        assert!(err.to_string().contains("at 'tags' failed to satisfy constraint: Member must have length less than or equal to 50"));
        assert!(firehose.get_stream("stream").is_err());
    }

    #[test]
    fn test_kinesis_source() {
        let mut firehose = backend();
        let mut input = s3_input("from-kinesis");
        input.delivery_stream_type = Some(KINESIS_STREAM_AS_SOURCE.into());
        assert_eq!(firehose.create_delivery_stream(&input).unwrap_err().code(), "InvalidArgumentException");

        input.kinesis_stream_source_configuration = Some(KinesisStreamSourceConfiguration {
            kinesis_stream_arn: "arn:aws:kinesis:us-east-1:123456789012:stream/src".into(),
            role_arn: "arn:aws:iam::123456789012:role/firehose".into(),
        });
        let stream = firehose.create_delivery_stream(&input).unwrap();
        let source = stream.source.unwrap();
        assert!(source.kinesis_stream_source_description.kinesis_stream_arn.ends_with("stream/src"));
    }

    #[test]
    fn test_quota_message_lists_names() {
        let mut firehose = FirehoseBackend::new(
            Scope::new("123456789012", "us-east-1", "aws"),
            FirehoseQuotas {
                delivery_streams: 2,
                ..Default::default()
            },
        );
        firehose.create_delivery_stream(&s3_input("a")).unwrap();
        firehose.create_delivery_stream(&s3_input("b")).unwrap();
        let err = firehose.create_delivery_stream(&s3_input("c")).unwrap_err();
        assert_eq!(
            err,
            FirehoseError::LimitExceeded(
                "You have already consumed your firehose quota of 2 hoses. Firehose names: ['a', 'b']".into()
            )
        );
    }

    #[test]
    fn test_list_delivery_streams() {
        let mut firehose = backend();
        for name in ["charlie", "alpha", "bravo"] {
            firehose.create_delivery_stream(&s3_input(name)).unwrap();
        }
        let page = firehose
            .list_delivery_streams(&ListDeliveryStreamsInput {
                limit: Some(2),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(page.delivery_stream_names, vec!["alpha", "bravo"]);
        assert!(page.has_more_delivery_streams);

        let rest = firehose
            .list_delivery_streams(&ListDeliveryStreamsInput {
                exclusive_start_delivery_stream_name: Some("bravo".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(rest.delivery_stream_names, vec!["charlie"]);
        assert!(!rest.has_more_delivery_streams);

        let none = firehose
            .list_delivery_streams(&ListDeliveryStreamsInput {
                delivery_stream_type: Some(KINESIS_STREAM_AS_SOURCE.into()),
                ..Default::default()
            })
            .unwrap();
        assert!(none.delivery_stream_names.is_empty());
    }

    #[test]
    fn test_tags_and_delete() {
        let mut firehose = backend();
        let mut input = s3_input("tagged");
        input.tags = vec![Tag::new("a", "1")];
        let stream = firehose.create_delivery_stream(&input).unwrap();

        firehose
            .tag_delivery_stream("tagged", &[Tag::new("b", "2"), Tag::new("c", "3")])
            .unwrap();
        firehose.untag_delivery_stream("tagged", &["b".into()]).unwrap();
        let page = firehose
            .list_tags_for_delivery_stream(&ListTagsForDeliveryStreamInput {
                delivery_stream_name: "tagged".into(),
                exclusive_start_tag_key: Some("a".into()),
                limit: Some(1),
            })
            .unwrap();
        assert_eq!(page.tags, vec![Tag::new("c", "3")]);
        assert!(!page.has_more_tags);

        firehose.delete_delivery_stream("tagged").unwrap();
        assert!(!firehose.tagger.has_tags(&stream.delivery_stream_arn));
        let err = firehose.delete_delivery_stream("tagged").unwrap_err();
        assert_eq!(err.to_string(), "Firehose tagged under account 123456789012 not found.");
        assert_eq!(
            firehose.tag_delivery_stream("tagged", &[]).unwrap_err().code(),
            "ResourceNotFoundException"
        );
    }
}
