//! Operation-name routing for the delivery stream service.

use serde_json::Value;

use super::FirehoseBackend;
use crate::framework::{parse, respond, ServiceError};
use crate::model::firehose::*;
use crate::model::Empty;

pub fn dispatch(backend: &mut FirehoseBackend, operation: &str, params: Value) -> Result<Value, ServiceError> {
    match operation {
        "CreateDeliveryStream" => {
            let input: CreateDeliveryStreamInput = parse(params)?;
            let stream = backend.create_delivery_stream(&input)?;
            respond(&CreateDeliveryStreamOutput {
                delivery_stream_arn: stream.delivery_stream_arn,
            })
        }
        "DeleteDeliveryStream" => {
            let input: DeliveryStreamNameInput = parse(params)?;
            backend.delete_delivery_stream(&input.delivery_stream_name)?;
            respond(&Empty {})
        }
        "DescribeDeliveryStream" => {
            let input: DeliveryStreamNameInput = parse(params)?;
            let delivery_stream_description = backend.get_stream(&input.delivery_stream_name)?.clone();
            respond(&DescribeDeliveryStreamOutput {
                delivery_stream_description,
            })
        }
        "ListDeliveryStreams" => {
            let input: ListDeliveryStreamsInput = parse(params)?;
            respond(&backend.list_delivery_streams(&input)?)
        }
        "TagDeliveryStream" => {
            let input: TagDeliveryStreamInput = parse(params)?;
            backend.tag_delivery_stream(&input.delivery_stream_name, &input.tags)?;
            respond(&Empty {})
        }
        "UntagDeliveryStream" => {
            let input: UntagDeliveryStreamInput = parse(params)?;
            backend.untag_delivery_stream(&input.delivery_stream_name, &input.tag_keys)?;
            respond(&Empty {})
        }
        "ListTagsForDeliveryStream" => {
            let input: ListTagsForDeliveryStreamInput = parse(params)?;
            respond(&backend.list_tags_for_delivery_stream(&input)?)
        }
        other => Err(ServiceError::unknown_operation(other)),
    }
}
