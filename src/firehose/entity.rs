use crate::framework::Resource;
use crate::model::firehose::DeliveryStream;

/// Delivery streams are addressed by name.
impl Resource for DeliveryStream {
    const KIND: &'static str = "delivery_stream";

    fn id(&self) -> &str {
        &self.delivery_stream_name
    }
}
