//! [`Resource`] implementations for the network records.

use crate::framework::Resource;
use crate::model::ec2::{SecurityGroup, Subnet, Vpc};

impl Resource for Vpc {
    const KIND: &'static str = "vpc";

    fn id(&self) -> &str {
        &self.vpc_id
    }
}

impl Resource for Subnet {
    const KIND: &'static str = "subnet";

    fn id(&self) -> &str {
        &self.subnet_id
    }
}

impl Resource for SecurityGroup {
    const KIND: &'static str = "security_group";

    fn id(&self) -> &str {
        &self.group_id
    }
}
