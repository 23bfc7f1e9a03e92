//! [`Resource`] implementation for [`Directory`].

use crate::framework::Resource;
use crate::model::ds::Directory;

impl Resource for Directory {
    const KIND: &'static str = "directory";

    fn id(&self) -> &str {
        &self.directory_id
    }
}
