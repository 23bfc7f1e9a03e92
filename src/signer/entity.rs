use crate::framework::Resource;
use crate::model::signer::SigningProfile;

impl Resource for SigningProfile {
    const KIND: &'static str = "signing_profile";

    fn id(&self) -> &str {
        &self.profile_name
    }
}
