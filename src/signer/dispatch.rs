//! Operation-name routing for the code-signing service.

use serde_json::Value;

use super::SignerBackend;
use crate::framework::{parse, respond, ServiceError};
use crate::model::signer::*;
use crate::model::Empty;

pub fn dispatch(backend: &mut SignerBackend, operation: &str, params: Value) -> Result<Value, ServiceError> {
    match operation {
        "PutSigningProfile" => {
            let input: PutSigningProfileInput = parse(params)?;
            let profile = backend.put_signing_profile(&input)?;
            respond(&PutSigningProfileOutput {
                arn: profile.arn,
                profile_version: profile.profile_version,
                profile_version_arn: profile.profile_version_arn,
            })
        }
        "GetSigningProfile" => {
            let input: ProfileNameInput = parse(params)?;
            respond(&backend.get_signing_profile(&input.profile_name)?)
        }
        "CancelSigningProfile" => {
            let input: ProfileNameInput = parse(params)?;
            backend.cancel_signing_profile(&input.profile_name)?;
            respond(&Empty {})
        }
        "ListSigningProfiles" => {
            let input: ListSigningProfilesInput = parse(params)?;
            respond(&backend.list_signing_profiles(&input)?)
        }
        "ListSigningPlatforms" => {
            let input: ListSigningPlatformsInput = parse(params)?;
            respond(&backend.list_signing_platforms(&input)?)
        }
        "TagResource" => {
            let input: TagResourceInput = parse(params)?;
            backend.tag_resource(&input.resource_arn, &input.tags)?;
            respond(&Empty {})
        }
        "UntagResource" => {
            let input: UntagResourceInput = parse(params)?;
            backend.untag_resource(&input.resource_arn, &input.tag_keys)?;
            respond(&Empty {})
        }
        "ListTagsForResource" => {
            let input: ResourceArnInput = parse(params)?;
            let tags = backend.list_tags_for_resource(&input.resource_arn)?;
            respond(&ListTagsForResourceOutput { tags })
        }
        other => Err(ServiceError::unknown_operation(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::Scope;
    use serde_json::json;

    #[test]
    fn test_dispatch_profile_flow() {
        let mut signer = SignerBackend::new(Scope::new("123456789012", "us-east-1", "aws"));
        let put = dispatch(
            &mut signer,
            "PutSigningProfile",
            json!({"profileName": "prof1", "platformId": "AWSLambda-SHA384-ECDSA", "tags": {"k": "v"}}),
        )
        .unwrap();
        assert_eq!(put["arn"], "arn:aws:signer:us-east-1:123456789012:/signing-profiles/prof1");
        assert!(put["profileVersionArn"].as_str().unwrap().starts_with("arn:aws:signer"));

        let got = dispatch(&mut signer, "GetSigningProfile", json!({"profileName": "prof1"})).unwrap();
        assert_eq!(got["status"], "Active");
        assert_eq!(got["tags"], json!({"k": "v"}));

        dispatch(&mut signer, "CancelSigningProfile", json!({"profileName": "prof1"})).unwrap();
        let listed = dispatch(&mut signer, "ListSigningProfiles", json!({})).unwrap();
        assert_eq!(listed, json!({"profiles": []}));

        let err = dispatch(&mut signer, "GetSigningProfile", json!({"profileName": "nope"})).unwrap_err();
        assert_eq!(err.code, "ResourceNotFoundException");
        assert_eq!(err.http_status, 404);

        let err = dispatch(&mut signer, "SignPayload", json!({})).unwrap_err();
        assert_eq!(err.code, "InvalidAction");
    }
}
