//! Code-signing profile backend.
//!
//! Profiles are keyed by name and tagged by ARN. Cancelling a profile keeps the
//! record; it only drops out of default listings.

pub mod dispatch;
pub mod entity;
pub mod error;

pub use dispatch::dispatch;
pub use error::*;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use tracing::{debug, info};

use crate::framework::tagging::{tags_from_map, validate_tags};
use crate::framework::validation::{matches, max_length, max_value, min_length, min_value, one_of, Pattern, Validator};
use crate::framework::{paginate, random_hex, Resource, ResourceRegistry, Scope, TaggingService};
use crate::model::signer::*;

pub const VALIDITY_TYPES: &[&str] = &["DAYS", "MONTHS", "YEARS"];
pub const MAX_TAGS_PER_PROFILE: usize = 50;

const DEFAULT_MAX_RESULTS: u32 = 25;

static PROFILE_NAME: LazyLock<Pattern> = LazyLock::new(|| Pattern::new("^[a-zA-Z0-9_]{2,}"));

fn check_max_results(v: &mut Validator, max_results: Option<u32>) {
    v.check_opt("maxResults", max_results.as_ref(), min_value(1u32));
    v.check_opt("maxResults", max_results.as_ref(), max_value(25u32));
}

#[derive(Debug)]
pub struct SignerBackend {
    scope: Scope,
    profiles: ResourceRegistry<SigningProfile>,
    tagger: TaggingService,
}

impl SignerBackend {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            profiles: ResourceRegistry::new(),
            tagger: TaggingService::new(),
        }
    }

    fn tagged(&self, profile: &SigningProfile) -> TaggedProfile {
        TaggedProfile {
            profile: profile.clone(),
            tags: self.tagger.tag_map_for_resource(&profile.arn),
        }
    }

    /// Creates the profile, or replaces it under a fresh version when the name is taken.
    pub fn put_signing_profile(&mut self, input: &PutSigningProfileInput) -> Result<SigningProfile, SignerError> {
        debug!(profile_name = %input.profile_name, platform_id = %input.platform_id, "PutSigningProfile");
        let mut v = Validator::new();
        v.check("profileName", input.profile_name.as_str(), min_length(2));
        v.check("profileName", input.profile_name.as_str(), max_length(64));
        v.check("profileName", input.profile_name.as_str(), matches(&PROFILE_NAME));
        if let Some(period) = &input.signature_validity_period {
            v.check("signatureValidityPeriod.type", period.period_type.as_str(), one_of(VALIDITY_TYPES));
        }
        v.finish()?;
        let tags = tags_from_map(&input.tags);
        validate_tags(&tags, MAX_TAGS_PER_PROFILE)?;

        let arn = self
            .scope
            .arn("signer", &format!("/signing-profiles/{}", input.profile_name));
        let profile_version = random_hex(10);
        let platform_display_name = signing_platforms()
            .into_iter()
            .find(|p| p.platform_id == input.platform_id)
            .map(|p| p.display_name);
        let profile = SigningProfile {
            profile_name: input.profile_name.clone(),
            profile_version_arn: format!("{arn}/{profile_version}"),
            profile_version,
            arn,
            platform_id: input.platform_id.clone(),
            platform_display_name,
            signature_validity_period: input.signature_validity_period.clone().unwrap_or_default(),
            signing_material: input.signing_material.clone(),
            signing_parameters: input.signing_parameters.clone(),
            overrides: input.overrides.clone(),
            status: STATUS_ACTIVE.to_string(),
        };
        self.tagger.delete_all_tags_for_resource(&profile.arn);
        self.tagger.tag_resource(&profile.arn, &tags);
        self.profiles.insert(profile.clone());
        info!(
            kind = SigningProfile::KIND,
            id = %profile.profile_name,
            version = %profile.profile_version,
            size = self.profiles.len(),
            "Created"
        );
        Ok(profile)
    }

    pub fn get_signing_profile(&self, profile_name: &str) -> Result<TaggedProfile, SignerError> {
        let profile = self
            .profiles
            .get(profile_name)
            .ok_or_else(|| SignerError::ProfileNotFound(profile_name.to_string()))?;
        Ok(self.tagged(profile))
    }

    pub fn cancel_signing_profile(&mut self, profile_name: &str) -> Result<(), SignerError> {
        let profile = self
            .profiles
            .get_mut(profile_name)
            .ok_or_else(|| SignerError::ProfileNotFound(profile_name.to_string()))?;
        profile.status = STATUS_CANCELED.to_string();
        info!(kind = SigningProfile::KIND, id = %profile_name, "Canceled");
        Ok(())
    }

    pub fn list_signing_profiles(&self, input: &ListSigningProfilesInput) -> Result<ListSigningProfilesOutput, SignerError> {
        let mut v = Validator::new();
        check_max_results(&mut v, input.max_results);
        v.finish()?;

        let matching: Vec<TaggedProfile> = self
            .profiles
            .list(|p| {
                (input.include_canceled || p.status != STATUS_CANCELED)
                    && input.platform_id.as_ref().is_none_or(|id| &p.platform_id == id)
                    && (input.statuses.is_empty() || input.statuses.contains(&p.status))
            })
            .into_iter()
            .map(|p| self.tagged(p))
            .collect();
        let limit = input.max_results.unwrap_or(DEFAULT_MAX_RESULTS) as usize;
        let (profiles, next_token) = paginate(&matching, input.next_token.as_deref(), limit)?;
        Ok(ListSigningProfilesOutput { profiles, next_token })
    }

    pub fn list_signing_platforms(&self, input: &ListSigningPlatformsInput) -> Result<ListSigningPlatformsOutput, SignerError> {
        let mut v = Validator::new();
        check_max_results(&mut v, input.max_results);
        v.finish()?;

        let wanted = |filter: &Option<String>, value: &str| filter.as_deref().is_none_or(|f| f == value);
        let matching: Vec<SigningPlatform> = signing_platforms()
            .into_iter()
            .filter(|p| wanted(&input.category, &p.category) && wanted(&input.partner, &p.partner) && wanted(&input.target, &p.target))
            .collect();
        let limit = input.max_results.unwrap_or(DEFAULT_MAX_RESULTS) as usize;
        let (platforms, next_token) = paginate(&matching, input.next_token.as_deref(), limit)?;
        Ok(ListSigningPlatformsOutput { platforms, next_token })
    }

    // --- Tags ---

    fn ensure_arn(&self, resource_arn: &str) -> Result<(), SignerError> {
        // Either the profile ARN or one of its version ARNs.
        let known = self
            .profiles
            .find(|p| p.arn == resource_arn || p.profile_version_arn == resource_arn)
            .is_some();
        if known {
            Ok(())
        } else {
            Err(SignerError::ResourceNotFound(resource_arn.to_string()))
        }
    }

    fn profile_arn(&self, resource_arn: &str) -> Result<String, SignerError> {
        self.ensure_arn(resource_arn)?;
        Ok(self
            .profiles
            .find(|p| p.profile_version_arn == resource_arn)
            .map_or_else(|| resource_arn.to_string(), |p| p.arn.clone()))
    }

    pub fn tag_resource(&mut self, resource_arn: &str, tags: &BTreeMap<String, String>) -> Result<(), SignerError> {
        let arn = self.profile_arn(resource_arn)?;
        let tags = tags_from_map(tags);
        validate_tags(&tags, MAX_TAGS_PER_PROFILE)?;
        self.tagger.tag_resource(&arn, &tags);
        Ok(())
    }

    pub fn untag_resource(&mut self, resource_arn: &str, tag_keys: &[String]) -> Result<(), SignerError> {
        let arn = self.profile_arn(resource_arn)?;
        self.tagger.untag_resource_using_names(&arn, tag_keys);
        Ok(())
    }

    pub fn list_tags_for_resource(&self, resource_arn: &str) -> Result<BTreeMap<String, String>, SignerError> {
        let arn = self.profile_arn(resource_arn)?;
        Ok(self.tagger.tag_map_for_resource(&arn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::ErrorCode;

    fn backend() -> SignerBackend {
        SignerBackend::new(Scope::new("123456789012", "eu-west-1", "aws"))
    }

    fn put(signer: &mut SignerBackend, name: &str, platform_id: &str) -> SigningProfile {
        signer
            .put_signing_profile(&PutSigningProfileInput {
                profile_name: name.into(),
                platform_id: platform_id.into(),
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn test_put_signing_profile() {
        let mut signer = backend();
        let profile = put(&mut signer, "prof1", "pid");
        assert_eq!(profile.arn, "arn:aws:signer:eu-west-1:123456789012:/signing-profiles/prof1");
        assert_eq!(profile.profile_version.len(), 10);
        assert_eq!(profile.profile_version_arn, format!("{}/{}", profile.arn, profile.profile_version));
        assert!(profile.platform_display_name.is_none());
    }

    #[test]
    fn test_get_signing_profile_defaults() {
        let mut signer = backend();
        put(&mut signer, "prof1", "AWSLambda-SHA384-ECDSA");
        let got = signer.get_signing_profile("prof1").unwrap();
        assert_eq!(got.profile.status, "Active");
        assert_eq!(got.profile.platform_display_name.as_deref(), Some("AWS Lambda"));
        let json = serde_json::to_value(&got).unwrap();
        assert_eq!(json["signatureValidityPeriod"], serde_json::json!({"type": "MONTHS", "value": 135}));
        assert_eq!(json["profileName"], "prof1");

        let err = signer.get_signing_profile("missing").unwrap_err();
        assert_eq!(err.code(), "ResourceNotFoundException");
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn test_profile_with_args_and_tags() {
        let mut signer = backend();
        let input = PutSigningProfileInput {
            profile_name: "prof1".into(),
            platform_id: "AWSLambda-SHA384-ECDSA".into(),
            signature_validity_period: Some(SignatureValidityPeriod {
                value: 10,
                period_type: "DAYS".into(),
            }),
            signing_material: Some(SigningMaterial {
                certificate_arn: "some arn".into(),
            }),
            tags: BTreeMap::from([("k1".to_string(), "v1".to_string()), ("k2".to_string(), "v2".to_string())]),
            ..Default::default()
        };
        let arn = signer.put_signing_profile(&input).unwrap().arn;
        let got = signer.get_signing_profile("prof1").unwrap();
        assert_eq!(got.profile.signature_validity_period.value, 10);
        assert_eq!(got.tags, input.tags);

        signer
            .tag_resource(&arn, &BTreeMap::from([("k3".to_string(), "v3".to_string())]))
            .unwrap();
        signer.untag_resource(&arn, &["k2".to_string()]).unwrap();
        let tags = signer.list_tags_for_resource(&arn).unwrap();
        let keys: Vec<&str> = tags.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["k1", "k3"]);

        let err = signer.list_tags_for_resource("arn:aws:signer:eu-west-1:123456789012:/signing-profiles/nope");
        assert_eq!(err.unwrap_err().http_status(), 404);
    }

    #[test]
    fn test_invalid_inputs_are_batched() {
        let mut signer = backend();
        let err = signer
            .put_signing_profile(&PutSigningProfileInput {
                profile_name: "a".into(),
                platform_id: "pid".into(),
                signature_validity_period: Some(SignatureValidityPeriod {
                    value: 1,
                    period_type: "WEEKS".into(),
                }),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.to_string().starts_with("3 validation errors detected"));
        assert!(err
            .to_string()
            .contains("at 'signatureValidityPeriod.type' failed to satisfy constraint: Member must satisfy enum value set: [DAYS, MONTHS, YEARS]"));
    }

    #[test]
    fn test_cancel_and_list() {
        let mut signer = backend();
        put(&mut signer, "prof1", "AWSLambda-SHA384-ECDSA");
        put(&mut signer, "prof2", "AmazonFreeRTOS-Default");
        signer.cancel_signing_profile("prof1").unwrap();
        assert_eq!(signer.get_signing_profile("prof1").unwrap().profile.status, "Canceled");

        let listed = signer.list_signing_profiles(&ListSigningProfilesInput::default()).unwrap();
        let names: Vec<&str> = listed.profiles.iter().map(|p| p.profile.profile_name.as_str()).collect();
        assert_eq!(names, vec!["prof2"]);

        let all = signer
            .list_signing_profiles(&ListSigningProfilesInput {
                include_canceled: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(all.profiles.len(), 2);
        assert_eq!(signer.cancel_signing_profile("nope").unwrap_err().code(), "ResourceNotFoundException");
    }

    #[test]
    fn test_list_signing_platforms() {
        let signer = backend();
        let all = signer.list_signing_platforms(&ListSigningPlatformsInput::default()).unwrap();
        assert_eq!(all.platforms.len(), 4);
        let freertos = signer
            .list_signing_platforms(&ListSigningPlatformsInput {
                partner: Some("AmazonFreeRTOS".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(freertos.platforms.len(), 2);
    }
}
