use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const STATUS_ACTIVE: &str = "Active";
pub const STATUS_CANCELED: &str = "Canceled";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureValidityPeriod {
    pub value: u32,
    #[serde(rename = "type")]
    pub period_type: String,
}

impl Default for SignatureValidityPeriod {
    fn default() -> Self {
        Self {
            value: 135,
            period_type: "MONTHS".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningMaterial {
    pub certificate_arn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningProfile {
    pub profile_name: String,
    pub profile_version: String,
    pub profile_version_arn: String,
    pub arn: String,
    pub platform_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_display_name: Option<String>,
    pub signature_validity_period: SignatureValidityPeriod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_material: Option<SigningMaterial>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub signing_parameters: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<Value>,
    pub status: String,
}

/// A profile together with its tag map, as `GetSigningProfile` and
/// `ListSigningProfiles` return it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedProfile {
    #[serde(flatten)]
    pub profile: SigningProfile,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningPlatform {
    pub platform_id: String,
    pub display_name: String,
    pub partner: String,
    pub target: String,
    pub category: String,
    pub signing_configuration: Value,
    pub signing_image_format: Value,
    pub max_size_in_mb: u32,
    pub revocation_supported: bool,
}

fn platform(
    platform_id: &str,
    display_name: &str,
    partner: &str,
    target: &str,
    (encryption, hash): (&str, &str),
    format: &str,
    max_size_in_mb: u32,
) -> SigningPlatform {
    SigningPlatform {
        platform_id: platform_id.to_string(),
        display_name: display_name.to_string(),
        partner: partner.to_string(),
        target: target.to_string(),
        category: "AWSIoT".to_string(),
        signing_configuration: json!({
            "encryptionAlgorithmOptions": {"allowedValues": [encryption], "defaultValue": encryption},
            "hashAlgorithmOptions": {"allowedValues": [hash], "defaultValue": hash},
        }),
        signing_image_format: json!({"supportedFormats": [format], "defaultFormat": format}),
        max_size_in_mb,
        revocation_supported: false,
    }
}

/// The fixed platform catalogue every region offers.
pub fn signing_platforms() -> Vec<SigningPlatform> {
    let mut lambda = platform(
        "AWSLambda-SHA384-ECDSA",
        "AWS Lambda",
        "AWSLambda",
        "AWSLambda",
        ("ECDSA", "SHA384"),
        "JSONDetached",
        250,
    );
    lambda.revocation_supported = true;
    vec![
        platform(
            "AmazonFreeRTOS-TI-CC3220SF",
            "Amazon FreeRTOS SHA1-RSA CC3220SF-Format",
            "AmazonFreeRTOS",
            "SHA1-RSA-TISHA1",
            ("RSA", "SHA1"),
            "JSONEmbedded",
            16,
        ),
        platform(
            "AmazonFreeRTOS-Default",
            "Amazon FreeRTOS",
            "AmazonFreeRTOS",
            "SHA256-ECDSA",
            ("ECDSA", "SHA256"),
            "JSONEmbedded",
            16,
        ),
        platform(
            "AWSIoTDeviceManagement-SHA256-ECDSA",
            "AWS IoT Device Management SHA256-ECDSA",
            "AWSIoTDeviceManagement",
            "SHA256-ECDSA",
            ("ECDSA", "SHA256"),
            "JSONDetached",
            2048,
        ),
        lambda,
    ]
}

// --- Requests / responses ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutSigningProfileInput {
    pub profile_name: String,
    pub platform_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_validity_period: Option<SignatureValidityPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_material: Option<SigningMaterial>,
    #[serde(default)]
    pub signing_parameters: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<Value>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutSigningProfileOutput {
    pub arn: String,
    pub profile_version: String,
    pub profile_version_arn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileNameInput {
    pub profile_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSigningProfilesInput {
    #[serde(default)]
    pub include_canceled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,
    #[serde(default)]
    pub statuses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSigningProfilesOutput {
    pub profiles: Vec<TaggedProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSigningPlatformsInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSigningPlatformsOutput {
    pub platforms: Vec<SigningPlatform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResourceInput {
    pub resource_arn: String,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UntagResourceInput {
    pub resource_arn: String,
    pub tag_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceArnInput {
    pub resource_arn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTagsForResourceOutput {
    pub tags: BTreeMap<String, String>,
}
