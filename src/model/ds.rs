use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::framework::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectoryType {
    SimpleAD,
    MicrosoftAD,
    ADConnector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectoryStage {
    Creating,
    Active,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VpcSettingsDescription {
    pub vpc_id: String,
    pub subnet_ids: Vec<String>,
    pub availability_zones: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectSettingsDescription {
    pub vpc_id: String,
    pub subnet_ids: Vec<String>,
    pub customer_user_name: String,
    pub availability_zones: Vec<String>,
    pub connect_ips: Vec<String>,
}

/// A directory as `DescribeDirectories` reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Directory {
    pub directory_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub short_name: Option<String>,
    #[serde(skip)]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub edition: Option<String>,
    /// Defaults to the directory id until `CreateAlias` replaces it.
    pub alias: String,
    pub access_url: String,
    pub desired_number_of_domain_controllers: u32,
    pub dns_ip_addrs: Vec<String>,
    pub launch_time: DateTime<Utc>,
    pub stage: DirectoryStage,
    pub stage_last_updated_date_time: DateTime<Utc>,
    pub sso_enabled: bool,
    #[serde(rename = "Type")]
    pub directory_type: DirectoryType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vpc_settings: Option<VpcSettingsDescription>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub connect_settings: Option<ConnectSettingsDescription>,
}

impl Directory {
    pub fn has_custom_alias(&self) -> bool {
        self.alias != self.directory_id
    }

    pub fn set_alias(&mut self, alias: &str) {
        self.alias = alias.to_string();
        self.access_url = format!("{alias}.awsapps.com");
    }

    /// Provisioning is instantaneous: a committed directory is already active.
    pub fn activate(&mut self) {
        self.stage = DirectoryStage::Active;
        self.stage_last_updated_date_time = Utc::now();
    }

    /// Every address the directory occupies inside its subnets.
    pub fn occupied_ips(&self) -> impl Iterator<Item = &String> {
        match &self.connect_settings {
            Some(connect) => connect.connect_ips.iter(),
            None => self.dns_ip_addrs.iter(),
        }
    }
}

/// Per-type directory quotas for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryQuotas {
    pub cloud_only_directories: usize,
    pub cloud_only_microsoft_ad: usize,
    pub connected_directories: usize,
}

impl Default for DirectoryQuotas {
    fn default() -> Self {
        Self {
            cloud_only_directories: 10,
            cloud_only_microsoft_ad: 20,
            connected_directories: 10,
        }
    }
}

// --- Requests / responses ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VpcSettings {
    pub vpc_id: String,
    #[serde(default)]
    pub subnet_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectSettings {
    pub vpc_id: String,
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    #[serde(default)]
    pub customer_dns_ips: Vec<String>,
    pub customer_user_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDirectoryInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_settings: Option<VpcSettings>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateMicrosoftAdInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_settings: Option<VpcSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectDirectoryInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_settings: Option<ConnectSettings>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DirectoryIdOutput {
    pub directory_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DirectoryIdInput {
    pub directory_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDirectoriesInput {
    #[serde(default)]
    pub directory_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDirectoriesOutput {
    pub directory_descriptions: Vec<Directory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryLimits {
    #[serde(rename = "CloudOnlyDirectoriesLimit")]
    pub cloud_only_directories_limit: usize,
    #[serde(rename = "CloudOnlyDirectoriesCurrentCount")]
    pub cloud_only_directories_current_count: usize,
    #[serde(rename = "CloudOnlyDirectoriesLimitReached")]
    pub cloud_only_directories_limit_reached: bool,
    #[serde(rename = "CloudOnlyMicrosoftADLimit")]
    pub cloud_only_microsoft_ad_limit: usize,
    #[serde(rename = "CloudOnlyMicrosoftADCurrentCount")]
    pub cloud_only_microsoft_ad_current_count: usize,
    #[serde(rename = "CloudOnlyMicrosoftADLimitReached")]
    pub cloud_only_microsoft_ad_limit_reached: bool,
    #[serde(rename = "ConnectedDirectoriesLimit")]
    pub connected_directories_limit: usize,
    #[serde(rename = "ConnectedDirectoriesCurrentCount")]
    pub connected_directories_current_count: usize,
    #[serde(rename = "ConnectedDirectoriesLimitReached")]
    pub connected_directories_limit_reached: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetDirectoryLimitsOutput {
    pub directory_limits: DirectoryLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddTagsToResourceInput {
    pub resource_id: String,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoveTagsFromResourceInput {
    pub resource_id: String,
    pub tag_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsForResourceInput {
    pub resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsForResourceOutput {
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateAliasInput {
    pub directory_id: String,
    pub alias: String,
}

pub type CreateAliasOutput = CreateAliasInput;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SsoInput {
    pub directory_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
