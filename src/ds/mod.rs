//! Directory service backend.
//!
//! Every create call runs the same passes, and each pass fails on its own:
//!
//! 1. presence of the settings block (`InvalidParameterException`)
//! 2. batched format validation, then batched tag validation (`ValidationException`)
//! 3. network references through the [`NetworkResolver`]: subnet count and
//!    existence, zone diversity, VPC existence and membership
//! 4. quota and tag-count rules
//! 5. commit: allocate addresses, insert, attach tags
//!
//! Directory quotas are never stored. They are counted from the registry on demand.

pub mod dispatch;
pub mod entity;
pub mod error;
pub mod validations;

pub use dispatch::dispatch;
pub use error::*;

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info};

use crate::clients::NetworkResolver;
use crate::framework::tagging::validate_tags;
use crate::framework::validation::{matches, max_length, max_value, min_value, Validator};
use crate::framework::{paginate, random_hex, Resource, ResourceRegistry, Scope, Tag, TaggingService};
use crate::model::ds::*;
use crate::model::ec2::Subnet;
use validations::*;

pub const MAX_TAGS_PER_DIRECTORY: usize = 50;

const INVALID_SUBNETS: &str =
    "Invalid subnet ID(s). They must correspond to two subnets in different Availability Zones.";

/// Everything needed to commit a directory once all checks have passed.
struct NewDirectory<'a> {
    directory_type: DirectoryType,
    name: &'a str,
    short_name: Option<&'a str>,
    password: &'a str,
    description: Option<&'a str>,
    size: Option<&'a str>,
    edition: Option<&'a str>,
    vpc_id: &'a str,
    subnets: Vec<Subnet>,
    connect: Option<&'a ConnectSettings>,
    tags: &'a [Tag],
}

#[derive(Debug)]
pub struct DirectoryBackend {
    scope: Scope,
    quotas: DirectoryQuotas,
    directories: ResourceRegistry<Directory>,
    tagger: TaggingService,
}

/// Resolves the two subnets and the VPC a directory will live in.
fn verify_network(
    network: &dyn NetworkResolver,
    vpc_id: &str,
    subnet_ids: &[String],
) -> Result<Vec<Subnet>, DsError> {
    if subnet_ids.len() != 2 {
        return Err(DsError::InvalidParameter(INVALID_SUBNETS.to_string()));
    }
    let relabel = |e| {
        debug!(error = %e, "Subnet lookup failed");
        DsError::InvalidParameter(INVALID_SUBNETS.to_string())
    };
    let zones = network.distinct_availability_zones(subnet_ids).map_err(relabel)?;
    if zones < 2 {
        return Err(DsError::Client(
            "Invalid subnet ID(s). The two subnets must be in different Availability Zones.".to_string(),
        ));
    }
    network
        .vpc(vpc_id)
        .map_err(|_| DsError::Client("Invalid VPC ID.".to_string()))?;
    let subnets = network.subnets(subnet_ids).map_err(relabel)?;
    if let Some(stray) = subnets.iter().find(|s| s.vpc_id != vpc_id) {
        return Err(DsError::Client(format!(
            "Invalid subnet ID(s). Subnet {} does not belong to VPC {vpc_id}.",
            stray.subnet_id
        )));
    }
    Ok(subnets)
}

impl DirectoryBackend {
    pub fn new(scope: Scope, quotas: DirectoryQuotas) -> Self {
        Self {
            scope,
            quotas,
            directories: ResourceRegistry::new(),
            tagger: TaggingService::new(),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    fn limit_for(&self, directory_type: DirectoryType) -> usize {
        match directory_type {
            DirectoryType::SimpleAD => self.quotas.cloud_only_directories,
            DirectoryType::MicrosoftAD => self.quotas.cloud_only_microsoft_ad,
            DirectoryType::ADConnector => self.quotas.connected_directories,
        }
    }

    fn count(&self, directory_type: DirectoryType) -> usize {
        self.directories.count(|d| d.directory_type == directory_type)
    }

    fn check_quota(&self, directory_type: DirectoryType) -> Result<(), DsError> {
        let limit = self.limit_for(directory_type);
        if self.count(directory_type) >= limit {
            return Err(DsError::DirectoryLimitExceeded(limit));
        }
        Ok(())
    }

    pub fn get_directory(&self, directory_id: &str) -> Result<&Directory, DsError> {
        self.directories
            .get(directory_id)
            .ok_or_else(|| DsError::EntityDoesNotExist(directory_id.to_string()))
    }

    fn get_directory_mut(&mut self, directory_id: &str) -> Result<&mut Directory, DsError> {
        self.directories
            .get_mut(directory_id)
            .ok_or_else(|| DsError::EntityDoesNotExist(directory_id.to_string()))
    }

    /// First free host address in each subnet, skipping addresses other directories hold.
    fn allocate_ips(&self, subnets: &[Subnet]) -> Result<Vec<String>, DsError> {
        let used: HashSet<&String> = self.directories.iter().flat_map(|d| d.occupied_ips()).collect();
        subnets
            .iter()
            .map(|subnet| {
                subnet
                    .usable_hosts()
                    .map(|ip| ip.to_string())
                    .find(|ip| !used.contains(ip))
                    .ok_or_else(|| {
                        DsError::Client(format!(
                            "Insufficient free addresses in subnet {}.",
                            subnet.subnet_id
                        ))
                    })
            })
            .collect()
    }

    fn commit(&mut self, new: NewDirectory<'_>) -> Result<String, DsError> {
        let allocated = self.allocate_ips(&new.subnets)?;
        let directory_id = self.directories.generate_id(|| format!("d-{}", random_hex(10)));
        let subnet_ids: Vec<String> = new.subnets.iter().map(|s| s.subnet_id.clone()).collect();
        let availability_zones: Vec<String> =
            new.subnets.iter().map(|s| s.availability_zone.clone()).collect();

        let (dns_ip_addrs, vpc_settings, connect_settings) = match new.connect {
            Some(connect) => (
                connect.customer_dns_ips.clone(),
                None,
                Some(ConnectSettingsDescription {
                    vpc_id: new.vpc_id.to_string(),
                    subnet_ids,
                    customer_user_name: connect.customer_user_name.clone(),
                    availability_zones,
                    connect_ips: allocated,
                }),
            ),
            None => (
                allocated,
                Some(VpcSettingsDescription {
                    vpc_id: new.vpc_id.to_string(),
                    subnet_ids,
                    availability_zones,
                }),
                None,
            ),
        };

        let now = Utc::now();
        let mut directory = Directory {
            directory_id: directory_id.clone(),
            name: new.name.to_string(),
            short_name: new.short_name.map(str::to_string),
            password: new.password.to_string(),
            description: new.description.map(str::to_string),
            size: new.size.map(str::to_string),
            edition: new.edition.map(str::to_string),
            alias: directory_id.clone(),
            access_url: format!("{directory_id}.awsapps.com"),
            desired_number_of_domain_controllers: match new.directory_type {
                DirectoryType::MicrosoftAD => 2,
                _ => 0,
            },
            dns_ip_addrs,
            launch_time: now,
            stage: DirectoryStage::Creating,
            stage_last_updated_date_time: now,
            sso_enabled: false,
            directory_type: new.directory_type,
            vpc_settings,
            connect_settings,
        };
        directory.activate();

        self.directories.insert(directory);
        self.tagger.tag_resource(&directory_id, new.tags);
        info!(
            kind = Directory::KIND,
            id = %directory_id,
            directory_type = ?new.directory_type,
            size = self.directories.len(),
            "Created"
        );
        Ok(directory_id)
    }

    pub fn create_directory(
        &mut self,
        input: &CreateDirectoryInput,
        network: &dyn NetworkResolver,
    ) -> Result<DirectoryIdOutput, DsError> {
        debug!(name = %input.name, size = %input.size, "CreateDirectory");
        let vpc_settings = input
            .vpc_settings
            .as_ref()
            .ok_or_else(|| DsError::InvalidParameter("VpcSettings must be specified.".to_string()))?;

        let mut v = Validator::new();
        check_directory_fields(
            &mut v,
            &DirectoryFields {
                password: &input.password,
                flavor: ("size", Some(input.size.as_str()), SIZES),
                name: &input.name,
                description: input.description.as_deref(),
                short_name: input.short_name.as_deref(),
            },
        );
        check_subnet_ids(&mut v, "vpcSettings.subnetIds", &vpc_settings.subnet_ids);
        v.finish()?;
        validate_tags(&input.tags, 0)?;

        let subnets = verify_network(network, &vpc_settings.vpc_id, &vpc_settings.subnet_ids)?;
        self.check_quota(DirectoryType::SimpleAD)?;
        if input.tags.len() > MAX_TAGS_PER_DIRECTORY {
            return Err(DsError::TagLimitExceeded);
        }

        let directory_id = self.commit(NewDirectory {
            directory_type: DirectoryType::SimpleAD,
            name: &input.name,
            short_name: input.short_name.as_deref(),
            password: &input.password,
            description: input.description.as_deref(),
            size: Some(&input.size),
            edition: None,
            vpc_id: &vpc_settings.vpc_id,
            subnets,
            connect: None,
            tags: &input.tags,
        })?;
        Ok(DirectoryIdOutput { directory_id })
    }

    pub fn create_microsoft_ad(
        &mut self,
        input: &CreateMicrosoftAdInput,
        network: &dyn NetworkResolver,
    ) -> Result<DirectoryIdOutput, DsError> {
        debug!(name = %input.name, edition = ?input.edition, "CreateMicrosoftAD");
        let vpc_settings = input
            .vpc_settings
            .as_ref()
            .ok_or_else(|| DsError::InvalidParameter("VpcSettings must be specified.".to_string()))?;

        let mut v = Validator::new();
        check_directory_fields(
            &mut v,
            &DirectoryFields {
                password: &input.password,
                flavor: ("edition", input.edition.as_deref(), EDITIONS),
                name: &input.name,
                description: input.description.as_deref(),
                short_name: input.short_name.as_deref(),
            },
        );
        check_subnet_ids(&mut v, "vpcSettings.subnetIds", &vpc_settings.subnet_ids);
        v.finish()?;
        validate_tags(&input.tags, 0)?;

        let subnets = verify_network(network, &vpc_settings.vpc_id, &vpc_settings.subnet_ids)?;
        self.check_quota(DirectoryType::MicrosoftAD)?;
        if input.tags.len() > MAX_TAGS_PER_DIRECTORY {
            return Err(DsError::TagLimitExceeded);
        }

        let directory_id = self.commit(NewDirectory {
            directory_type: DirectoryType::MicrosoftAD,
            name: &input.name,
            short_name: input.short_name.as_deref(),
            password: &input.password,
            description: input.description.as_deref(),
            size: None,
            edition: Some(input.edition.as_deref().unwrap_or("Enterprise")),
            vpc_id: &vpc_settings.vpc_id,
            subnets,
            connect: None,
            tags: &input.tags,
        })?;
        Ok(DirectoryIdOutput { directory_id })
    }

    pub fn connect_directory(
        &mut self,
        input: &ConnectDirectoryInput,
        network: &dyn NetworkResolver,
    ) -> Result<DirectoryIdOutput, DsError> {
        debug!(name = %input.name, size = %input.size, "ConnectDirectory");
        let connect = input
            .connect_settings
            .as_ref()
            .ok_or_else(|| DsError::InvalidParameter("ConnectSettings must be specified.".to_string()))?;

        let mut v = Validator::new();
        check_directory_fields(
            &mut v,
            &DirectoryFields {
                password: &input.password,
                flavor: ("size", Some(input.size.as_str()), SIZES),
                name: &input.name,
                description: input.description.as_deref(),
                short_name: input.short_name.as_deref(),
            },
        );
        check_subnet_ids(&mut v, "connectSettings.vpcSettings.subnetIds", &connect.subnet_ids);
        v.check(
            "connectSettings.customerUserName",
            connect.customer_user_name.as_str(),
            matches(&USER_NAME),
        );
        for ip in &connect.customer_dns_ips {
            v.check(
                "connectSettings.customerDnsIps",
                ip.as_str(),
                matches(&IP_ADDR),
            );
        }
        v.finish()?;
        validate_tags(&input.tags, 0)?;

        let subnets = verify_network(network, &connect.vpc_id, &connect.subnet_ids)?;
        self.check_quota(DirectoryType::ADConnector)?;
        if input.tags.len() > MAX_TAGS_PER_DIRECTORY {
            return Err(DsError::TagLimitExceeded);
        }

        let directory_id = self.commit(NewDirectory {
            directory_type: DirectoryType::ADConnector,
            name: &input.name,
            short_name: input.short_name.as_deref(),
            password: &input.password,
            description: input.description.as_deref(),
            size: Some(&input.size),
            edition: None,
            vpc_id: &connect.vpc_id,
            subnets,
            connect: Some(connect),
            tags: &input.tags,
        })?;
        Ok(DirectoryIdOutput { directory_id })
    }

    /// Removes the directory and its tags in one step.
    pub fn delete_directory(&mut self, directory_id: &str) -> Result<DirectoryIdOutput, DsError> {
        let mut v = Validator::new();
        check_directory_id(&mut v, directory_id);
        v.finish()?;

        let mut directory = self
            .directories
            .remove(directory_id)
            .ok_or_else(|| DsError::EntityDoesNotExist(directory_id.to_string()))?;
        self.tagger.delete_all_tags_for_resource(directory_id);
        directory.stage = DirectoryStage::Deleted;
        info!(kind = Directory::KIND, id = %directory_id, size = self.directories.len(), "Deleted");
        Ok(DirectoryIdOutput {
            directory_id: directory.directory_id,
        })
    }

    pub fn describe_directories(
        &self,
        input: &DescribeDirectoriesInput,
    ) -> Result<DescribeDirectoriesOutput, DsError> {
        let mut v = Validator::new();
        for directory_id in &input.directory_ids {
            check_directory_id(&mut v, directory_id);
        }
        v.check_opt("limit", input.limit.as_ref(), min_value(1u32));
        v.check_opt("limit", input.limit.as_ref(), max_value(100u32));
        v.finish()?;

        let directories: Vec<Directory> = if input.directory_ids.is_empty() {
            self.directories.iter().cloned().collect()
        } else {
            input
                .directory_ids
                .iter()
                .map(|id| self.get_directory(id).cloned())
                .collect::<Result<_, _>>()?
        };
        let limit = input.limit.unwrap_or(100) as usize;
        let (directory_descriptions, next_token) =
            paginate(&directories, input.next_token.as_deref(), limit)?;
        Ok(DescribeDirectoriesOutput {
            directory_descriptions,
            next_token,
        })
    }

    pub fn get_directory_limits(&self) -> DirectoryLimits {
        let cloud_only = self.count(DirectoryType::SimpleAD);
        let microsoft_ad = self.count(DirectoryType::MicrosoftAD);
        let connected = self.count(DirectoryType::ADConnector);
        DirectoryLimits {
            cloud_only_directories_limit: self.quotas.cloud_only_directories,
            cloud_only_directories_current_count: cloud_only,
            cloud_only_directories_limit_reached: cloud_only >= self.quotas.cloud_only_directories,
            cloud_only_microsoft_ad_limit: self.quotas.cloud_only_microsoft_ad,
            cloud_only_microsoft_ad_current_count: microsoft_ad,
            cloud_only_microsoft_ad_limit_reached: microsoft_ad >= self.quotas.cloud_only_microsoft_ad,
            connected_directories_limit: self.quotas.connected_directories,
            connected_directories_current_count: connected,
            connected_directories_limit_reached: connected >= self.quotas.connected_directories,
        }
    }

    // --- Tags ---

    fn check_resource(&self, resource_id: &str) -> Result<(), DsError> {
        let mut v = Validator::new();
        check_directory_id(&mut v, resource_id);
        v.finish()?;
        self.get_directory(resource_id)?;
        Ok(())
    }

    pub fn add_tags_to_resource(&mut self, resource_id: &str, tags: &[Tag]) -> Result<(), DsError> {
        self.check_resource(resource_id)?;
        validate_tags(tags, 0)?;
        let existing = self.tagger.list_tags_for_resource(resource_id);
        let added = tags
            .iter()
            .filter(|t| !existing.iter().any(|e| e.key == t.key))
            .count();
        if existing.len() + added > MAX_TAGS_PER_DIRECTORY {
            return Err(DsError::TagLimitExceeded);
        }
        self.tagger.tag_resource(resource_id, tags);
        Ok(())
    }

    pub fn remove_tags_from_resource(&mut self, resource_id: &str, tag_keys: &[String]) -> Result<(), DsError> {
        self.check_resource(resource_id)?;
        self.tagger.untag_resource_using_names(resource_id, tag_keys);
        Ok(())
    }

    pub fn list_tags_for_resource(
        &self,
        input: &ListTagsForResourceInput,
    ) -> Result<ListTagsForResourceOutput, DsError> {
        self.check_resource(&input.resource_id)?;
        let tags = self.tagger.list_tags_for_resource(&input.resource_id);
        let limit = input.limit.map_or(MAX_TAGS_PER_DIRECTORY, |l| l as usize);
        let (tags, next_token) = paginate(&tags, input.next_token.as_deref(), limit)?;
        Ok(ListTagsForResourceOutput { tags, next_token })
    }

    // --- Alias and SSO ---

    pub fn create_alias(&mut self, input: &CreateAliasInput) -> Result<CreateAliasOutput, DsError> {
        let mut v = Validator::new();
        check_directory_id(&mut v, &input.directory_id);
        check_alias(&mut v, &input.alias);
        v.finish()?;

        if self.get_directory(&input.directory_id)?.has_custom_alias() {
            return Err(DsError::InvalidParameter(
                "The directory in the request already has an alias. \
                 That alias must be deleted before a new alias can be created."
                    .to_string(),
            ));
        }
        if self.directories.find(|d| d.alias == input.alias).is_some() {
            return Err(DsError::AliasAlreadyExists(input.alias.clone()));
        }
        self.get_directory_mut(&input.directory_id)?.set_alias(&input.alias);
        info!(kind = Directory::KIND, id = %input.directory_id, alias = %input.alias, "Alias created");
        Ok(input.clone())
    }

    fn check_sso_input(input: &SsoInput) -> Result<(), DsError> {
        let mut v = Validator::new();
        v.check_opt("ssoPassword", input.password.as_deref(), max_length(128));
        v.check_opt(
            "userName",
            input.user_name.as_deref(),
            matches(&USER_NAME),
        );
        check_directory_id(&mut v, &input.directory_id);
        Ok(v.finish()?)
    }

    pub fn enable_sso(&mut self, input: &SsoInput) -> Result<(), DsError> {
        Self::check_sso_input(input)?;
        let directory = self.get_directory_mut(&input.directory_id)?;
        if !directory.has_custom_alias() {
            return Err(DsError::Client(format!(
                "An alias is required before enabling SSO. DomainId={}",
                input.directory_id
            )));
        }
        directory.sso_enabled = true;
        info!(kind = Directory::KIND, id = %input.directory_id, "SSO enabled");
        Ok(())
    }

    pub fn disable_sso(&mut self, input: &SsoInput) -> Result<(), DsError> {
        Self::check_sso_input(input)?;
        self.get_directory_mut(&input.directory_id)?.sso_enabled = false;
        info!(kind = Directory::KIND, id = %input.directory_id, "SSO disabled");
        Ok(())
    }
}
