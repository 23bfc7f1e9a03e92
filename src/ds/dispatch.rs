//! Operation-name routing for the directory service.

use serde_json::Value;

use super::DirectoryBackend;
use crate::clients::NetworkResolver;
use crate::framework::{parse, respond, ServiceError};
use crate::model::ds::*;
use crate::model::Empty;

pub fn dispatch(
    backend: &mut DirectoryBackend,
    network: &dyn NetworkResolver,
    operation: &str,
    params: Value,
) -> Result<Value, ServiceError> {
    match operation {
        "CreateDirectory" => {
            let input: CreateDirectoryInput = parse(params)?;
            respond(&backend.create_directory(&input, network)?)
        }
        "CreateMicrosoftAD" => {
            let input: CreateMicrosoftAdInput = parse(params)?;
            respond(&backend.create_microsoft_ad(&input, network)?)
        }
        "ConnectDirectory" => {
            let input: ConnectDirectoryInput = parse(params)?;
            respond(&backend.connect_directory(&input, network)?)
        }
        "DeleteDirectory" => {
            let input: DirectoryIdInput = parse(params)?;
            respond(&backend.delete_directory(&input.directory_id)?)
        }
        "DescribeDirectories" => {
            let input: DescribeDirectoriesInput = parse(params)?;
            respond(&backend.describe_directories(&input)?)
        }
        "GetDirectoryLimits" => respond(&GetDirectoryLimitsOutput {
            directory_limits: backend.get_directory_limits(),
        }),
        "AddTagsToResource" => {
            let input: AddTagsToResourceInput = parse(params)?;
            backend.add_tags_to_resource(&input.resource_id, &input.tags)?;
            respond(&Empty {})
        }
        "RemoveTagsFromResource" => {
            let input: RemoveTagsFromResourceInput = parse(params)?;
            backend.remove_tags_from_resource(&input.resource_id, &input.tag_keys)?;
            respond(&Empty {})
        }
        "ListTagsForResource" => {
            let input: ListTagsForResourceInput = parse(params)?;
            respond(&backend.list_tags_for_resource(&input)?)
        }
        "CreateAlias" => {
            let input: CreateAliasInput = parse(params)?;
            respond(&backend.create_alias(&input)?)
        }
        "EnableSso" => {
            let input: SsoInput = parse(params)?;
            backend.enable_sso(&input)?;
            respond(&Empty {})
        }
        "DisableSso" => {
            let input: SsoInput = parse(params)?;
            backend.disable_sso(&input)?;
            respond(&Empty {})
        }
        other => Err(ServiceError::unknown_operation(other)),
    }
}
