use chrono::Utc;
use cloudmock::ds::DirectoryBackend;
use cloudmock::ec2::Ec2Error;
use cloudmock::framework::mock::MockNetwork;
use cloudmock::framework::{ErrorCode, Scope};
use cloudmock::model::ds::{CreateDirectoryInput, DirectoryQuotas, VpcSettings};
use cloudmock::model::ec2::{SecurityGroup, Subnet, Vpc};
use cloudmock::model::route53resolver::{CreateResolverEndpointInput, IpAddressRequest, ResolverQuotas};
use cloudmock::route53resolver::ResolverBackend;

fn scope() -> Scope {
    Scope::new("123456789012", "us-east-1", "aws")
}

fn vpc(id: &str) -> Vpc {
    Vpc {
        vpc_id: id.into(),
        cidr_block: "10.0.0.0/16".parse().unwrap(),
        state: "available".into(),
        owner_id: "123456789012".into(),
        is_default: false,
        create_time: Utc::now(),
    }
}

fn subnet(id: &str, vpc_id: &str, cidr: &str, zone: &str) -> Subnet {
    Subnet {
        subnet_id: id.into(),
        vpc_id: vpc_id.into(),
        cidr_block: cidr.parse().unwrap(),
        availability_zone: zone.into(),
        available_ip_address_count: 251,
        state: "available".into(),
        owner_id: "123456789012".into(),
    }
}

fn directory(subnet_ids: &[&str]) -> CreateDirectoryInput {
    CreateDirectoryInput {
        name: "corp.example.com".into(),
        password: "Passw0rd!".into(),
        size: "Small".into(),
        vpc_settings: Some(VpcSettings {
            vpc_id: "vpc-11111111".into(),
            subnet_ids: subnet_ids.iter().map(|s| s.to_string()).collect(),
        }),
        ..Default::default()
    }
}

/// The directory backend asks for each subnet twice (zones, then ownership) and
/// for the VPC in between; nothing else is looked up.
#[test]
fn test_directory_lookups_in_order() {
    let mock = MockNetwork::new();
    let a = subnet("subnet-aaaaaaaa", "vpc-11111111", "10.0.1.0/24", "us-east-1a");
    let b = subnet("subnet-bbbbbbbb", "vpc-11111111", "10.0.2.0/24", "us-east-1b");
    mock.expect_subnet("subnet-aaaaaaaa").return_ok(a.clone());
    mock.expect_subnet("subnet-bbbbbbbb").return_ok(b.clone());
    mock.expect_vpc("vpc-11111111").return_ok(vpc("vpc-11111111"));
    mock.expect_subnet("subnet-aaaaaaaa").return_ok(a);
    mock.expect_subnet("subnet-bbbbbbbb").return_ok(b);

    let mut ds = DirectoryBackend::new(scope(), DirectoryQuotas::default());
    let out = ds
        .create_directory(&directory(&["subnet-aaaaaaaa", "subnet-bbbbbbbb"]), &mock)
        .unwrap();
    let created = ds.get_directory(&out.directory_id).unwrap();
    assert_eq!(created.dns_ip_addrs, vec!["10.0.1.4", "10.0.2.4"]);
    mock.verify();
}

#[test]
fn test_foreign_lookup_error_is_relabeled() {
    let mock = MockNetwork::new();
    mock.expect_subnet("subnet-aaaaaaaa")
        .return_ok(subnet("subnet-aaaaaaaa", "vpc-11111111", "10.0.1.0/24", "us-east-1a"));
    mock.expect_subnet("subnet-bbbbbbbb")
        .return_err(Ec2Error::SubnetNotFound("subnet-bbbbbbbb".into()));

    let mut ds = DirectoryBackend::new(scope(), DirectoryQuotas::default());
    let err = ds
        .create_directory(&directory(&["subnet-aaaaaaaa", "subnet-bbbbbbbb"]), &mock)
        .unwrap_err();
    assert_eq!(err.code(), "InvalidParameterException");
    assert!(err.to_string().starts_with("Invalid subnet ID(s)"));
    mock.verify();
}

#[test]
fn test_same_zone_subnets_rejected_before_vpc_lookup() {
    let mock = MockNetwork::new();
    mock.expect_subnet("subnet-aaaaaaaa")
        .return_ok(subnet("subnet-aaaaaaaa", "vpc-11111111", "10.0.1.0/24", "us-east-1a"));
    mock.expect_subnet("subnet-bbbbbbbb")
        .return_ok(subnet("subnet-bbbbbbbb", "vpc-11111111", "10.0.2.0/24", "us-east-1a"));

    let mut ds = DirectoryBackend::new(scope(), DirectoryQuotas::default());
    let err = ds
        .create_directory(&directory(&["subnet-aaaaaaaa", "subnet-bbbbbbbb"]), &mock)
        .unwrap_err();
    assert_eq!(err.code(), "ClientException");
    assert_eq!(
        err.to_string(),
        "Invalid subnet ID(s). The two subnets must be in different Availability Zones."
    );
    mock.verify();
}

/// Resolver endpoints do not require zone diversity: two addresses in one
/// subnet are accepted.
#[test]
fn test_resolver_endpoint_in_single_subnet() {
    let mock = MockNetwork::new();
    let only = subnet("subnet-aaaaaaaa", "vpc-11111111", "10.0.1.0/24", "us-east-1a");
    mock.expect_subnet("subnet-aaaaaaaa").return_ok(only.clone());
    mock.expect_subnet("subnet-aaaaaaaa").return_ok(only);
    mock.expect_security_group("sg-11111111").return_ok(SecurityGroup {
        group_id: "sg-11111111".into(),
        group_name: "dns".into(),
        description: "dns".into(),
        vpc_id: "vpc-11111111".into(),
        owner_id: "123456789012".into(),
    });

    let mut resolver = ResolverBackend::new(scope(), ResolverQuotas::default());
    let request = IpAddressRequest {
        subnet_id: "subnet-aaaaaaaa".into(),
        ip: None,
    };
    let endpoint = resolver
        .create_resolver_endpoint(
            &CreateResolverEndpointInput {
                creator_request_id: "req".into(),
                security_group_ids: vec!["sg-11111111".into()],
                direction: "INBOUND".into(),
                ip_addresses: vec![request.clone(), request],
                ..Default::default()
            },
            &mock,
        )
        .unwrap();
    assert_eq!(endpoint.host_vpc_id, "vpc-11111111");
    let ips: Vec<&str> = endpoint.ip_addresses.iter().map(|a| a.ip.as_str()).collect();
    assert_eq!(ips, vec!["10.0.1.4", "10.0.1.5"]);
    mock.verify();
}

#[test]
fn test_missing_security_group_is_not_found() {
    let mock = MockNetwork::new();
    let only = subnet("subnet-aaaaaaaa", "vpc-11111111", "10.0.1.0/24", "us-east-1a");
    mock.expect_subnet("subnet-aaaaaaaa").return_ok(only.clone());
    mock.expect_subnet("subnet-aaaaaaaa").return_ok(only);
    mock.expect_security_group("sg-22222222")
        .return_err(Ec2Error::SecurityGroupNotFound("sg-22222222".into()));

    let mut resolver = ResolverBackend::new(scope(), ResolverQuotas::default());
    let request = IpAddressRequest {
        subnet_id: "subnet-aaaaaaaa".into(),
        ip: None,
    };
    let err = resolver
        .create_resolver_endpoint(
            &CreateResolverEndpointInput {
                creator_request_id: "req".into(),
                security_group_ids: vec!["sg-22222222".into()],
                direction: "OUTBOUND".into(),
                ip_addresses: vec![request.clone(), request],
                ..Default::default()
            },
            &mock,
        )
        .unwrap_err();
    assert_eq!(err.code(), "ResourceNotFoundException");
    assert_eq!(err.to_string(), "The security group 'sg-22222222' does not exist");
    mock.verify();
}
