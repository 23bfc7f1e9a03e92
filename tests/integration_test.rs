use cloudmock::clients::{DirectoryClient, FirehoseClient, NetworkClient, ResolverClient, SignerClient};
use cloudmock::framework::Tag;
use cloudmock::lifecycle::{setup_tracing, Service, Simulator, SimulatorConfig};
use cloudmock::model::ds::{CreateDirectoryInput, DescribeDirectoriesInput, DirectoryStage, VpcSettings};
use cloudmock::model::firehose::CreateDeliveryStreamInput;
use cloudmock::model::route53resolver::{CreateResolverEndpointInput, CreateResolverRuleInput, IpAddressRequest, TargetAddress};
use cloudmock::model::signer::PutSigningProfileInput;
use serde_json::json;

fn config() -> SimulatorConfig {
    let mut config = SimulatorConfig {
        partitions: vec!["aws".into()],
        ..Default::default()
    };
    config.quotas.firehose.delivery_streams = 2;
    config
}

/// A VPC with one subnet in each of two zones.
async fn network(network: &NetworkClient, region: &str) -> (String, Vec<String>) {
    let vpc = network.create_vpc("10.0.0.0/16").await.expect("Failed to create vpc");
    let a = network
        .create_subnet(&vpc.vpc_id, "10.0.1.0/24", &format!("{region}a"))
        .await
        .expect("Failed to create subnet");
    let b = network
        .create_subnet(&vpc.vpc_id, "10.0.2.0/24", &format!("{region}b"))
        .await
        .expect("Failed to create subnet");
    (vpc.vpc_id, vec![a.subnet_id, b.subnet_id])
}

fn directory_input(vpc_id: &str, subnet_ids: &[String]) -> CreateDirectoryInput {
    CreateDirectoryInput {
        name: "corp.example.com".into(),
        password: "Passw0rd!".into(),
        size: "Large".into(),
        vpc_settings: Some(VpcSettings {
            vpc_id: vpc_id.into(),
            subnet_ids: subnet_ids.to_vec(),
        }),
        tags: vec![Tag::new("team", "identity")],
        ..Default::default()
    }
}

/// Full end-to-end flow through a real region actor: the directory backend
/// resolves the subnets created through the network backend of the same region.
#[tokio::test]
async fn test_directory_lifecycle_end_to_end() {
    setup_tracing();
    let simulator = Simulator::new(config()).unwrap();
    let region = simulator.region("us-west-2").unwrap();
    let net = NetworkClient::new(region.clone());
    let ds = DirectoryClient::new(region.clone());

    let (vpc_id, subnet_ids) = network(&net, "us-west-2").await;
    let directory_id = ds
        .create_directory(&directory_input(&vpc_id, &subnet_ids))
        .await
        .expect("Failed to create directory");

    let described = ds
        .describe_directories(&DescribeDirectoriesInput {
            directory_ids: vec![directory_id.clone()],
            ..Default::default()
        })
        .await
        .unwrap();
    let directory = &described.directory_descriptions[0];
    assert_eq!(directory.stage, DirectoryStage::Active);
    assert_eq!(directory.dns_ip_addrs, vec!["10.0.1.4", "10.0.2.4"]);
    let settings = directory.vpc_settings.as_ref().unwrap();
    assert_eq!(settings.availability_zones, vec!["us-west-2a", "us-west-2b"]);

    let tags = region
        .invoke(Service::Ds, "ListTagsForResource", json!({"ResourceId": directory_id}))
        .await
        .unwrap();
    assert_eq!(tags["Tags"], json!([{"Key": "team", "Value": "identity"}]));

    let deleted = ds.delete_directory(&directory_id).await.unwrap();
    assert_eq!(deleted, directory_id);
    let err = ds.delete_directory(&directory_id).await.unwrap_err();
    assert_eq!(err.code, "EntityDoesNotExistException");
    assert_eq!(err.message, format!("Directory {directory_id} does not exist"));

    let err = region
        .invoke(Service::Ds, "ListTagsForResource", json!({"ResourceId": directory_id}))
        .await
        .unwrap_err();
    assert_eq!(err.code, "EntityDoesNotExistException");

    drop((region, net, ds));
    simulator.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_validation_errors_are_batched_and_passwords_hidden() {
    let simulator = Simulator::new(config()).unwrap();
    let region = simulator.region("eu-west-1").unwrap();

    let err = region
        .invoke(
            Service::Ds,
            "CreateDirectory",
            json!({"Name": "corp.example.com", "Password": "hunter2", "Size": "Huge", "VpcSettings": {"VpcId": "vpc-1", "SubnetIds": []}}),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, "ValidationException");
    assert_eq!(err.http_status, 400);
    assert!(err.message.starts_with("2 validation errors detected: "));
    assert!(!err.message.contains("hunter2"));
    assert!(err.message.contains("Value at 'password' failed to satisfy constraint"));
    assert!(err.message.contains("Value 'Huge' at 'size'"));

    let err = region.invoke(Service::Ds, "CreateDirectory", json!({"Name": 7})).await.unwrap_err();
    assert_eq!(err.code, "SerializationException");

    let err = region.invoke(Service::Firehose, "PutRecord", json!({})).await.unwrap_err();
    assert_eq!(err.code, "InvalidAction");
    assert_eq!(err.message, "The action PutRecord is not valid for this web service.");

    drop(region);
    simulator.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_resolver_rules_forward_through_outbound_endpoint() {
    let simulator = Simulator::new(config()).unwrap();
    let region = simulator.region("us-east-1").unwrap();
    let net = NetworkClient::new(region.clone());
    let resolver = ResolverClient::new(region.clone());

    let (vpc_id, subnet_ids) = network(&net, "us-east-1").await;
    let group_id = net.create_security_group(&vpc_id, "dns").await.unwrap();

    let endpoint = resolver
        .create_resolver_endpoint(&CreateResolverEndpointInput {
            creator_request_id: "req-1".into(),
            name: Some("outbound".into()),
            security_group_ids: vec![group_id],
            direction: "OUTBOUND".into(),
            ip_addresses: subnet_ids
                .iter()
                .map(|subnet_id| IpAddressRequest {
                    subnet_id: subnet_id.clone(),
                    ip: None,
                })
                .collect(),
            tags: vec![Tag::new("env", "test")],
        })
        .await
        .unwrap();
    assert_eq!(endpoint.host_vpc_id, vpc_id);
    assert_eq!(endpoint.ip_address_count, 2);
    assert!(endpoint.id.starts_with("rslvr-out-"));

    let tags = resolver.list_tags_for_resource(&endpoint.arn).await.unwrap();
    assert_eq!(tags, vec![Tag::new("env", "test")]);

    let rule = resolver
        .create_resolver_rule(&CreateResolverRuleInput {
            creator_request_id: "rule-1".into(),
            rule_type: "FORWARD".into(),
            domain_name: "corp.example.com".into(),
            target_ips: vec![TargetAddress {
                ip: "10.1.0.10".into(),
                port: 53,
            }],
            resolver_endpoint_id: Some(endpoint.id.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    let association = resolver.associate_resolver_rule(&rule.id, &vpc_id).await.unwrap();
    assert_eq!(association.status, "COMPLETE");

    let err = resolver.delete_resolver_endpoint(&endpoint.id).await.unwrap_err();
    assert_eq!(err.code, "InvalidRequestException");

    let err = resolver.associate_resolver_rule(&rule.id, "vpc-0000000000000000").await.unwrap_err();
    assert_eq!(err.code, "InvalidParameterException");
    assert_eq!(err.message, "The vpc ID 'vpc-0000000000000000' does not exist");

    drop((region, net, resolver));
    simulator.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_quota_names_the_limit() {
    let simulator = Simulator::new(config()).unwrap();
    let firehose = FirehoseClient::new(simulator.region("us-east-2").unwrap());

    for name in ["one", "two"] {
        firehose
            .create_delivery_stream(&CreateDeliveryStreamInput {
                delivery_stream_name: name.into(),
                s3_destination_configuration: Some(json!({"BucketARN": "arn:aws:s3:::logs"})),
                ..Default::default()
            })
            .await
            .unwrap();
    }
    let err = firehose
        .create_delivery_stream(&CreateDeliveryStreamInput {
            delivery_stream_name: "three".into(),
            s3_destination_configuration: Some(json!({"BucketARN": "arn:aws:s3:::logs"})),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, "LimitExceededException");
    assert!(err.message.contains("quota of 2 hoses"));

    firehose.delete_delivery_stream("one").await.unwrap();
    let err = firehose.describe_delivery_stream("one").await.unwrap_err();
    assert_eq!(err.code, "ResourceNotFoundException");

    drop(firehose);
    simulator.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_reset_clears_one_service_in_one_region() {
    let simulator = Simulator::new(config()).unwrap();
    let west = SignerClient::new(simulator.region("us-west-1").unwrap());
    let east = SignerClient::new(simulator.region("us-east-1").unwrap());

    let input = PutSigningProfileInput {
        profile_name: "release".into(),
        platform_id: "AWSLambda-SHA384-ECDSA".into(),
        ..Default::default()
    };
    west.put_signing_profile(&input).await.unwrap();
    east.put_signing_profile(&input).await.unwrap();

    simulator.reset("us-west-1", Service::Signer).await.unwrap();

    let err = west.get_signing_profile("release").await.unwrap_err();
    assert_eq!(err.code, "ResourceNotFoundException");
    assert_eq!(err.http_status, 404);
    let kept = east.get_signing_profile("release").await.unwrap();
    assert_eq!(kept.profile.platform_display_name.as_deref(), Some("AWS Lambda"));
    assert_eq!(west.list_signing_platforms().await.unwrap().len(), 4);

    assert!(simulator.reset("mars-1", Service::Signer).await.is_err());

    drop((west, east));
    simulator.shutdown().await.unwrap();
}
