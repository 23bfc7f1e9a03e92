//! The fixed partition and region catalogue every simulator serves.

pub const PARTITIONS: &[&str] = &["aws", "aws-us-gov", "aws-cn"];

const AWS_REGIONS: &[&str] = &[
    "af-south-1",
    "ap-east-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-south-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ca-central-1",
    "eu-central-1",
    "eu-north-1",
    "eu-south-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "me-south-1",
    "sa-east-1",
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
];

const GOV_REGIONS: &[&str] = &["us-gov-east-1", "us-gov-west-1"];

const CN_REGIONS: &[&str] = &["cn-north-1", "cn-northwest-1"];

/// Regions of a partition, or `None` for an unknown partition.
pub fn regions_in(partition: &str) -> Option<&'static [&'static str]> {
    match partition {
        "aws" => Some(AWS_REGIONS),
        "aws-us-gov" => Some(GOV_REGIONS),
        "aws-cn" => Some(CN_REGIONS),
        _ => None,
    }
}

/// The partition a region belongs to.
pub fn partition_for(region: &str) -> Option<&'static str> {
    PARTITIONS
        .iter()
        .copied()
        .find(|p| regions_in(p).is_some_and(|regions| regions.contains(&region)))
}
