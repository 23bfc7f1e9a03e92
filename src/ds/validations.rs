//! Parameter constraints for the directory service, worded as the real API words them.

use std::sync::LazyLock;

use crate::framework::validation::{
    matches, max_length, min_length, one_of_ignore_case, Pattern, Validator,
};

pub const SIZES: &[&str] = &["Small", "Large"];
pub const EDITIONS: &[&str] = &["Enterprise", "Standard"];

const PASSWORD_SOURCE: &str = r"(?=^.{8,64}$)((?=.*\d)(?=.*[A-Z])(?=.*[a-z])|(?=.*\d)(?=.*[^A-Za-z0-9\s])(?=.*[a-z])|(?=.*[^A-Za-z0-9\s])(?=.*[A-Z])(?=.*[a-z])|(?=.*\d)(?=.*[A-Z])(?=.*[^A-Za-z0-9\s]))^.*";

const ALIAS_SOURCE: &str = r"^(?!D-|d-)([\da-zA-Z]+)([-]*[\da-zA-Z])*$";

pub static PASSWORD: LazyLock<Pattern> = LazyLock::new(|| Pattern::custom(PASSWORD_SOURCE, is_strong_password));

pub static NAME: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"^([a-zA-Z0-9]+[\.-])+([a-zA-Z0-9])+$"));

pub static SHORT_NAME: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r#"^[^\/:*?"<>|.]+[^\/:*?"<>|]*$"#));

pub static SUBNET_ID: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"^(subnet-[0-9a-f]{8}|subnet-[0-9a-f]{17})$"));

pub static DIRECTORY_ID: LazyLock<Pattern> = LazyLock::new(|| Pattern::new(r"^d-[0-9a-f]{10}$"));

pub static USER_NAME: LazyLock<Pattern> = LazyLock::new(|| Pattern::new(r"^[a-zA-Z0-9._-]+$"));

pub static IP_ADDR: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
});

pub static ALIAS: LazyLock<Pattern> = LazyLock::new(|| Pattern::custom(ALIAS_SOURCE, is_valid_alias));

/// 8 to 64 characters drawn from at least three of: digits, upper case, lower case
/// and symbols (anything else but whitespace).
fn is_strong_password(value: &str) -> bool {
    let len = value.chars().count();
    if !(8..=64).contains(&len) || value.contains('\n') {
        return false;
    }
    let digit = value.chars().any(|c| c.is_ascii_digit());
    let upper = value.chars().any(|c| c.is_ascii_uppercase());
    let lower = value.chars().any(|c| c.is_ascii_lowercase());
    let symbol = value.chars().any(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace());
    [digit, upper, lower, symbol].iter().filter(|present| **present).count() >= 3
}

/// Alphanumeric runs joined by hyphens, never starting with `d-`/`D-`.
fn is_valid_alias(value: &str) -> bool {
    if value.starts_with("d-") || value.starts_with("D-") {
        return false;
    }
    let mut chars = value.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    let last_ok = value.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());
    first_ok && last_ok && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// The fields every directory-creating call carries, checked in the order the
/// real API reports them.
pub struct DirectoryFields<'a> {
    pub password: &'a str,
    /// `("size", Some(value), SIZES)` or `("edition", value, EDITIONS)`.
    pub flavor: (&'static str, Option<&'a str>, &'static [&'static str]),
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub short_name: Option<&'a str>,
}

pub fn check_directory_fields(v: &mut Validator, fields: &DirectoryFields<'_>) {
    let (flavor_field, flavor_value, allowed) = fields.flavor;
    v.check("password", fields.password, matches(&PASSWORD));
    v.check_opt(flavor_field, flavor_value, one_of_ignore_case(allowed));
    v.check("name", fields.name, matches(&NAME));
    v.check_opt("description", fields.description, max_length(128));
    v.check_opt("shortName", fields.short_name, matches(&SHORT_NAME));
}

pub fn check_subnet_ids(v: &mut Validator, field: &str, subnet_ids: &[String]) {
    for subnet_id in subnet_ids {
        v.check(field, subnet_id.as_str(), matches(&SUBNET_ID));
    }
}

pub fn check_directory_id(v: &mut Validator, directory_id: &str) {
    v.check("directoryId", directory_id, matches(&DIRECTORY_ID));
}

pub fn check_alias(v: &mut Validator, alias: &str) {
    v.check("alias", alias, max_length(62));
    v.check("alias", alias, min_length(1));
    v.check("alias", alias, matches(&ALIAS));
}
