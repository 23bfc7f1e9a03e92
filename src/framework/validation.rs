//! # Validation Engine
//!
//! Batched parameter validation in the style of the real control-plane APIs.
//!
//! A [`Validator`] runs every check it is given, in order, and records a
//! [`Violation`] for each one that fails. Nothing short-circuits: the caller
//! gets one [`ValidationError`] listing everything wrong with the request.
//!
//! ```ignore
//! let mut v = Validator::new();
//! v.check("size", size, one_of_ignore_case(&["Small", "Large"]));
//! v.check_opt("description", description, max_length(128));
//! v.finish()?;
//! ```
//!
//! Rendering follows the wire format exactly:
//!
//! ```text
//! 2 validation errors detected: Value 'big' at 'size' failed to satisfy constraint: Member must satisfy enum value set: [Small, Large]; Value at 'password' failed to satisfy constraint: ...
//! ```

use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::framework::error::ErrorCode;

/// A single failed check: which field, what it held, and the constraint it broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub value: String,
    pub constraint: String,
}

impl Violation {
    /// Only the field named `password` hides its value.
    fn is_secret(&self) -> bool {
        self.field == "password"
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_secret() {
            write!(f, "Value at '{}'", self.field)?;
        } else {
            write!(f, "Value '{}' at '{}'", self.value, self.field)?;
        }
        write!(f, " failed to satisfy constraint: Member must {}", self.constraint)
    }
}

/// Every violation collected for one request, surfaced as `ValidationException`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

fn render(violations: &[Violation]) -> String {
    let n = violations.len();
    let clauses: Vec<String> = violations.iter().map(ToString::to_string).collect();
    format!(
        "{n} validation error{} detected: {}",
        if n > 1 { "s" } else { "" },
        clauses.join("; ")
    )
}

impl ValidationError {
    /// A single-violation error, for checks that live outside a [`Validator`] pass.
    pub fn single(field: &str, value: impl FieldValue, constraint: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation {
                field: field.to_string(),
                value: value.render(),
                constraint: constraint.into(),
            }],
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl ErrorCode for ValidationError {
    fn code(&self) -> &'static str {
        "ValidationException"
    }
}

// =============================================================================
// VALUE RENDERING
// =============================================================================

/// How a parameter value appears inside a violation clause.
pub trait FieldValue {
    fn render(&self) -> String;
}

impl FieldValue for str {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl FieldValue for String {
    fn render(&self) -> String {
        self.clone()
    }
}

impl<T: FieldValue + ?Sized> FieldValue for &T {
    fn render(&self) -> String {
        (**self).render()
    }
}

macro_rules! numeric_field_value {
    ($($t:ty),*) => {
        $(impl FieldValue for $t {
            fn render(&self) -> String {
                self.to_string()
            }
        })*
    };
}

numeric_field_value!(i32, i64, u16, u32, u64, usize);

impl<T: FieldValue> FieldValue for [T] {
    fn render(&self) -> String {
        let items: Vec<String> = self.iter().map(FieldValue::render).collect();
        format!("[{}]", items.join(", "))
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn render(&self) -> String {
        self.as_slice().render()
    }
}

/// Renders structured values (lists of request members) as compact JSON.
pub struct AsJson<'a, T: Serialize + ?Sized>(pub &'a T);

impl<T: Serialize + ?Sized> FieldValue for AsJson<'_, T> {
    fn render(&self) -> String {
        serde_json::to_string(self.0).unwrap_or_default()
    }
}

// =============================================================================
// THE ACCUMULATOR
// =============================================================================

/// Collects violations across many checks. See the module docs.
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `rule` against `value`; a failure records the rule's constraint text.
    pub fn check<V, R>(&mut self, field: &str, value: &V, rule: R) -> &mut Self
    where
        V: FieldValue + ?Sized,
        R: FnOnce(&V) -> Result<(), String>,
    {
        if let Err(constraint) = rule(value) {
            self.violations.push(Violation {
                field: field.to_string(),
                value: value.render(),
                constraint,
            });
        }
        self
    }

    /// Like [`check`](Self::check), skipped entirely when the parameter is absent.
    pub fn check_opt<V, R>(&mut self, field: &str, value: Option<&V>, rule: R) -> &mut Self
    where
        V: FieldValue + ?Sized,
        R: FnOnce(&V) -> Result<(), String>,
    {
        match value {
            Some(value) => self.check(field, value, rule),
            None => self,
        }
    }

    /// Records a violation for a rule the caller evaluated itself.
    pub fn violation(&mut self, field: &str, value: impl FieldValue, constraint: impl Into<String>) -> &mut Self {
        self.violations.push(Violation {
            field: field.to_string(),
            value: value.render(),
            constraint: constraint.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn finish(&mut self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: std::mem::take(&mut self.violations),
            })
        }
    }
}

// =============================================================================
// RULES
// =============================================================================

pub fn max_length(max: usize) -> impl Fn(&str) -> Result<(), String> {
    move |value| {
        if value.chars().count() > max {
            Err(format!("have length less than or equal to {max}"))
        } else {
            Ok(())
        }
    }
}

pub fn min_length(min: usize) -> impl Fn(&str) -> Result<(), String> {
    move |value| {
        if value.chars().count() < min {
            Err(format!("have length greater than or equal to {min}"))
        } else {
            Ok(())
        }
    }
}

/// Bounds the number of items in a list parameter.
pub fn max_items<T>(max: usize) -> impl Fn(&[T]) -> Result<(), String> {
    move |items| {
        if items.len() > max {
            Err(format!("have length less than or equal to {max}"))
        } else {
            Ok(())
        }
    }
}

pub fn max_value<N: PartialOrd + fmt::Display + Copy>(max: N) -> impl Fn(&N) -> Result<(), String> {
    move |value| {
        if *value > max {
            Err(format!("have value less than or equal to {max}"))
        } else {
            Ok(())
        }
    }
}

pub fn min_value<N: PartialOrd + fmt::Display + Copy>(min: N) -> impl Fn(&N) -> Result<(), String> {
    move |value| {
        if *value < min {
            Err(format!("have value greater than or equal to {min}"))
        } else {
            Ok(())
        }
    }
}

fn enum_constraint(allowed: &[&str]) -> String {
    format!("satisfy enum value set: [{}]", allowed.join(", "))
}

pub fn one_of<'a>(allowed: &'a [&'a str]) -> impl Fn(&str) -> Result<(), String> + 'a {
    move |value| {
        if allowed.iter().any(|a| *a == value) {
            Ok(())
        } else {
            Err(enum_constraint(allowed))
        }
    }
}

pub fn one_of_ignore_case<'a>(allowed: &'a [&'a str]) -> impl Fn(&str) -> Result<(), String> + 'a {
    move |value| {
        if allowed.iter().any(|a| a.eq_ignore_ascii_case(value)) {
            Ok(())
        } else {
            Err(enum_constraint(allowed))
        }
    }
}

pub fn matches(pattern: &Pattern) -> impl Fn(&str) -> Result<(), String> + '_ {
    move |value| {
        if pattern.is_match(value) {
            Ok(())
        } else {
            Err(format!("satisfy regular expression pattern: {}", pattern.source))
        }
    }
}

enum Matcher {
    Regex(Regex),
    Custom(fn(&str) -> bool),
}

/// A documented constraint pattern and the predicate that enforces it.
///
/// Regex-backed patterns must match the whole value. Documented patterns that rely
/// on look-around are enforced by an equivalent hand-written predicate while the
/// message still quotes the documented source.
pub struct Pattern {
    source: &'static str,
    matcher: Matcher,
}

impl Pattern {
    /// Compiles a constant pattern. Panics on an invalid pattern, which is a
    /// programming error caught by the unit tests.
    pub fn new(source: &'static str) -> Self {
        let regex = Regex::new(&format!("^(?:{source})$"))
            .unwrap_or_else(|e| panic!("invalid constraint pattern {source}: {e}"));
        Self { source, matcher: Matcher::Regex(regex) }
    }

    pub fn custom(source: &'static str, predicate: fn(&str) -> bool) -> Self {
        Self { source, matcher: Matcher::Custom(predicate) }
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        match &self.matcher {
            Matcher::Regex(regex) => regex.is_match(value),
            Matcher::Custom(predicate) => predicate(value),
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}
