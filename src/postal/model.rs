use std::fmt;
use std::sync::LazyLock;
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use crate::error::LookupError;

/// Max characters kept from the pincode input
pub const PINCODE_LEN: usize = 6;

// ASCII only: `\d` would also accept other Unicode digits
static PINCODE_REG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{6}$").unwrap());

/// A postal code that passed validation, i.e. exactly six ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pincode(String);

impl Pincode {
    /// validate user input, surrounding whitespace is ignored
    pub fn parse(input: &str) -> Result<Self, LookupError> {
        let trimmed = input.trim();
        if PINCODE_REG.is_match(trimmed) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(LookupError::InvalidPincode)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pincode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One post office entry as returned by the service.
///
/// Fields that are missing or not strings come through as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PostOfficeRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pincode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
}

impl PostOfficeRecord {
    /// case-insensitive substring match on the name.
    ///
    /// `needle` must already be lowercase. A record without a name never matches.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(needle))
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        _ => None,
    }))
}

/// Entries that are not objects are skipped, a non-array list is an error
fn lenient_offices<'de, D>(deserializer: D) -> Result<Option<Vec<PostOfficeRecord>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(
            items.into_iter()
                .filter_map(|item| match item {
                    Value::Object(_) => serde_json::from_value(item).ok(),
                    _ => None,
                })
                .collect(),
        )),
        Some(other) => Err(D::Error::custom(format!("expected a list of post offices, got {other}"))),
    }
}

/// The single element the service wraps its answer in
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Envelope {
    #[serde(default, deserialize_with = "lenient_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    message: Option<String>,
    /// `null` on errors
    #[serde(default, deserialize_with = "lenient_offices")]
    post_office: Option<Vec<PostOfficeRecord>>,
}

const ERROR_STATUS: &str = "Error";

/// Turn a raw response body into the list of post offices.
///
/// Only the first array element is looked at. A `Status` of exactly `"Error"`
/// is a service error, anything else counts as success.
pub fn interpret_response(body: &str) -> Result<Vec<PostOfficeRecord>, LookupError> {
    let value: Value = serde_json::from_str(body).map_err(LookupError::transport)?;
    let first = match value {
        Value::Array(items) => items.into_iter().next(),
        _ => None,
    };
    let first = match first {
        None | Some(Value::Null) => return Err(LookupError::MalformedResponse),
        Some(first) => first,
    };
    let envelope: Envelope = serde_json::from_value(first)
        .map_err(|_| LookupError::MalformedResponse)?;

    if envelope.status.as_deref() == Some(ERROR_STATUS) {
        return Err(LookupError::Api(envelope.message));
    }
    Ok(envelope.post_office.unwrap_or_default())
}
