//! Major/minor/patch version triple shared by releases and add-ons

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::version::error::FormatError;

/// How a version is rendered as text
///
/// Releases and add-ons share one ordering but render differently:
/// release directories read `2020.1` while add-on versions read `2.1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStyle {
    /// Patch shown only when non-zero ("13.2", "13.2.1")
    Release,
    /// Patch always shown ("1.3.0")
    Package,
}

/// An ordered `(major, minor, patch)` triple
///
/// Ordering is lexicographic over the three components. A version parsed
/// without a patch component has `patch == 0` and is equal to the same
/// version written with an explicit `.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Shorthand for a version without a patch component
    pub const fn major_minor(major: u32, minor: u32) -> Self {
        Self::new(major, minor, 0)
    }

    /// Parse a dotted version string such as `2020.1` or `1.3.0`
    pub fn parse(input: &str) -> Result<Self, FormatError> {
        let parts: Vec<&str> = input.split('.').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(FormatError::ComponentCount {
                input: input.to_string(),
                count: parts.len(),
            });
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = parse_component(part).ok_or_else(|| FormatError::NotNumeric {
                input: input.to_string(),
                component: part.to_string(),
            })?;
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }

    /// Build a version from a `{major, minor, patch?}` object
    ///
    /// Components may be JSON integers or numeric strings. A missing, null,
    /// zero or empty patch means patch 0.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, FormatError> {
        let major = required_field(fields, "major")?;
        let minor = required_field(fields, "minor")?;
        let patch = match fields.get("patch") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => 0,
            Some(Value::String(s)) if s.is_empty() => 0,
            Some(value) => field_value("patch", value)?,
        };
        Ok(Self::new(major, minor, patch))
    }

    /// The `{major, minor, patch}` object form, patch always present
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("major".to_string(), Value::from(self.major));
        fields.insert("minor".to_string(), Value::from(self.minor));
        fields.insert("patch".to_string(), Value::from(self.patch));
        fields
    }

    pub fn format(&self, style: VersionStyle) -> String {
        match style {
            VersionStyle::Release if self.patch == 0 => format!("{}.{}", self.major, self.minor),
            _ => format!("{}.{}.{}", self.major, self.minor, self.patch),
        }
    }
}

fn parse_component(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn required_field(fields: &Map<String, Value>, name: &'static str) -> Result<u32, FormatError> {
    let value = fields.get(name).ok_or(FormatError::MissingField(name))?;
    field_value(name, value)
}

fn field_value(name: &'static str, value: &Value) -> Result<u32, FormatError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => parse_component(s),
        _ => None,
    };
    parsed.ok_or_else(|| FormatError::InvalidField {
        field: name,
        value: value.to_string(),
    })
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(VersionStyle::Package))
    }
}

impl FromStr for Version {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("major", &self.major)?;
        map.serialize_entry("minor", &self.minor)?;
        map.serialize_entry("patch", &self.patch)?;
        map.end()
    }
}

/// Accepts both the object form and a dotted string
impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Version::parse(&s).map_err(de::Error::custom),
            Value::Object(fields) => Version::from_fields(&fields).map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected a version object or dotted string, got {other}"
            ))),
        }
    }
}
