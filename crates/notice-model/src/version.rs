use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Prefix carried by the version marker inside notices (`cbc:CustomizationID`).
pub const SDK_VERSION_PREFIX: &str = "eforms-sdk-";

/// An eForms SDK version such as `1.10.0` or `eforms-sdk-1.10`.
///
/// The patch component is optional because notices only carry
/// `major.minor` in their version marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SdkVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl SdkVersion {
    pub const fn new(major: u32, minor: u32, patch: Option<u32>) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses a version with or without the `eforms-sdk-` prefix.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        let trimmed = value.trim();
        let bare = trimmed.strip_prefix(SDK_VERSION_PREFIX).unwrap_or(trimmed);
        let invalid = |message: &str| ModelError::InvalidVersion {
            value: value.to_string(),
            message: message.to_string(),
        };

        let parts: Vec<&str> = bare.split('.').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(invalid("expected major.minor[.patch]"));
        }
        let major = parts[0]
            .parse::<u32>()
            .map_err(|_| invalid("major is not a number"))?;
        let minor = parts[1]
            .parse::<u32>()
            .map_err(|_| invalid("minor is not a number"))?;
        let patch = match parts.get(2) {
            // Pre-release suffixes like `0-SNAPSHOT` only keep their numeric head.
            Some(raw) => {
                let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
                if digits.is_empty() {
                    return Err(invalid("patch is not a number"));
                }
                Some(
                    digits
                        .parse::<u32>()
                        .map_err(|_| invalid("patch is not a number"))?,
                )
            }
            None => None,
        };
        Ok(Self::new(major, minor, patch))
    }

    /// True when both versions share major and minor.
    pub fn same_minor(&self, other: &SdkVersion) -> bool {
        self.major == other.major && self.minor == other.minor
    }

    /// `major.minor` form, as used for SDK directory lookups.
    pub fn without_patch(&self) -> Self {
        Self::new(self.major, self.minor, None)
    }

    pub fn to_prefixed_string(&self) -> String {
        format!("{SDK_VERSION_PREFIX}{self}")
    }
}

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

impl FromStr for SdkVersion {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SdkVersion {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SdkVersion> for String {
    fn from(value: SdkVersion) -> Self {
        value.to_string()
    }
}
