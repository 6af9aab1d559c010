//! Gender Value Object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UserError;

/// Self-declared gender; `other` when unset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// Parse an optional request value, defaulting to [`Gender::Other`]
    pub fn parse_optional(value: Option<&str>) -> Result<Self, UserError> {
        value.map(str::parse::<Gender>).transpose().map(Option::unwrap_or_default)
    }
}

impl FromStr for Gender {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(UserError::InvalidGender(s.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert!(matches!(
            "robot".parse::<Gender>(),
            Err(UserError::InvalidGender(ref g)) if g == "robot"
        ));
    }

    #[test]
    fn test_parse_optional_defaults_to_other() {
        assert_eq!(Gender::parse_optional(None).unwrap(), Gender::Other);
        assert_eq!(Gender::parse_optional(Some("male")).unwrap(), Gender::Male);
        assert!(Gender::parse_optional(Some("")).is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"female\"");
    }
}
