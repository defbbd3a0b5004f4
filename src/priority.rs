//! Issue priority as reported by citizens.
//!
//! The API sends priority either as a stage number (`1` = critical … `3` = low)
//! or as a word. Both spellings collapse into [`Priority`].

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Priority {
    Critical,
    Medium,
    Low,
    /// No priority was sent.
    #[default]
    Unknown,
    /// Anything the API sent that is not a known alias, kept verbatim.
    Other(String),
}

impl Priority {
    /// Reads a number or alias, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "critical" | "high" | "1" => Priority::Critical,
            "medium" | "2" => Priority::Medium,
            "low" | "3" => Priority::Low,
            "" => Priority::Unknown,
            _ => Priority::Other(trimmed.to_string()),
        }
    }

    /// Display name; unrecognized values show as sent.
    pub fn label(&self) -> &str {
        match self {
            Priority::Critical => "Critical",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Unknown => "Unknown",
            Priority::Other(raw) => raw,
        }
    }

    /// Border token used to frame issue cards.
    pub fn border_color(&self) -> &'static str {
        match self {
            Priority::Critical => "red-500",
            Priority::Medium => "orange-500",
            Priority::Low => "yellow-500",
            Priority::Unknown | Priority::Other(_) => "gray-200",
        }
    }

    /// Numeric rank for sorting; unknown priorities sort last.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::Unknown | Priority::Other(_) => u8::MAX,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Priority::Unknown => serializer.serialize_str(""),
            other => serializer.serialize_str(other.label()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPriority {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<RawPriority>::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawPriority::Number(n)) => Priority::parse(&n.to_string()),
            Some(RawPriority::Text(s)) => Priority::parse(&s),
            None => Priority::Unknown,
        })
    }
}
