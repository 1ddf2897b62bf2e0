//! Mod manifest schema and validation.
//!
//! Any `*.json` file that deserializes into [`ModManifest`] is a
//! manifest candidate; whether it is accepted depends on the validation
//! mode of the discovery run. Validation never short-circuits: every
//! field rule runs and all failures are reported together.

pub mod discovery;

use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NAME_LENGTH: usize = 64;

/// A single failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Parsed mod manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModManifest {
    pub name: String,
    pub version: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ModManifest {
    /// Run every field rule and report all failures together. An `Err`
    /// list is non-empty by construction.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        validate_name(&self.name, &mut errors);
        validate_version(&self.version, &mut errors);
        validate_author(&self.author, &mut errors);
        validate_tags(&self.tags, &mut errors);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn validate_name(name: &str, errors: &mut Vec<ValidationError>) {
    if name.trim().is_empty() {
        errors.push(ValidationError {
            field: "name",
            message: "must not be empty".to_string(),
        });
    } else if name.len() > MAX_NAME_LENGTH {
        errors.push(ValidationError {
            field: "name",
            message: format!("must be at most {MAX_NAME_LENGTH} characters"),
        });
    }
    if name.contains('/') || name.contains('\\') {
        errors.push(ValidationError {
            field: "name",
            message: "must not contain path separators".to_string(),
        });
    }
}

fn validate_version(version: &str, errors: &mut Vec<ValidationError>) {
    let parts: Vec<&str> = version.split('.').collect();
    let well_formed = parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
    if !well_formed {
        errors.push(ValidationError {
            field: "version",
            message: format!("'{version}' is not of the form MAJOR.MINOR.PATCH"),
        });
    }
}

fn validate_author(author: &str, errors: &mut Vec<ValidationError>) {
    if author.trim().is_empty() {
        errors.push(ValidationError {
            field: "author",
            message: "must not be empty".to_string(),
        });
    }
}

fn validate_tags(tags: &[String], errors: &mut Vec<ValidationError>) {
    for tag in tags {
        if tag.trim().is_empty() {
            errors.push(ValidationError {
                field: "tags",
                message: "tags must not be empty".to_string(),
            });
        }
    }
}
