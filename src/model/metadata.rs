//! Document-level metadata for an SBOM.

use serde::{Deserialize, Serialize};
use std::fmt;

/// SBOM document metadata.
///
/// Every attribute is optional apart from the document type, so the report
/// can tell "missing" apart from "present".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document type, e.g. `SPDX` or `CycloneDX`
    pub doc_type: String,
    /// Specification version (e.g. `SPDX-2.3`, `1.5`)
    pub version: Option<String>,
    /// Document name
    pub name: Option<String>,
    /// Creators/authors
    pub creators: Vec<Creator>,
    /// Creation timestamp, as written in the source document
    pub created: Option<String>,
}

impl Document {
    /// Create a document of the given type with no other metadata
    #[must_use]
    pub fn new(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_creator(mut self, creator: Creator) -> Self {
        self.creators.push(creator);
        self
    }

    #[must_use]
    pub fn with_created(mut self, created: impl Into<String>) -> Self {
        self.created = Some(created.into());
        self
    }
}

/// Creator information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// Creator type
    pub creator_type: CreatorType,
    /// Creator name or tool identifier
    pub name: String,
    /// Optional email
    pub email: Option<String>,
}

impl Creator {
    #[must_use]
    pub fn new(creator_type: CreatorType, name: impl Into<String>) -> Self {
        Self {
            creator_type,
            name: name.into(),
            email: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Parse an SPDX creator string such as `Person: Jane Doe (jane@example.com)`.
    ///
    /// Strings without a recognised `Type:` prefix are treated as tools.
    #[must_use]
    pub fn from_spdx(value: &str) -> Self {
        let (creator_type, rest) = if let Some(rest) = value.strip_prefix("Person:") {
            (CreatorType::Person, rest)
        } else if let Some(rest) = value.strip_prefix("Organization:") {
            (CreatorType::Organization, rest)
        } else if let Some(rest) = value.strip_prefix("Tool:") {
            (CreatorType::Tool, rest)
        } else {
            (CreatorType::Tool, value)
        };

        let rest = rest.trim();
        // Trailing "(email)" is optional and may be empty: "ACME ()"
        if let (Some(open), true) = (rest.rfind('('), rest.ends_with(')')) {
            let email = rest[open + 1..rest.len() - 1].trim();
            let name = rest[..open].trim();
            let mut creator = Self::new(creator_type, name);
            if !email.is_empty() {
                creator.email = Some(email.to_string());
            }
            return creator;
        }

        Self::new(creator_type, rest)
    }
}

impl fmt::Display for Creator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.creator_type, self.name)?;
        if let Some(email) = &self.email {
            write!(f, " <{email}>")?;
        }
        Ok(())
    }
}

/// Type of creator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatorType {
    Person,
    Organization,
    Tool,
}

impl fmt::Display for CreatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Person => write!(f, "Person"),
            Self::Organization => write!(f, "Organization"),
            Self::Tool => write!(f, "Tool"),
        }
    }
}
