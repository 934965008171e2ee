use std::fmt;

use crate::error::{CnImageError, Result};

/// A `<distro>:<version>` pair as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    distro: String,
    version: String,
}

impl ImageReference {
    /// Split `reference` on its single colon.
    ///
    /// The distro is trimmed and lowercased; the version is only trimmed and
    /// otherwise kept as an opaque token.
    pub fn parse(reference: &str) -> Result<Self> {
        let malformed = || CnImageError::MalformedReference {
            reference: reference.to_string(),
        };

        let mut parts = reference.split(':');
        let (Some(distro), Some(version), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let distro = distro.trim().to_ascii_lowercase();
        let version = version.trim().to_string();
        if distro.is_empty() || version.is_empty() {
            return Err(malformed());
        }

        Ok(Self { distro, version })
    }

    pub fn distro(&self) -> &str {
        &self.distro
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.distro, self.version)
    }
}
