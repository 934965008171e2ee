use std::path::PathBuf;

/// ---- Errors ----
#[derive(thiserror::Error, Debug)]
pub enum CnImageError {
    #[error("image must be in the form '<distro>:<version>', got '{reference}'")]
    MalformedReference { reference: String },
    #[error("unsupported distro '{distro}'. Supported: {}", .supported.join(", "))]
    UnsupportedDistro {
        distro: String,
        supported: Vec<&'static str>,
    },
    #[error("unsupported release '{distro}:{version}': {reason}")]
    UnsupportedRelease {
        distro: String,
        version: String,
        reason: &'static str,
    },
    #[error("error writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CnImageError {
    /// Process exit code reported by the CLI for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CnImageError::MalformedReference { .. } => 2,
            CnImageError::UnsupportedDistro { .. } | CnImageError::UnsupportedRelease { .. } => 3,
            CnImageError::Write { .. } => 4,
        }
    }
}

pub type Result<T, E = CnImageError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::CnImageError;

    #[test]
    fn unsupported_distro_lists_keys() {
        let err = CnImageError::UnsupportedDistro {
            distro: "debian".to_string(),
            supported: vec!["almalinux", "centos"],
        };
        assert_eq!(
            err.to_string(),
            "unsupported distro 'debian'. Supported: almalinux, centos"
        );
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn write_error_names_path() {
        let err = CnImageError::Write {
            path: "/nope/x.Dockerfile".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "error writing /nope/x.Dockerfile: missing");
        assert_eq!(err.exit_code(), 4);
    }
}
