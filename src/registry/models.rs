use serde::Serialize;

/// How the repository definitions shipped in the base image get repointed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepoStrategy {
    /// Comment out `mirrorlist=` and rewrite matching `baseurl=` lines in place.
    SedRewrite,
    /// Drop the vendor repo file and write Rocky BaseOS/AppStream stanzas instead.
    UbiReplace,
}

/// Public model; one entry per supported distro key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistroConfig {
    pub(crate) key: &'static str,
    pub(crate) base: &'static str,
    #[serde(rename = "baseurl")]
    pub(crate) base_url: &'static str,
    #[serde(rename = "proxyurl")]
    pub(crate) proxy_url: &'static str,
    pub(crate) repo_file_patterns: &'static [&'static str],
    pub(crate) strategy: RepoStrategy,
    pub(crate) enable_crb: bool,
    pub(crate) enable_rpmfusion: bool,
    pub(crate) enable_epel: bool,
    /// Registry path without tag. `{major}` is replaced by the major version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) image_path: Option<&'static str>,
    /// Newest major release whose repo files still carry `baseurl=` lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_major: Option<u32>,
}

impl DistroConfig {
    // Borrowing getters (no clones).
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn base(&self) -> &'static str {
        self.base
    }

    /// Upstream URL prefix matched in `baseurl=` lines.
    pub fn base_url(&self) -> &'static str {
        self.base_url
    }

    /// Default regional mirror used when no override is given.
    pub fn proxy_url(&self) -> &'static str {
        self.proxy_url
    }

    pub fn repo_file_patterns(&self) -> &'static [&'static str] {
        self.repo_file_patterns
    }

    pub fn strategy(&self) -> RepoStrategy {
        self.strategy
    }

    pub fn enable_crb(&self) -> bool {
        self.enable_crb
    }

    pub fn enable_rpmfusion(&self) -> bool {
        self.enable_rpmfusion
    }

    pub fn enable_epel(&self) -> bool {
        self.enable_epel
    }

    pub fn image_path(&self) -> Option<&'static str> {
        self.image_path
    }

    pub fn max_major(&self) -> Option<u32> {
        self.max_major
    }

    /// Base image reference (`<path>:<version>`) for the requested version.
    pub fn base_image(&self, version: &str, major: &str) -> String {
        match self.image_path {
            Some(path) => format!("{}:{version}", path.replace("{major}", major)),
            None => format!("{}:{version}", self.base),
        }
    }
}
