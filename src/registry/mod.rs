mod models;

pub use models::{DistroConfig, RepoStrategy}; // Re-export the model types to callers.

use crate::error::{CnImageError, Result};

/// Compile-time table, kept sorted by key.
static REGISTRY: &[DistroConfig] = &[
    DistroConfig {
        key: "almalinux",
        base: "almalinux",
        base_url: "https://repo.almalinux.org",
        proxy_url: "https://mirrors.aliyun.com",
        repo_file_patterns: &["/etc/yum.repos.d/almalinux*.repo"],
        strategy: RepoStrategy::SedRewrite,
        enable_crb: true,
        enable_rpmfusion: true,
        enable_epel: true,
        image_path: None,
        max_major: None,
    },
    DistroConfig {
        key: "centos",
        base: "centos",
        base_url: "http://mirror.centos.org/",
        proxy_url: "https://mirrors.ustc.edu.cn/centos-vault/",
        repo_file_patterns: &["/etc/yum.repos.d/CentOS-*.repo"],
        strategy: RepoStrategy::SedRewrite,
        enable_crb: false,
        enable_rpmfusion: true,
        enable_epel: true,
        image_path: None,
        max_major: Some(8),
    },
    DistroConfig {
        key: "rockylinux",
        base: "rockylinux",
        base_url: "http://dl.rockylinux.org/$contentdir",
        proxy_url: "https://mirrors.ustc.edu.cn/rocky",
        repo_file_patterns: &[
            "/etc/yum.repos.d/rocky*.repo",
            "/etc/yum.repos.d/Rocky*.repo",
        ],
        strategy: RepoStrategy::SedRewrite,
        enable_crb: true,
        enable_rpmfusion: true,
        enable_epel: true,
        image_path: None,
        max_major: None,
    },
    DistroConfig {
        key: "ubi",
        base: "ubi",
        base_url: "https://cdn-ubi.redhat.com/content/public/ubi",
        // UBI borrows the Rocky repo set for the full package catalog.
        proxy_url: "https://mirrors.aliyun.com/rockylinux",
        repo_file_patterns: &["/etc/yum.repos.d/ubi.repo"],
        strategy: RepoStrategy::UbiReplace,
        enable_crb: true,
        enable_rpmfusion: true,
        enable_epel: true,
        image_path: Some("registry.access.redhat.com/ubi{major}/ubi"),
        max_major: None,
    },
];

// ---- Public API ----

/// Borrow every registry entry.
pub fn all() -> &'static [DistroConfig] {
    REGISTRY
}

/// All valid keys, sorted for deterministic error messages.
pub fn supported_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = REGISTRY.iter().map(|c| c.key()).collect();
    keys.sort_unstable();
    keys
}

/// Find the entry for `distro`, ignoring ASCII case.
pub fn lookup(distro: &str) -> Result<&'static DistroConfig> {
    REGISTRY
        .iter()
        .find(|c| c.key().eq_ignore_ascii_case(distro))
        .ok_or_else(|| CnImageError::UnsupportedDistro {
            distro: distro.to_string(),
            supported: supported_keys(),
        })
}
