mod artifact;

pub use artifact::{CONTINUATION, RenderedArtifact};

use tracing::{debug, info};

use crate::error::{CnImageError, Result};
use crate::helpers::major_version;
use crate::helpers::sed::{SedCommand, single_quote};
use crate::reference::ImageReference;
use crate::registry::{self, DistroConfig, RepoStrategy};

pub const DEFAULT_MAINTAINER: &str = "DawnMagnet";

const RPMFUSION_MIRROR: &str = "https://mirrors.ustc.edu.cn/rpmfusion";
const EPEL_MIRROR: &str = "https://mirrors.ustc.edu.cn/epel/";

const NULLGLOB: &str = "shopt -s nullglob";
const ENSURE_DNF: &str = "(command -v dnf >/dev/null 2>&1 || (yum install -y dnf && hash -r))";
const CLEAN_CACHE: &str = "dnf clean all";

const UBI_SUBSCRIPTION_OFF: &str =
    "sed -i 's/enabled=1/enabled=0/g' /etc/yum/pluginconf.d/subscription-manager.conf";
const UBI_MIRROR_REPO_FILE: &str = "/etc/yum.repos.d/rocky-mirror.repo";
const ROCKY_GPG_KEY: &str = "file:///etc/pki/rpm-gpg/RPM-GPG-KEY-rockyofficial";

const STREAM_REASON: &str =
    "CentOS Stream repo files have no baseurl= directives to rewrite; use rockylinux or almalinux";

/// Which optional builder repo group a release ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrbVariant {
    /// EL8 names the group `powertools` and needs the config-manager plugin.
    PowerTools,
    /// EL9 and later ship the `crb` helper.
    Crb,
}

impl CrbVariant {
    pub fn for_major(major: &str) -> Self {
        if major == "8" {
            CrbVariant::PowerTools
        } else {
            CrbVariant::Crb
        }
    }

    pub fn fragment(self) -> &'static str {
        match self {
            // Not every EL8 rebuild calls it `powertools`, so failure is tolerated.
            CrbVariant::PowerTools => {
                "dnf install -y 'dnf-command(config-manager)' && dnf config-manager --set-enabled powertools || true"
            }
            CrbVariant::Crb => "if command -v crb >/dev/null 2>&1; then crb enable; fi",
        }
    }
}

/// The override when it is non-blank, otherwise the distro's default mirror.
pub fn effective_mirror<'a>(cfg: &'a DistroConfig, mirror_override: Option<&'a str>) -> &'a str {
    mirror_override
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(cfg.proxy_url())
}

/// Reject releases whose repository layout the sed rewrite cannot handle.
pub fn ensure_supported_release(cfg: &DistroConfig, version: &str) -> Result<()> {
    let Some(max_major) = cfg.max_major() else {
        return Ok(());
    };

    let is_stream = version.to_ascii_lowercase().contains("stream");
    let too_new = major_version(version)
        .parse::<u32>()
        .is_ok_and(|major| major > max_major);

    if is_stream || too_new {
        return Err(CnImageError::UnsupportedRelease {
            distro: cfg.key().to_string(),
            version: version.to_string(),
            reason: STREAM_REASON,
        });
    }
    Ok(())
}

fn sed_rewrite_fragment(cfg: &DistroConfig, mirror: &str) -> String {
    SedCommand::new()
        .substitute("^mirrorlist=", "#mirrorlist=")
        .substitute(
            &format!(r"^#\? \?baseurl={}", cfg.base_url()),
            &format!("baseurl={mirror}"),
        )
        .in_place(cfg.repo_file_patterns())
}

fn ubi_repo_file(mirror: &str, version: &str, major: &str) -> String {
    let mirror = mirror.strip_suffix('/').unwrap_or(mirror);
    [("baseos", "BaseOS"), ("appstream", "AppStream")]
        .iter()
        .map(|(id, label)| {
            format!(
                "[{id}]\nname=Rocky Linux {major} - {label}\nbaseurl={mirror}/{version}/{label}/$basearch/os/\ngpgcheck=1\nenabled=1\ngpgkey={ROCKY_GPG_KEY}"
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn ubi_replace_fragments(
    cfg: &DistroConfig,
    mirror: &str,
    version: &str,
    major: &str,
) -> Vec<String> {
    let content = ubi_repo_file(mirror, version, major).replace('\n', "\\n");
    vec![
        UBI_SUBSCRIPTION_OFF.to_string(),
        format!("rm -f {}", cfg.repo_file_patterns().join(" ")),
        format!("echo -e {} > {UBI_MIRROR_REPO_FILE}", single_quote(&content)),
    ]
}

fn rpmfusion_fragments(major: &str) -> Vec<String> {
    let install = format!(
        "dnf install -y {RPMFUSION_MIRROR}/free/el/rpmfusion-free-release-{major}.noarch.rpm {RPMFUSION_MIRROR}/nonfree/el/rpmfusion-nonfree-release-{major}.noarch.rpm"
    );
    let rewrite = SedCommand::new()
        .substitute("^metalink=", "#metalink=")
        .substitute(
            "^#baseurl=http://download1.rpmfusion.org",
            &format!("baseurl={RPMFUSION_MIRROR}"),
        )
        .in_place(&["/etc/yum.repos.d/rpmfusion*.repo"]);
    vec![install, rewrite]
}

fn epel_fragment() -> String {
    let baseurl = format!("baseurl={EPEL_MIRROR}");
    SedCommand::new()
        .substitute("^metalink=", "#metalink=")
        .substitute(r"^#baseurl=https\?://download.fedoraproject.org/pub/epel/", &baseurl)
        .substitute(r"^#baseurl=https\?://download.example/pub/epel/", &baseurl)
        .in_place(&["/etc/yum.repos.d/epel{,-testing}.repo"])
}

/// Ordered shell fragments for the single `RUN` step.
pub fn instruction_fragments(cfg: &DistroConfig, version: &str, mirror: &str) -> Vec<String> {
    let major = major_version(version);
    let mut fragments = vec![NULLGLOB.to_string()];

    match cfg.strategy() {
        RepoStrategy::SedRewrite => fragments.push(sed_rewrite_fragment(cfg, mirror)),
        RepoStrategy::UbiReplace => {
            fragments.extend(ubi_replace_fragments(cfg, mirror, version, major))
        }
    }

    fragments.push(ENSURE_DNF.to_string());

    if cfg.enable_rpmfusion() {
        fragments.extend(rpmfusion_fragments(major));
    }

    if cfg.enable_crb() {
        let variant = CrbVariant::for_major(major);
        debug!(?variant, major, "enabling builder repo group");
        fragments.push(variant.fragment().to_string());
    }

    if cfg.enable_epel() {
        fragments.push(epel_fragment());
    }

    fragments.push(CLEAN_CACHE.to_string());
    fragments
}

/// Assemble the artifact for an already resolved registry entry.
pub fn render(
    cfg: &DistroConfig,
    version: &str,
    mirror_override: Option<&str>,
    maintainer: &str,
) -> RenderedArtifact {
    let mirror = effective_mirror(cfg, mirror_override);
    let overridden = mirror != cfg.proxy_url();
    debug!(
        distro = cfg.key(),
        version,
        mirror,
        overridden,
        strategy = ?cfg.strategy(),
        "assembling dockerfile"
    );

    let fragments = instruction_fragments(cfg, version, mirror);
    let base_image = cfg.base_image(version, major_version(version));
    RenderedArtifact::new(base_image, maintainer.to_string(), fragments)
}

/// Resolve `reference` against the registry and render its Dockerfile.
pub fn generate(
    reference: &ImageReference,
    mirror_override: Option<&str>,
    maintainer: &str,
) -> Result<RenderedArtifact> {
    let cfg = registry::lookup(reference.distro())?;
    ensure_supported_release(cfg, reference.version())?;
    info!(%reference, "generating dockerfile");
    Ok(render(cfg, reference.version(), mirror_override, maintainer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(key: &str) -> &'static DistroConfig {
        registry::lookup(key).unwrap()
    }

    #[test]
    fn crb_variant_follows_major() {
        assert_eq!(CrbVariant::for_major("8"), CrbVariant::PowerTools);
        assert_eq!(CrbVariant::for_major("9"), CrbVariant::Crb);
        assert_eq!(CrbVariant::for_major("10"), CrbVariant::Crb);
        assert_eq!(CrbVariant::for_major("latest"), CrbVariant::Crb);
    }

    #[test]
    fn blank_override_falls_back_to_default() {
        let alma = cfg("almalinux");
        assert_eq!(effective_mirror(alma, None), "https://mirrors.aliyun.com");
        assert_eq!(effective_mirror(alma, Some("")), "https://mirrors.aliyun.com");
        assert_eq!(effective_mirror(alma, Some("  ")), "https://mirrors.aliyun.com");
        assert_eq!(
            effective_mirror(alma, Some("https://mirror.example.net")),
            "https://mirror.example.net"
        );
    }

    #[test]
    fn standard_sed_rewrite() {
        let frags = instruction_fragments(cfg("rockylinux"), "9", "https://mirrors.ustc.edu.cn/rocky");
        assert_eq!(
            frags[1],
            r"sed -e 's|^mirrorlist=|#mirrorlist=|g' -e 's|^#\? \?baseurl=http://dl.rockylinux.org/$contentdir|baseurl=https://mirrors.ustc.edu.cn/rocky|g' -i.bak /etc/yum.repos.d/rocky*.repo /etc/yum.repos.d/Rocky*.repo"
        );
    }

    #[test]
    fn fragment_order() {
        let frags = instruction_fragments(cfg("almalinux"), "9", "https://mirrors.aliyun.com");
        assert_eq!(frags.len(), 8);
        assert_eq!(frags[0], NULLGLOB);
        assert!(frags[1].starts_with("sed -e 's|^mirrorlist="));
        assert_eq!(frags[2], ENSURE_DNF);
        assert!(frags[3].starts_with("dnf install -y https://mirrors.ustc.edu.cn/rpmfusion/free/el/rpmfusion-free-release-9.noarch.rpm"));
        assert!(frags[4].ends_with("/etc/yum.repos.d/rpmfusion*.repo"));
        assert_eq!(frags[5], CrbVariant::Crb.fragment());
        assert!(frags[6].ends_with("/etc/yum.repos.d/epel{,-testing}.repo"));
        assert_eq!(frags[7], CLEAN_CACHE);
    }

    #[test]
    fn rpmfusion_install_and_rewrite() {
        let frags = rpmfusion_fragments("8");
        assert_eq!(
            frags[0],
            "dnf install -y https://mirrors.ustc.edu.cn/rpmfusion/free/el/rpmfusion-free-release-8.noarch.rpm https://mirrors.ustc.edu.cn/rpmfusion/nonfree/el/rpmfusion-nonfree-release-8.noarch.rpm"
        );
        assert_eq!(
            frags[1],
            "sed -e 's|^metalink=|#metalink=|g' -e 's|^#baseurl=http://download1.rpmfusion.org|baseurl=https://mirrors.ustc.edu.cn/rpmfusion|g' -i.bak /etc/yum.repos.d/rpmfusion*.repo"
        );
    }

    #[test]
    fn epel_rewrite() {
        assert_eq!(
            epel_fragment(),
            r"sed -e 's|^metalink=|#metalink=|g' -e 's|^#baseurl=https\?://download.fedoraproject.org/pub/epel/|baseurl=https://mirrors.ustc.edu.cn/epel/|g' -e 's|^#baseurl=https\?://download.example/pub/epel/|baseurl=https://mirrors.ustc.edu.cn/epel/|g' -i.bak /etc/yum.repos.d/epel{,-testing}.repo"
        );
    }

    #[test]
    fn centos_skips_crb() {
        let frags = instruction_fragments(cfg("centos"), "7", "https://mirrors.ustc.edu.cn/centos-vault/");
        assert!(!frags.iter().any(|f| f.contains("crb") || f.contains("powertools")));
    }

    #[test]
    fn ubi_replaces_repo_file() {
        let frags = instruction_fragments(cfg("ubi"), "9.4", "https://mirrors.aliyun.com/rockylinux/");
        assert_eq!(frags[1], UBI_SUBSCRIPTION_OFF);
        assert_eq!(
            frags[2],
            format!("rm -f {}", cfg("ubi").repo_file_patterns().join(" "))
        );
        assert_eq!(frags[2], "rm -f /etc/yum.repos.d/ubi.repo");
        assert!(frags[3].starts_with("echo -e '[baseos]\\nname=Rocky Linux 9 - BaseOS\\nbaseurl=https://mirrors.aliyun.com/rockylinux/9.4/BaseOS/$basearch/os/\\n"));
        assert!(frags[3].contains("[appstream]\\nname=Rocky Linux 9 - AppStream\\nbaseurl=https://mirrors.aliyun.com/rockylinux/9.4/AppStream/$basearch/os/"));
        assert!(frags[3].ends_with("' > /etc/yum.repos.d/rocky-mirror.repo"));
        assert!(!frags.iter().any(|f| f.contains("mirrorlist")));
    }

    #[test]
    fn centos_stream_is_rejected() {
        let centos = cfg("centos");
        assert!(ensure_supported_release(centos, "7").is_ok());
        assert!(ensure_supported_release(centos, "8.4.2105").is_ok());
        for v in ["stream9", "Stream10", "9"] {
            assert!(matches!(
                ensure_supported_release(centos, v),
                Err(CnImageError::UnsupportedRelease { .. })
            ));
        }
        assert!(ensure_supported_release(cfg("rockylinux"), "10").is_ok());
    }

    #[test]
    fn generate_resolves_reference() {
        let reference = ImageReference::parse("AlmaLinux:9").unwrap();
        let artifact = generate(&reference, None, DEFAULT_MAINTAINER).unwrap();
        assert_eq!(artifact.base_image(), "almalinux:9");
        assert_eq!(artifact.maintainer(), "DawnMagnet");
    }
}
