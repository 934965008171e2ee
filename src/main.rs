use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use url::Url;

use cn_image::dockerfile::{self, DEFAULT_MAINTAINER};
use cn_image::{CnImageError, ImageReference, output, registry};

#[derive(Parser, Debug)]
#[command(name = "cn-image")]
#[command(version, about = "Generate a mirror-rewriting Dockerfile for a RHEL-family base image")]
struct Cli {
    /// Base image and tag, e.g. rockylinux:8 or almalinux:9
    #[arg(required_unless_present = "list")]
    image: Option<String>,

    /// Output Dockerfile path (default: ./<distro>-<version>.Dockerfile)
    #[arg(long, conflicts_with = "stdout")]
    out: Option<PathBuf>,

    /// Mirror base URL to use instead of the built-in one
    #[arg(long, env = "CN_IMAGE_MIRROR")]
    mirror: Option<String>,

    /// Value of the maintainer label
    #[arg(long, env = "CN_IMAGE_MAINTAINER", default_value = DEFAULT_MAINTAINER)]
    maintainer: String,

    /// Print to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// List supported distros and exit
    #[arg(long, conflicts_with = "image")]
    list: bool,

    /// With --list, print the full registry as JSON
    #[arg(long, conflicts_with = "image")]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG wins when set
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Logs go to stderr so `--stdout` output stays a clean Dockerfile.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The override is used verbatim either way; odd values only get a warning.
fn check_mirror(mirror: &str) {
    match Url::parse(mirror) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => warn!(mirror, scheme = url.scheme(), "mirror override is not http(s)"),
        Err(err) => warn!(mirror, %err, "mirror override is not an absolute URL"),
    }
}

/// Write `text` to `out`; a reader that went away (`| head`) is not an error.
fn write_text<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn emit(text: &str) -> Result<(), CnImageError> {
    write_text(&mut io::stdout().lock(), text).map_err(|source| CnImageError::Write {
        path: Path::new("<stdout>").to_path_buf(),
        source,
    })
}

fn print_registry(json: bool) -> Result<()> {
    let mut text = if json {
        serde_json::to_string_pretty(registry::all()).context("serialize distro registry")?
    } else {
        registry::supported_keys().join("\n")
    };
    text.push('\n');
    emit(&text)?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CnImageError> {
    let Some(image) = cli.image.as_deref() else {
        return Ok(());
    };
    let reference = ImageReference::parse(image)?;

    let mirror = cli.mirror.as_deref().filter(|m| !m.trim().is_empty());
    if let Some(mirror) = mirror {
        check_mirror(mirror);
    }

    let artifact = dockerfile::generate(&reference, mirror, &cli.maintainer)?;

    if cli.stdout {
        return emit(&artifact.to_string());
    }

    let path = cli
        .out
        .unwrap_or_else(|| output::default_output_path(&reference));
    output::write_artifact(&path, &artifact).await?;
    emit(&format!("{}\n", path.display()))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list {
        print_registry(cli.json)?;
        return Ok(ExitCode::SUCCESS);
    }

    match run(cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("Error: {err}");
            Ok(ExitCode::from(err.exit_code()))
        }
    }
}
