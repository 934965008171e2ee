//! Generate Dockerfiles that repoint RHEL-family `yum`/`dnf` repositories at
//! regional mirrors.
//!
//! Generation is pure text assembly: look up a [`registry::DistroConfig`],
//! hand it to [`dockerfile::render`] and get a [`dockerfile::RenderedArtifact`]
//! back. Only [`output`] touches the filesystem.

pub mod dockerfile;
pub mod error;
pub mod helpers;
pub mod output;
pub mod reference;
pub mod registry;

pub use dockerfile::{RenderedArtifact, generate, render};
pub use error::{CnImageError, Result};
pub use reference::ImageReference;
