use std::fmt;

/// Continuation marker placed between shell fragments of the `RUN` block.
pub const CONTINUATION: &str = " && \\\n    ";

/// A rendered Dockerfile: one `FROM`, one maintainer `LABEL`, one `RUN`.
///
/// Built fresh on every call and owned by the caller; the text form is the
/// only identity it has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    base_image: String,
    maintainer: String,
    fragments: Vec<String>,
}

impl RenderedArtifact {
    pub fn new(base_image: String, maintainer: String, fragments: Vec<String>) -> Self {
        Self {
            base_image,
            maintainer,
            fragments,
        }
    }

    /// Image reference used in the `FROM` line.
    pub fn base_image(&self) -> &str {
        &self.base_image
    }

    pub fn maintainer(&self) -> &str {
        &self.maintainer
    }

    /// Ordered shell fragments making up the `RUN` block.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// The `RUN` instruction with every fragment chained by `&&`.
    pub fn run_block(&self) -> String {
        format!("RUN {}", self.fragments.join(CONTINUATION))
    }
}

impl fmt::Display for RenderedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FROM {}", self.base_image)?;
        writeln!(
            f,
            "LABEL maintainer=\"{}\"",
            self.maintainer.replace('\\', r"\\").replace('"', "\\\"")
        )?;
        writeln!(f, "{}", self.run_block())
    }
}
