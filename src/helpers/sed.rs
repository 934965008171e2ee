/// Builder for an in-place `sed` invocation made of `s|..|..|g` expressions.
#[derive(Debug, Clone, Default)]
pub struct SedCommand {
    expressions: Vec<String>,
}

impl SedCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `s|pattern|replacement|g`.
    ///
    /// `pattern` is a basic regex and goes in untouched. `replacement` is
    /// literal text and gets escaped.
    pub fn substitute(mut self, pattern: &str, replacement: &str) -> Self {
        self.expressions.push(format!(
            "s|{pattern}|{}|g",
            escape_replacement(replacement)
        ));
        self
    }

    /// Render `sed -e .. -i.bak <files>`.
    pub fn in_place<S: AsRef<str>>(&self, files: &[S]) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.expressions.len() + files.len() + 1);
        parts.push("sed".to_string());
        for expr in &self.expressions {
            parts.push(format!("-e {}", single_quote(expr)));
        }
        parts.push("-i.bak".to_string());
        parts.extend(files.iter().map(|f| f.as_ref().to_string()));
        parts.join(" ")
    }
}

/// Escape the characters sed treats specially on the replacement side.
pub fn escape_replacement(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '&' | '|') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Wrap `text` in single quotes for a POSIX shell.
pub fn single_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}
