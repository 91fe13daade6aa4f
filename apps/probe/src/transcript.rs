use std::io::{self, Write};

pub const OK: &str = "✓";
pub const FAIL: &str = "✗";

/// Append-only log of what the probe did, shown to the user at the end.
#[derive(Debug, Default)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn section(&mut self, title: &str) {
        self.line(format!("--- {title} ---"));
    }

    pub fn ok(&mut self, text: impl AsRef<str>) {
        self.line(format!("{OK} {}", text.as_ref()));
    }

    pub fn fail(&mut self, text: impl AsRef<str>) {
        self.line(format!("{FAIL} {}", text.as_ref()));
    }

    /// Indented detail line under the previous entry.
    pub fn detail(&mut self, text: impl AsRef<str>) {
        self.line(format!("  {}", text.as_ref()));
    }

    #[cfg(test)]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Write out everything appended so far and forget it.
    pub fn flush_to<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for l in self.lines.drain(..) {
            writeln!(out, "{l}")?;
        }
        out.flush()
    }
}
