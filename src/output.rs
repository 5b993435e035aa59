//! `key=value` output lines for CI step outputs.
use anyhow::{anyhow, Context, Result};
use std::io::{self, Write};

/// Ordered step outputs, written one `key=value` pair per line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Outputs {
    entries: Vec<(String, String)>,
}

impl Outputs {
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Write all entries. Values must be single-line.
    pub fn write_to(&self, out: &mut impl Write) -> Result<()> {
        for (key, value) in &self.entries {
            if value.contains('\n') {
                return Err(anyhow!("output {key} contains a newline"));
            }
            writeln!(out, "{key}={value}").with_context(|| format!("write output {key}"))?;
        }
        Ok(())
    }

    pub fn print(&self) -> Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_to(&mut lock)?;
        lock.flush().context("flush stdout")
    }
}
