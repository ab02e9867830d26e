use regex::Regex;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, instrument};

use crate::facts::FactRecord;
use crate::output::{console::format_line, errors::OutputError};

static FACT_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\s(.*?)(?: \((?:Source|Score): .*\))?$").unwrap()
});

/// A numbered, plain-text list of facts on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactFile {
    path: PathBuf,
}

impl FactFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append facts, continuing the numbering already in the file.
    ///
    /// Facts whose text is already listed are skipped. Returns how many lines
    /// were written.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn append(&self, facts: &[FactRecord]) -> Result<usize, OutputError> {
        let existing = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(OutputError::io(&self.path, e)),
        };

        let mut next_number = existing.lines().count() + 1;
        let mut seen: HashSet<String> = existing.lines().filter_map(fact_text).collect();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| OutputError::io(&self.path, e))?;
        let mut writer = BufWriter::new(file);

        let mut written = 0;
        for fact in facts {
            if !seen.insert(fact.text.clone()) {
                debug!("Skipping duplicate fact: {}", fact.text);
                continue;
            }

            writeln!(writer, "{}", format_line(next_number, fact))
                .map_err(|e| OutputError::io(&self.path, e))?;
            next_number += 1;
            written += 1;
        }
        writer
            .flush()
            .map_err(|e| OutputError::io(&self.path, e))?;

        info!("Saved {} facts to {}", written, self.path.display());
        Ok(written)
    }

    /// Write facts to a fresh file, numbered from 1. Truncates an existing file.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn write_new(&self, facts: &[FactRecord]) -> Result<usize, OutputError> {
        let file = File::create(&self.path).map_err(|e| OutputError::io(&self.path, e))?;
        let mut writer = BufWriter::new(file);

        for (i, fact) in facts.iter().enumerate() {
            writeln!(writer, "{}", format_line(i + 1, fact))
                .map_err(|e| OutputError::io(&self.path, e))?;
        }
        writer
            .flush()
            .map_err(|e| OutputError::io(&self.path, e))?;

        info!("Facts saved to {}", self.path.display());
        Ok(facts.len())
    }
}

/// First of `name`, `stem_1.ext`, `stem_2.ext`, ... that does not exist in `dir`.
pub fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let base = Path::new(name);
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let ext = base.extension().map(|e| e.to_string_lossy().into_owned());

    (1..)
        .map(|n| match &ext {
            Some(ext) => dir.join(format!("{}_{}.{}", stem, n, ext)),
            None => dir.join(format!("{}_{}", stem, n)),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

fn fact_text(line: &str) -> Option<String> {
    FACT_LINE_REGEX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
