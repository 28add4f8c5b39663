//! Fatal errors and accumulated configuration diagnostics.
//!
//! Non-fatal findings never abort a run: they accumulate here and are
//! surfaced after the full resolution pass, so one bad schema does not stop
//! the rest of the graph from being diagnosed.

use colored::Colorize;
use thiserror::Error;

// ————————————————————————————————————————————————————————————————————————————
// FATAL ERRORS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown schema `{name}` referenced by `{referenced_by}`")]
    UnknownSchema { name: String, referenced_by: String },

    #[error("schema `{name}` is defined more than once across the merged documents")]
    DuplicateSchema { name: String },

    #[error("{file}: at JSON path {path} → {message}")]
    Parse {
        file: String,
        path: String,
        message: String,
    },

    #[error("{file}: JSON pointer `{pointer}` selects nothing")]
    Pointer { file: String, pointer: String },

    #[error("failed to read `{path}`")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    Pattern { message: String },
}

// ————————————————————————————————————————————————————————————————————————————
// DIAGNOSTICS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// An inline container whose access chain cannot be synthesized. The
    /// affected properties are skipped, never emitted with a broken path.
    #[error("cannot inline members of `{container}` on `{schema}`: {reason}")]
    UnresolvedInlinePath {
        schema: String,
        container: String,
        reason: String,
    },

    /// Two distinct classes registered under one value in one dispatch
    /// table. The first registration is kept.
    #[error("duplicate discriminator value \"{value}\" on `{root}`: kept `{kept}`, dropped `{dropped}`")]
    DuplicateDiscriminatorValue {
        root: String,
        value: String,
        kept: String,
        dropped: String,
    },

    /// A later flattening pass produced a property name an earlier pass
    /// already registered. First registration wins at the storage layer.
    #[error("property `{name}` on `{schema}` shadows an earlier registration")]
    NameCollision { schema: String, name: String },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::DuplicateDiscriminatorValue { .. } => Severity::Error,
            Diagnostic::UnresolvedInlinePath { .. } | Diagnostic::NameCollision { .. } => {
                Severity::Warning
            }
        }
    }
}

/// Sink for configuration findings, in report order.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity() == Severity::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Severity-colored one-line rendering for stderr.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let tag = match entry.severity() {
                Severity::Warning => "warning".yellow().bold(),
                Severity::Error => "error".red().bold(),
            };
            out.push_str(&format!("{tag}: {entry}\n"));
        }
        out
    }
}
