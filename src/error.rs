use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the instrumentation pipeline.
///
/// Tolerated syntax problems are not errors; they travel as diagnostics in
/// the report instead.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Parse failure: {message}")]
    Parse { message: String },

    #[error("I/O failure on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid hook name '{name}': expected a JavaScript identifier")]
    InvalidHookName { name: String },

    #[error("Invalid options file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl TraceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a parse failure from the parser's diagnostics.
    pub fn parse<I, S>(diagnostics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let messages: Vec<String> = diagnostics.into_iter().map(|d| d.to_string()).collect();
        let message = if messages.is_empty() {
            "parser could not produce a program".to_string()
        } else {
            messages.join("; ")
        };
        Self::Parse { message }
    }
}
