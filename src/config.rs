//! Instrumentation options.
//!
//! Options come from defaults, an optional JSON file, and command line
//! overrides, in that order.

use lazy_static::lazy_static;
use oxc_span::SourceType;
use oxc_syntax::identifier::is_identifier_name;
use oxc_syntax::keyword::is_reserved_keyword;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::TraceError;

pub const DEFAULT_ENTRY_HOOK: &str = "_jstrace_fn_entry_";
pub const DEFAULT_EXIT_HOOK: &str = "_jstrace_fn_exit_";

// ═══════════════════════════════════════════════════════════════════════════════
// HOOK NAMES
// ═══════════════════════════════════════════════════════════════════════════════

/// The two free identifiers injected into every instrumented function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct HookNames {
    pub entry: String,
    pub exit: String,
}

impl Default for HookNames {
    fn default() -> Self {
        HookNames {
            entry: DEFAULT_ENTRY_HOOK.to_string(),
            exit: DEFAULT_EXIT_HOOK.to_string(),
        }
    }
}

lazy_static! {
    /// Words that parse as something other than a plain callee in some
    /// function context (literals, `this`, generator/async operators,
    /// strict-mode reservations).
    static ref NON_CALLABLE_WORDS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        for word in [
            "this", "null", "true", "false", "await", "yield", "let", "static",
            "implements", "interface", "package", "private", "protected", "public",
            "arguments", "eval",
        ] {
            s.insert(word);
        }
        s
    };
}

/// A hook must be a callable free identifier in any function body.
fn is_hook_identifier(name: &str) -> bool {
    is_identifier_name(name)
        && !is_reserved_keyword(name)
        && !NON_CALLABLE_WORDS.contains(name)
}

impl HookNames {
    pub fn new(entry: impl Into<String>, exit: impl Into<String>) -> Self {
        HookNames {
            entry: entry.into(),
            exit: exit.into(),
        }
    }

    pub fn validate(&self) -> Result<(), TraceError> {
        for name in [&self.entry, &self.exit] {
            if !is_hook_identifier(name) {
                return Err(TraceError::InvalidHookName { name: name.clone() });
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Script,
    Module,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct InstrumentOptions {
    pub hooks: HookNames,
    pub source_kind: SourceKind,
    pub jsx: bool,
}

impl InstrumentOptions {
    pub fn from_json_file(path: &Path) -> Result<Self, TraceError> {
        let data = fs::read_to_string(path).map_err(|e| TraceError::io(path, e))?;
        serde_json::from_str(&data).map_err(|source| TraceError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn source_type(&self) -> SourceType {
        SourceType::default()
            .with_module(self.source_kind == SourceKind::Module)
            .with_jsx(self.jsx)
    }
}
