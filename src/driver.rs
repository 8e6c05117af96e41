//! Driver
//!
//! source text -> parse + locate -> patch -> print.

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_codegen::Codegen;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::InstrumentOptions;
use crate::error::TraceError;
use crate::locate::{parse_program, FunctionSite, ParsedProgram};
use crate::patch::patch_functions;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentReport {
    pub functions: Vec<FunctionSite>,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Instrumented {
    pub code: String,
    pub report: InstrumentReport,
}

pub fn print_program(program: &Program<'_>) -> String {
    Codegen::new().build(program).code
}

pub fn instrument_source(
    source: &str,
    options: &InstrumentOptions,
) -> Result<Instrumented, TraceError> {
    options.hooks.validate()?;

    let allocator = Allocator::default();
    let ParsedProgram {
        mut program,
        functions,
        diagnostics,
    } = parse_program(&allocator, source, options)?;

    let patched = patch_functions(&allocator, &mut program, &functions, &options.hooks);
    let code = print_program(&program);
    tracing::info!(
        functions = patched,
        diagnostics = diagnostics.len(),
        "instrumented program"
    );

    Ok(Instrumented {
        code,
        report: InstrumentReport {
            functions,
            diagnostics,
        },
    })
}

/// Reads `input`, instruments it and writes the result to `output`.
///
/// Nothing is written when reading or parsing fails. A failed write may
/// leave a partial file behind.
pub fn transform_file(
    input: &Path,
    output: &Path,
    options: &InstrumentOptions,
) -> Result<InstrumentReport, TraceError> {
    tracing::info!("transform({}, {})", input.display(), output.display());
    let source = fs::read_to_string(input).map_err(|e| TraceError::io(input, e))?;
    let instrumented = instrument_source(&source, options)?;
    fs::write(output, instrumented.code).map_err(|e| TraceError::io(output, e))?;
    Ok(instrumented.report)
}
