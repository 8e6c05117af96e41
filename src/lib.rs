//! # jstrace
//!
//! Instruments a JavaScript source so every function reports entry and exit
//! to two tracer hooks, allowing a call trace to be rebuilt afterwards.
//!
//! ## Rewrite Invariants
//!
//! 1. **Coverage**: every function declaration, function expression (methods,
//!    getters, setters included) and arrow function with a body is rewritten,
//!    nested ones included.
//!
//! 2. **Shape**: a rewritten body is `try { entry(...); <original> } finally { exit(...); }`.
//!    No `catch` is added, so thrown errors and return values pass through untouched.
//!
//! 3. **Arguments**: both hooks receive `(line, column, name)`. Line is 1-based, column is
//!    1-based in UTF-16 units, name is the declared identifier. Unknown values are `null`;
//!    arrows and anonymous functions always pass `null` as name.
//!
//! 4. **Arrows**: expression-bodied arrows become `{ return <expr>; }` before wrapping.
//!
//! 5. **Order**: functions are located and patched in pre-order, outer before inner.
//!
//! The hooks themselves are not provided; the instrumented program expects its
//! runtime to define them.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod config;
mod driver;
mod error;
mod locate;
mod patch;
mod position;
mod synth;

#[cfg(test)]
mod instrument_tests;

pub use config::{HookNames, InstrumentOptions, SourceKind, DEFAULT_ENTRY_HOOK, DEFAULT_EXIT_HOOK};
pub use driver::{instrument_source, print_program, transform_file, InstrumentReport, Instrumented};
pub use error::TraceError;
pub use locate::{
    locate_functions, parse_program, FunctionHandle, FunctionKind, FunctionSite, ParsedProgram,
};
pub use patch::{patch_functions, BodyTransformer};
pub use position::{LineIndex, SourcePosition};
pub use synth::HookCallBuilder;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the stderr log subscriber. `RUST_LOG` overrides the default `jstrace=info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("jstrace=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Instruments `source` from Node. `options_json` follows the `InstrumentOptions` JSON shape.
#[cfg(feature = "napi")]
#[napi]
pub fn instrument_native(source: String, options_json: Option<String>) -> napi::Result<String> {
    let options = match options_json {
        Some(json) => serde_json::from_str::<InstrumentOptions>(&json)
            .map_err(|e| napi::Error::from_reason(e.to_string()))?,
        None => InstrumentOptions::default(),
    };
    instrument_source(&source, &options)
        .map(|out| out.code)
        .map_err(|e| napi::Error::from_reason(e.to_string()))
}
