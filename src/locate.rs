//! Function Locator
//!
//! Parses a source text with oxc and collects every function-like node
//! (declarations, expressions, arrows) in pre-order, nested functions
//! included. Each located node is addressed by its ordinal in that
//! traversal; the Body Transformer walks the same tree in the same order
//! and uses the ordinal to find it again in the arena.

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::{Span, SPAN};
use oxc_syntax::scope::ScopeFlags;
use serde::{Deserialize, Serialize};

use crate::config::InstrumentOptions;
use crate::error::TraceError;
use crate::position::{LineIndex, SourcePosition};

// ═══════════════════════════════════════════════════════════════════════════════
// LOCATED FUNCTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Pre-order ordinal of a function-like node within one parsed program.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionHandle(pub usize);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Declaration,
    Expression,
    Arrow,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSite {
    pub handle: FunctionHandle,
    pub kind: FunctionKind,
    /// Declared name; always absent for arrows and anonymous expressions.
    pub name: Option<String>,
    pub start: u32,
    pub end: u32,
    pub position: Option<SourcePosition>,
}

impl FunctionSite {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

pub struct ParsedProgram<'a> {
    pub program: Program<'a>,
    pub functions: Vec<FunctionSite>,
    /// Syntax problems the parser recovered from.
    pub diagnostics: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSE + COLLECT
// ═══════════════════════════════════════════════════════════════════════════════

pub fn parse_program<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    options: &InstrumentOptions,
) -> Result<ParsedProgram<'a>, TraceError> {
    let ret = Parser::new(allocator, source, options.source_type()).parse();
    if ret.panicked {
        return Err(TraceError::parse(&ret.errors));
    }

    let diagnostics: Vec<String> = ret.errors.iter().map(|e| e.to_string()).collect();
    for diagnostic in &diagnostics {
        tracing::warn!("tolerated syntax issue: {}", diagnostic);
    }

    let program = ret.program;
    let functions = locate_functions(&program, source);
    Ok(ParsedProgram {
        program,
        functions,
        diagnostics,
    })
}

/// Collects the function-like nodes of an already parsed program.
pub fn locate_functions(program: &Program<'_>, source: &str) -> Vec<FunctionSite> {
    let mut collector = FunctionCollector::new(source);
    collector.visit_program(program);
    collector.sites
}

struct FunctionCollector<'s> {
    lines: LineIndex<'s>,
    ordinal: usize,
    sites: Vec<FunctionSite>,
}

impl<'s> FunctionCollector<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            lines: LineIndex::new(source),
            ordinal: 0,
            sites: Vec::new(),
        }
    }

    fn record(&mut self, kind: FunctionKind, name: Option<String>, span: Span, has_body: bool) {
        let handle = FunctionHandle(self.ordinal);
        self.ordinal += 1;
        if !has_body {
            return;
        }
        let position = if span == SPAN {
            None
        } else {
            self.lines.locate(span.start)
        };
        self.sites.push(FunctionSite {
            handle,
            kind,
            name,
            start: span.start,
            end: span.end,
            position,
        });
    }
}

impl<'a, 's> Visit<'a> for FunctionCollector<'s> {
    fn visit_function(&mut self, func: &Function<'a>, flags: ScopeFlags) {
        let kind = match func.r#type {
            FunctionType::FunctionDeclaration | FunctionType::TSDeclareFunction => {
                FunctionKind::Declaration
            }
            FunctionType::FunctionExpression | FunctionType::TSEmptyBodyFunctionExpression => {
                FunctionKind::Expression
            }
        };
        let name = func.id.as_ref().map(|id| id.name.to_string());
        self.record(kind, name, func.span, func.body.is_some());
        walk::walk_function(self, func, flags);
    }

    fn visit_arrow_function_expression(&mut self, arrow: &ArrowFunctionExpression<'a>) {
        self.record(FunctionKind::Arrow, None, arrow.span, true);
        walk::walk_arrow_function_expression(self, arrow);
    }
}
