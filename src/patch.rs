//! Body Transformer
//!
//! Rewrites every located function so its body becomes
//!
//! ```js
//! try {
//!     entry(line, column, name);
//!     /* original statements */
//! } finally {
//!     exit(line, column, name);
//! }
//! ```
//!
//! Arrow functions with an expression body are first turned into
//! `{ return <expr>; }`. Directive prologues stay above the `try`.

use oxc_allocator::{Allocator, Box as ArenaBox};
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_ast_visit::{walk_mut, VisitMut};
use oxc_span::{Span, SPAN};
use oxc_syntax::scope::ScopeFlags;

use crate::config::HookNames;
use crate::locate::{FunctionHandle, FunctionSite};
use crate::synth::HookCallBuilder;

/// Patches `program` in place and returns the number of functions rewritten.
pub fn patch_functions<'a>(
    allocator: &'a Allocator,
    program: &mut Program<'a>,
    sites: &[FunctionSite],
    hooks: &HookNames,
) -> usize {
    let mut transformer = BodyTransformer::new(allocator, sites, hooks);
    transformer.visit_program(program);
    transformer.patched
}

pub struct BodyTransformer<'a, 'h> {
    ast: AstBuilder<'a>,
    calls: HookCallBuilder<'a>,
    hooks: &'h HookNames,
    sites: &'h [FunctionSite],
    next_site: usize,
    ordinal: usize,
    patched: usize,
}

impl<'a, 'h> BodyTransformer<'a, 'h> {
    pub fn new(allocator: &'a Allocator, sites: &'h [FunctionSite], hooks: &'h HookNames) -> Self {
        let ast = AstBuilder::new(allocator);
        Self {
            ast,
            calls: HookCallBuilder::new(ast),
            hooks,
            sites,
            next_site: 0,
            ordinal: 0,
            patched: 0,
        }
    }

    /// Advances the traversal ordinal and returns the site located for it, if any.
    fn claim(&mut self, span: Span) -> Option<&'h FunctionSite> {
        let sites: &'h [FunctionSite] = self.sites;
        let handle = FunctionHandle(self.ordinal);
        self.ordinal += 1;

        let site = sites.get(self.next_site).filter(|s| s.handle == handle)?;
        self.next_site += 1;
        if site.span() != span {
            tracing::warn!(
                handle = handle.0,
                expected = ?site.span(),
                found = ?span,
                "located function does not match traversal, left untouched"
            );
            return None;
        }
        Some(site)
    }

    /// `x => expr` becomes `x => { return expr; }`.
    fn normalize_arrow(&self, arrow: &mut ArrowFunctionExpression<'a>) {
        if !arrow.expression {
            return;
        }
        let statements = std::mem::replace(&mut arrow.body.statements, self.ast.vec());
        for stmt in statements {
            let stmt = match stmt {
                Statement::ExpressionStatement(expr_stmt) => {
                    let expression = expr_stmt.unbox().expression;
                    self.ast.statement_return(SPAN, Some(expression))
                }
                other => other,
            };
            arrow.body.statements.push(stmt);
        }
        arrow.expression = false;
    }

    fn wrap_body(&mut self, body: &mut FunctionBody<'a>, site: &FunctionSite) {
        let name = site.name.as_deref();
        let entry = self
            .calls
            .call_statement(&self.hooks.entry, site.position, name);
        let exit = self
            .calls
            .call_statement(&self.hooks.exit, site.position, name);

        let original = std::mem::replace(&mut body.statements, self.ast.vec());
        let protected = self
            .ast
            .vec_from_iter(std::iter::once(entry).chain(original));

        let guard = self.ast.statement_try(
            SPAN,
            self.ast.alloc_block_statement(SPAN, protected),
            None::<ArenaBox<'a, CatchClause<'a>>>,
            Some(self.ast.alloc_block_statement(SPAN, self.ast.vec1(exit))),
        );
        body.statements.push(guard);

        self.patched += 1;
        tracing::debug!(
            function = name.unwrap_or("<anonymous>"),
            line = site.position.map(|p| p.line),
            "instrumented function"
        );
    }
}

impl<'a, 'h> VisitMut<'a> for BodyTransformer<'a, 'h> {
    fn visit_function(&mut self, func: &mut Function<'a>, flags: ScopeFlags) {
        if let Some(site) = self.claim(func.span) {
            if let Some(body) = func.body.as_mut() {
                self.wrap_body(body, site);
            }
        }
        walk_mut::walk_function(self, func, flags);
    }

    fn visit_arrow_function_expression(&mut self, arrow: &mut ArrowFunctionExpression<'a>) {
        if let Some(site) = self.claim(arrow.span) {
            self.normalize_arrow(arrow);
            self.wrap_body(&mut arrow.body, site);
        }
        walk_mut::walk_arrow_function_expression(self, arrow);
    }
}
