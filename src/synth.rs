//! Call-Node Synthesizer
//!
//! Builds `hook(line, column, name);` statements in the program's arena.

use oxc_allocator::Box as ArenaBox;
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_span::SPAN;
use oxc_syntax::number::NumberBase;

use crate::position::SourcePosition;

#[derive(Clone, Copy)]
pub struct HookCallBuilder<'a> {
    ast: AstBuilder<'a>,
}

impl<'a> HookCallBuilder<'a> {
    pub fn new(ast: AstBuilder<'a>) -> Self {
        Self { ast }
    }

    /// `hook(line|null, column|null, "name"|null);` with the column shifted to 1-based.
    pub fn call_statement(
        &self,
        hook: &str,
        position: Option<SourcePosition>,
        function_name: Option<&str>,
    ) -> Statement<'a> {
        let line = position.map(|p| p.line);
        let column = position.map(|p| p.column + 1);

        let mut args = self.ast.vec();
        args.push(Argument::from(self.number_or_null(line)));
        args.push(Argument::from(self.number_or_null(column)));
        args.push(Argument::from(self.string_or_null(function_name)));

        let callee = self
            .ast
            .expression_identifier(SPAN, self.ast.allocator.alloc_str(hook));
        let call = self.ast.expression_call(
            SPAN,
            callee,
            None::<ArenaBox<TSTypeParameterInstantiation>>,
            args,
            false,
        );
        self.ast.statement_expression(SPAN, call)
    }

    fn number_or_null(&self, value: Option<u32>) -> Expression<'a> {
        match value {
            Some(n) => {
                self.ast
                    .expression_numeric_literal(SPAN, f64::from(n), None, NumberBase::Decimal)
            }
            None => self.ast.expression_null_literal(SPAN),
        }
    }

    fn string_or_null(&self, value: Option<&str>) -> Expression<'a> {
        match value {
            Some(s) => {
                let atom = self.ast.allocator.alloc_str(s);
                self.ast.expression_string_literal(SPAN, atom, None)
            }
            None => self.ast.expression_null_literal(SPAN),
        }
    }
}
