//! End-to-end instrumentation tests.
//!
//! Instrumented output is parsed again and every function body is checked
//! for the `try { entry; ... } finally { exit; }` shape.

#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;
    use oxc_ast::ast::*;
    use oxc_ast_visit::{walk, Visit};
    use oxc_parser::Parser;
    use oxc_syntax::scope::ScopeFlags;

    use crate::config::{HookNames, InstrumentOptions, SourceKind};
    use crate::driver::instrument_source;
    use crate::locate::FunctionKind;

    type HookCall = (String, Vec<String>);

    fn hook_call(stmt: &Statement<'_>) -> Option<HookCall> {
        let Statement::ExpressionStatement(expr_stmt) = stmt else {
            return None;
        };
        let Expression::CallExpression(call) = &expr_stmt.expression else {
            return None;
        };
        let Expression::Identifier(callee) = &call.callee else {
            return None;
        };
        let args = call
            .arguments
            .iter()
            .map(|arg| match arg {
                Argument::NumericLiteral(n) => n.value.to_string(),
                Argument::NullLiteral(_) => "null".to_string(),
                Argument::StringLiteral(s) => format!("{:?}", s.value.as_str()),
                _ => "?".to_string(),
            })
            .collect();
        Some((callee.name.to_string(), args))
    }

    /// Collects the hook arguments of every instrumented body and records any body
    /// that does not have the expected shape.
    struct ShapeChecker<'h> {
        hooks: &'h HookNames,
        calls: Vec<Vec<String>>,
        violations: Vec<String>,
        expression_arrows: usize,
    }

    impl<'h> ShapeChecker<'h> {
        fn check(&mut self, body: &FunctionBody<'_>) {
            if body.statements.len() != 1 {
                self.violations
                    .push(format!("{} statements in body", body.statements.len()));
                return;
            }
            let Some(Statement::TryStatement(guard)) = body.statements.first() else {
                self.violations.push("body is not a try statement".to_string());
                return;
            };
            if guard.handler.is_some() {
                self.violations.push("catch clause present".to_string());
            }
            let entry = guard.block.body.first().and_then(hook_call);
            let exit = match &guard.finalizer {
                Some(fin) if fin.body.len() == 1 => fin.body.first().and_then(hook_call),
                _ => None,
            };
            match (entry, exit) {
                (Some((entry_name, entry_args)), Some((exit_name, exit_args))) => {
                    if entry_name != self.hooks.entry || exit_name != self.hooks.exit {
                        self.violations
                            .push(format!("unexpected hooks {} / {}", entry_name, exit_name));
                    }
                    if entry_args != exit_args || entry_args.len() != 3 {
                        self.violations.push(format!(
                            "mismatched arguments {:?} / {:?}",
                            entry_args, exit_args
                        ));
                    }
                    self.calls.push(entry_args);
                }
                _ => self.violations.push("missing hook call".to_string()),
            }
        }
    }

    impl<'a, 'h> Visit<'a> for ShapeChecker<'h> {
        fn visit_function(&mut self, func: &Function<'a>, flags: ScopeFlags) {
            if let Some(body) = &func.body {
                self.check(body);
            }
            walk::walk_function(self, func, flags);
        }

        fn visit_arrow_function_expression(&mut self, arrow: &ArrowFunctionExpression<'a>) {
            if arrow.expression {
                self.expression_arrows += 1;
            }
            self.check(&arrow.body);
            walk::walk_arrow_function_expression(self, arrow);
        }
    }

    struct Checked {
        code: String,
        calls: Vec<Vec<String>>,
        kinds: Vec<FunctionKind>,
    }

    fn instrument_and_check(source: &str, options: &InstrumentOptions) -> Checked {
        let out = instrument_source(source, options).unwrap();

        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, &out.code, options.source_type()).parse();
        assert!(ret.errors.is_empty(), "output does not parse: {}", out.code);

        let mut checker = ShapeChecker {
            hooks: &options.hooks,
            calls: Vec::new(),
            violations: Vec::new(),
            expression_arrows: 0,
        };
        checker.visit_program(&ret.program);
        assert!(
            checker.violations.is_empty(),
            "{:?}\n{}",
            checker.violations,
            out.code
        );
        assert_eq!(checker.expression_arrows, 0, "{}", out.code);
        assert_eq!(checker.calls.len(), out.report.functions.len());

        Checked {
            code: out.code,
            calls: checker.calls,
            kinds: out.report.functions.iter().map(|f| f.kind).collect(),
        }
    }

    fn args(line: &str, column: &str, name: &str) -> Vec<String> {
        vec![line.to_string(), column.to_string(), name.to_string()]
    }

    #[test]
    fn test_named_declaration() {
        let checked = instrument_and_check(
            "function add(a,b){return a+b;}",
            &InstrumentOptions::default(),
        );
        assert_eq!(checked.calls, vec![args("1", "1", "\"add\"")]);
        assert_eq!(checked.kinds, vec![FunctionKind::Declaration]);
    }

    #[test]
    fn test_expression_arrow_normalized() {
        let checked =
            instrument_and_check("const f = (x) => x*2;", &InstrumentOptions::default());
        assert_eq!(checked.calls, vec![args("1", "11", "null")]);
        assert!(checked.code.contains("return x * 2"));
    }

    #[test]
    fn test_throwing_function_keeps_throw_inside_guard() {
        let checked = instrument_and_check(
            "function g(){ throw new Error(\"x\"); }",
            &InstrumentOptions::default(),
        );
        assert_eq!(checked.calls, vec![args("1", "1", "\"g\"")]);
        assert!(!checked.code.contains("catch"));
    }

    #[test]
    fn test_every_exit_path_is_guarded() {
        let source = r#"
function pick(a) {
    if (a > 1) {
        return "big";
    } else if (a < 0) {
        throw new RangeError("negative");
    }
    try {
        return risky(a);
    } catch (e) {
        return null;
    } finally {
        cleanup();
    }
}
async function load(url) {
    const res = await fetch(url);
    return res.json();
}
function* counter() {
    yield 1;
    yield 2;
}
class Child extends Base {
    constructor() {
        super();
    }
    get size() {
        return 1;
    }
    static make() {
        return new Child();
    }
}
const handlers = { onClick() {}, onKey: async (e) => e.key };
"#;
        let checked = instrument_and_check(source, &InstrumentOptions::default());
        assert_eq!(checked.calls.len(), 8);
        assert_eq!(checked.calls[0], args("2", "1", "\"pick\""));
        assert_eq!(checked.calls[1], args("16", "1", "\"load\""));
        assert_eq!(checked.calls[2], args("20", "1", "\"counter\""));
        // the original catch clause is preserved inside the guard
        assert_eq!(checked.code.matches("catch").count(), 1);
    }

    #[test]
    fn test_name_resolution() {
        let source = "const a = function named() {}; const b = function () {}; const c = () => {};";
        let checked = instrument_and_check(source, &InstrumentOptions::default());
        let names: Vec<&str> = checked.calls.iter().map(|c| c[2].as_str()).collect();
        assert_eq!(names, vec!["\"named\"", "null", "null"]);
    }

    #[test]
    fn test_outer_before_inner() {
        let source = "function outer() {\n    function inner() {}\n}\nfunction last() {}";
        let checked = instrument_and_check(source, &InstrumentOptions::default());
        let names: Vec<&str> = checked.calls.iter().map(|c| c[2].as_str()).collect();
        assert_eq!(names, vec!["\"outer\"", "\"inner\"", "\"last\""]);
        assert_eq!(checked.calls[1], args("2", "5", "\"inner\""));
    }

    #[test]
    fn test_repeated_runs_agree() {
        let source = "x(function () { return [1].map((v) => v + 1); }); function y() {}";
        let options = InstrumentOptions::default();
        let first = instrument_source(source, &options).unwrap();
        let second = instrument_source(source, &options).unwrap();
        assert_eq!(first.code, second.code);
        assert_eq!(first.report.functions, second.report.functions);
    }

    #[test]
    fn test_custom_hook_names() {
        let options = InstrumentOptions {
            hooks: HookNames::new("__enter", "__leave"),
            ..Default::default()
        };
        let checked = instrument_and_check("function f() {}", &options);
        assert!(checked.code.contains("__enter(1, 1, \"f\")"));
        assert!(!checked.code.contains("_jstrace_fn_entry_"));
    }

    #[test]
    fn test_module_source() {
        let options = InstrumentOptions {
            source_kind: SourceKind::Module,
            ..Default::default()
        };
        let source = "import { x } from \"./x.js\";\nexport default function () { return x; }\nexport const twice = (n) => n * 2;";
        let checked = instrument_and_check(source, &options);
        assert_eq!(checked.calls.len(), 2);
        assert_eq!(checked.calls[0][2], "null");
    }

    #[test]
    fn test_jsx_source() {
        let options = InstrumentOptions {
            jsx: true,
            ..Default::default()
        };
        let checked = instrument_and_check("const View = () => <div>hi</div>;", &options);
        assert_eq!(checked.kinds, vec![FunctionKind::Arrow]);
        assert!(checked.code.contains("return <div>"));
    }
}
