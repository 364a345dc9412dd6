//! PLC interpreter: executes an AST with a tree-walking evaluator.
//!
//! The interpreter keeps its own runtime scope chain and does not rely on
//! the analyzer's annotations, so it re-checks everything it needs at
//! evaluation time and reports violations as [`RuntimeError`]s.
//!
//! [`RuntimeError`]: plc_syntax::RuntimeError

pub mod config;
pub mod env;
mod flow;
pub mod interpreter;
pub mod numeric;
pub mod value;

pub use config::{InterpreterConfig, NegativeExponent};
pub use env::{Builtin, Callable, RuntimeScope, Variable};
pub use interpreter::Interpreter;
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use plc_analyzer::Analyzer;
    use plc_parser::{parse, Parser};
    use plc_syntax::Token;

    /// Parses, analyzes and runs `input`, returning main's result and everything printed.
    fn run_program(input: &str) -> Result<(BigInt, String), String> {
        run_with_config(input, InterpreterConfig::default())
    }

    fn run_with_config(input: &str, config: InterpreterConfig) -> Result<(BigInt, String), String> {
        let mut source = parse(Token::split(input)).map_err(|e| format!("Parse error: {}", e))?;
        Analyzer::new()
            .analyze(&mut source)
            .map_err(|e| format!("Type error: {}", e))?;
        let interpreter = Interpreter::with_config(Vec::new(), config);
        let result = interpreter.run(&source).map_err(|e| format!("Runtime error: {}", e));
        let output = String::from_utf8(interpreter.into_output()).expect("utf-8 output");
        result.map(|n| (n, output))
    }

    fn expect_value(input: &str, expected: i64) {
        match run_program(input) {
            Ok((actual, _)) => assert_eq!(actual, BigInt::from(expected), "Program: {}", input),
            Err(e) => panic!("Program failed: {}\nInput: {}", e, input),
        }
    }

    fn expect_output(input: &str, expected: &str) {
        match run_program(input) {
            Ok((_, output)) => assert_eq!(output, expected, "Program: {}", input),
            Err(e) => panic!("Program failed: {}\nInput: {}", e, input),
        }
    }

    fn expect_runtime_error(input: &str) -> String {
        match run_program(input) {
            Ok(_) => panic!("Expected error but program succeeded: {}", input),
            Err(e) => {
                assert!(e.starts_with("Runtime error"), "{}", e);
                e
            }
        }
    }

    /// Evaluates a standalone expression without analysis.
    fn eval(input: &str) -> Result<Value, String> {
        let expression = Parser::new(Token::split(input))
            .parse_expression()
            .map_err(|e| format!("Parse error: {}", e))?;
        let interpreter = Interpreter::with_output(Vec::new());
        let scope = interpreter.root_scope();
        interpreter
            .evaluate(&scope, &expression)
            .map_err(|e| format!("Runtime error: {}", e))
    }

    fn eval_display(input: &str) -> String {
        match eval(input) {
            Ok(value) => value.to_string(),
            Err(e) => panic!("Expression failed: {}\nInput: {}", e, input),
        }
    }

    #[test]
    fn test_global_returned_from_main() {
        expect_value("VAR x = 1; FUN main() DO RETURN x; END", 1);
    }

    #[test]
    fn test_arithmetic_operations() {
        assert_eq!(eval_display("1 + 2"), "3");
        assert_eq!(eval_display("5 - 8"), "-3");
        assert_eq!(eval_display("4 * 6"), "24");
        assert_eq!(eval_display("7 / 2"), "3");
        assert_eq!(eval_display("-7 / 2"), "-3");
        assert_eq!(eval_display("2 + 3 * 4"), "14");
        assert_eq!(eval_display("( 2 + 3 ) * 4"), "20");
        assert_eq!(eval_display("2 ^ 10"), "1024");
        assert_eq!(eval_display("1.5 + 1.25"), "2.75");
        assert_eq!(eval_display("1.5 * 2.0"), "3.00");
        assert_eq!(eval_display("1.0 / 3.0"), "0.3");
        assert_eq!(eval_display("2.5 / 1.0"), "2.5");
        assert_eq!(eval_display("99999999999 * 99999999999"), "9999999999800000000001");
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(eval("\"a\" + 1"), Ok(Value::String("a1".to_string())));
        assert_eq!(eval_display("1.50 + \"x\""), "1.50x");
        assert_eq!(eval_display("\"c=\" + 'c' + TRUE + NIL"), "c=ctruenil");
    }

    #[test]
    fn test_division_by_zero() {
        assert!(eval("1 / 0").unwrap_err().contains("division by zero"));
        assert!(eval("1.0 / 0.0").unwrap_err().contains("division by zero"));
        assert!(eval("0 / 0").is_err());
    }

    #[test]
    fn test_comparisons_and_logic() {
        assert_eq!(eval("1 < 2"), Ok(Value::Boolean(true)));
        assert_eq!(eval("2.0 == 2.00"), Ok(Value::Boolean(true)));
        assert_eq!(eval("'a' != 'b'"), Ok(Value::Boolean(true)));
        assert_eq!(eval("\"abc\" > \"abd\""), Ok(Value::Boolean(false)));
        assert_eq!(eval("TRUE && FALSE || TRUE"), Ok(Value::Boolean(true)));
        assert!(eval("1 < 1.0").unwrap_err().contains("cannot compare"));
        assert!(eval("NIL == NIL").is_err());
    }

    #[test]
    fn test_logical_operators_short_circuit() {
        assert_eq!(eval("FALSE && undefined()"), Ok(Value::Boolean(false)));
        assert_eq!(eval("TRUE || missing"), Ok(Value::Boolean(true)));
        assert!(eval("TRUE && undefined()").is_err());
        assert!(eval("1 && TRUE").is_err());
    }

    #[test]
    fn test_switch_runs_matching_case_only() {
        expect_output(
            "FUN main(): Integer DO
                SWITCH 2
                CASE 1 : print(\"A\");
                CASE 2 : print(\"B\");
                DEFAULT print(\"C\");
                END
                RETURN 0;
            END",
            "B\n",
        );
        expect_output(
            "FUN main(): Integer DO SWITCH 'z' CASE 'a' : print(1); DEFAULT print(2); print(3); END RETURN 0; END",
            "2\n3\n",
        );
    }

    #[test]
    fn test_switch_condition_evaluated_once() {
        expect_output(
            "VAR n = 0;
             FUN next(): Integer DO n = n + 1; print(n); RETURN n; END
             FUN main(): Integer DO SWITCH next() CASE 0 : print(0); CASE 2 : print(2); DEFAULT print(9); END RETURN n; END",
            "1\n9\n",
        );
    }

    #[test]
    fn test_while_loop() {
        expect_value(
            "FUN main(): Integer DO
                LET i = 0;
                LET sum = 0;
                WHILE i < 5 DO
                    i = i + 1;
                    sum = sum + i;
                END
                RETURN sum;
            END",
            15,
        );
    }

    #[test]
    fn test_while_body_scope_is_fresh_each_iteration() {
        // Redeclaring in the body would fail on the second pass if the scope persisted.
        expect_output(
            "FUN main(): Integer DO
                LET i = 0;
                WHILE i < 3 DO
                    LET doubled = i * 2;
                    print(doubled);
                    i = i + 1;
                END
                RETURN i;
            END",
            "0\n2\n4\n",
        );
    }

    #[test]
    fn test_early_return_through_nested_blocks() {
        expect_value(
            "FUN find(limit: Integer): Integer DO
                LET i = 0;
                WHILE TRUE DO
                    IF i > limit DO
                        SWITCH i
                        CASE 100 : RETURN 100;
                        DEFAULT RETURN i * 10;
                        END
                    END
                    i = i + 1;
                END
                RETURN -1;
            END
            FUN main(): Integer DO RETURN find(3); END",
            40,
        );
    }

    #[test]
    fn test_function_without_return_gives_nil() {
        expect_output(
            "FUN greet(name: String) DO print(\"hi \" + name); END
             FUN main(): Integer DO print(greet(\"bob\")); RETURN 0; END",
            "hi bob\nnil\n",
        );
    }

    #[test]
    fn test_recursion() {
        expect_value(
            "FUN fib(n: Integer): Integer DO
                IF n < 2 DO RETURN n; END
                RETURN fib(n - 1) + fib(n - 2);
            END
            FUN main(): Integer DO RETURN fib(15); END",
            610,
        );
    }

    #[test]
    fn test_functions_see_globals_and_shadowing() {
        expect_output(
            "VAR x = 1;
             FUN show() DO print(x); END
             FUN main(): Integer DO
                LET x = 2;
                show();
                print(x);
                x = 3;
                IF TRUE DO LET x = 4; print(x); END
                print(x);
                RETURN x;
             END",
            "1\n2\n4\n3\n",
        );
    }

    #[test]
    fn test_arguments_are_passed_by_value() {
        expect_value(
            "FUN bump(n: Integer): Integer DO n = n + 1; RETURN n; END
             FUN main(): Integer DO LET n = 1; bump(n); RETURN n; END",
            1,
        );
    }

    #[test]
    fn test_lists() {
        expect_output(
            "LIST xs: Integer = [3, 1, 2];
             FUN main(): Integer DO
                xs[1] = xs[0] + xs[2];
                print(xs);
                RETURN xs[1];
             END",
            "[3, 5, 2]\n",
        );
        expect_value(
            "LIST xs: Integer = [1, 2]; FUN main(): Integer DO LET ys = xs; ys[0] = 9; RETURN xs[0]; END",
            9,
        );
    }

    #[test]
    fn test_list_index_out_of_range() {
        let e = expect_runtime_error("LIST xs: Integer = [1, 2]; FUN main(): Integer DO RETURN xs[2]; END");
        assert!(e.contains("out of range"), "{}", e);
        expect_runtime_error("LIST xs: Integer = [1]; FUN main(): Integer DO RETURN xs[-1]; END");
        expect_runtime_error("LIST xs: Integer = [1]; FUN main(): Integer DO xs[1] = 2; RETURN 0; END");
    }

    #[test]
    fn test_immutable_assignment_is_runtime_error() {
        let e = expect_runtime_error("VAL limit = 3; FUN main(): Integer DO limit = 4; RETURN limit; END");
        assert!(e.contains("immutable"), "{}", e);
    }

    #[test]
    fn test_immutable_list_rejects_indexed_assignment() {
        let e = expect_runtime_error(
            "LIST xs = [1, 2]; VAL ys = xs; FUN main(): Integer DO ys[0] = 9; RETURN 0; END",
        );
        assert!(e.contains("immutable variable 'ys'"), "{}", e);
        expect_value(
            "LIST xs: Integer = [1, 2]; VAL ys = xs; FUN main(): Integer DO xs[0] = 9; RETURN ys[0]; END",
            9,
        );
    }

    #[test]
    fn test_list_containing_itself_prints() {
        expect_output(
            "LIST xs = [1]; FUN main(): Integer DO xs[0] = xs; print(xs); RETURN 0; END",
            "[(this list)]\n",
        );
        expect_output(
            "LIST xs = [1, 2]; LIST ys = [0];
             FUN main(): Integer DO
                ys[0] = xs;
                xs[1] = ys;
                print(xs);
                print(ys);
                RETURN 0;
             END",
            "[1, [(this list)]]\n[[1, (this list)]]\n",
        );
    }

    #[test]
    fn test_declaration_defaults_to_nil() {
        expect_output(
            "FUN main(): Integer DO LET s: String; print(s); s = \"set\"; print(s); RETURN 0; END",
            "nil\nset\n",
        );
    }

    #[test]
    fn test_print_formats() {
        expect_output(
            "FUN main(): Integer DO print(1.50); print('c'); print(\"a\\tb\"); print(FALSE); print(NIL); RETURN 0; END",
            "1.50\nc\na\tb\nfalse\nnil\n",
        );
    }

    #[test]
    fn test_call_depth_limit() {
        let program = "FUN down(n: Integer): Integer DO RETURN down(n + 1); END
                       FUN main(): Integer DO RETURN down(0); END";
        let config = InterpreterConfig {
            max_call_depth: 32,
            ..InterpreterConfig::default()
        };
        let e = run_with_config(program, config).unwrap_err();
        assert!(e.contains("maximum call depth"), "{}", e);
    }

    #[test]
    fn test_deep_recursion_with_default_config() {
        expect_value(
            "FUN sum(n: Integer): Integer DO
                IF n == 0 DO
                    RETURN 0;
                END
                RETURN n + sum(n - 1);
             END
             FUN main(): Integer DO RETURN sum(3000); END",
            4_501_500,
        );
    }

    #[test]
    fn test_negative_exponents() {
        let program = "FUN main(): Integer DO RETURN 2 ^ -1 + 1 ^ -5; END";
        assert!(run_program(program).unwrap_err().contains("negative exponent"));
        let config = InterpreterConfig {
            negative_exponent: NegativeExponent::Truncate,
            ..InterpreterConfig::default()
        };
        assert_eq!(run_with_config(program, config).map(|(n, _)| n), Ok(BigInt::from(1)));
        assert_eq!(eval_display("2.0 ^ -2"), "0.25");
    }

    #[test]
    fn test_main_must_return_integer_at_runtime() {
        let source = parse(Token::split("FUN main() DO RETURN \"s\"; END")).unwrap();
        let interpreter = Interpreter::with_output(Vec::new());
        let err = interpreter.run(&source).unwrap_err();
        assert!(err.msg.contains("main must return an Integer"));
    }

    #[test]
    fn test_unanalyzed_programs_are_checked_at_runtime() {
        let source = parse(Token::split(
            "FUN main() DO IF 1 DO print(1); END RETURN 0; END",
        ))
        .unwrap();
        let interpreter = Interpreter::with_output(Vec::new());
        assert!(interpreter.run(&source).unwrap_err().msg.contains("Boolean"));

        let source = parse(Token::split("FUN main() DO RETURN missing; END")).unwrap();
        assert!(interpreter.run(&source).unwrap_err().msg.contains("undeclared"));
    }
}
