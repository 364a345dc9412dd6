//! PLC parser: converts a token sequence into an AST.
mod literal;
pub mod parser;

pub use parser::{is_keyword, parse, Parser, Pattern, KEYWORDS};

#[cfg(test)]
mod tests {
    use super::*;
    use plc_syntax::ast::*;
    use plc_syntax::error::SyntaxError;
    use plc_syntax::token::Token;

    fn parse_expr_str(input: &str) -> Expression {
        let mut parser = Parser::new(Token::split(input));
        parser.parse_expression().expect("Parsing should succeed")
    }

    fn parse_source_str(input: &str) -> Source {
        parse(Token::split(input)).expect("Parsing should succeed")
    }

    fn parse_error(input: &str) -> SyntaxError {
        parse(Token::split(input)).expect_err("Parsing should fail")
    }

    fn binary_parts(expr: &Expression) -> (BinaryOp, &Expression, &Expression) {
        match &expr.kind {
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => (*operator, left, right),
            other => panic!("Expected Binary, got {:?}", other),
        }
    }

    #[test]
    fn test_literal_expressions() {
        assert_eq!(parse_expr_str("42"), Expression::literal(42.into()));
        assert_eq!(parse_expr_str("-7"), Expression::literal((-7).into()));
        assert_eq!(parse_expr_str("TRUE"), Expression::literal(true.into()));
        assert_eq!(parse_expr_str("false"), Expression::literal(false.into()));
        assert_eq!(parse_expr_str("NIL"), Expression::literal(Literal::Nil));
        assert_eq!(parse_expr_str("'c'"), Expression::literal('c'.into()));
        assert!(matches!(
            parse_expr_str("1.50").kind,
            ExpressionKind::Literal(Literal::Decimal(ref d)) if d.to_string() == "1.50"
        ));
    }

    #[test]
    fn test_string_escapes_are_decoded() {
        let expr = parse_expr_str(r#""a\n""#);
        assert_eq!(expr, Expression::literal("a\n".into()));
        let expr = parse_expr_str(r#""\"q\\\"""#);
        assert_eq!(expr, Expression::literal("\"q\\\"".into()));
    }

    #[test]
    fn test_invalid_escape_is_error() {
        let mut parser = Parser::new(Token::split(r#"x + "\q""#));
        let err = parser.parse_expression().expect_err("invalid escape");
        assert_eq!(err.index, 2);
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn test_multiplicative_binds_tighter_than_additive() {
        let expr = parse_expr_str("1 + 2 * 3");
        let (op, left, right) = binary_parts(&expr);
        assert_eq!(op, BinaryOp::Add);
        assert_eq!(*left, Expression::literal(1.into()));
        assert_eq!(binary_parts(right).0, BinaryOp::Multiply);
    }

    #[test]
    fn test_left_associativity() {
        let expr = parse_expr_str("1 - 2 - 3");
        let (op, left, right) = binary_parts(&expr);
        assert_eq!(op, BinaryOp::Subtract);
        assert_eq!(*right, Expression::literal(3.into()));
        let (inner, a, b) = binary_parts(left);
        assert_eq!(inner, BinaryOp::Subtract);
        assert_eq!(*a, Expression::literal(1.into()));
        assert_eq!(*b, Expression::literal(2.into()));
    }

    #[test]
    fn test_precedence_levels() {
        let expr = parse_expr_str("a < b + 1 && c");
        let (op, left, _) = binary_parts(&expr);
        assert_eq!(op, BinaryOp::And);
        let (cmp, _, sum) = binary_parts(left);
        assert_eq!(cmp, BinaryOp::Less);
        assert_eq!(binary_parts(sum).0, BinaryOp::Add);

        let expr = parse_expr_str("2 ^ 3 * 4");
        assert_eq!(binary_parts(&expr).0, BinaryOp::Multiply);
    }

    #[test]
    fn test_group_access_and_call() {
        assert!(matches!(parse_expr_str("(1 + 2)").kind, ExpressionKind::Group(_)));
        assert_eq!(parse_expr_str("x"), Expression::access("x", None));
        assert_eq!(
            parse_expr_str("xs[i + 1]"),
            Expression::access(
                "xs",
                Some(Expression::binary(
                    BinaryOp::Add,
                    Expression::access("i", None),
                    Expression::literal(1.into())
                ))
            )
        );
        assert_eq!(parse_expr_str("f()"), Expression::call("f", vec![]));
        match parse_expr_str("add(1, 2)").kind {
            ExpressionKind::Call { name, arguments, .. } => {
                assert_eq!(name, "add");
                assert_eq!(arguments.len(), 2);
            }
            other => panic!("Expected Call, got {:?}", other),
        }
    }

    #[test]
    fn test_globals_and_functions() {
        let source = parse_source_str(
            "LIST xs: Integer = [1, 2, 3]; VAR count = 0; VAR later: String; VAL name = \"p\";
             FUN add(a: Integer, b: Integer): Integer DO RETURN a + b; END
             FUN main() DO RETURN add(1, 2); END",
        );
        assert_eq!(source.globals.len(), 4);
        let xs = &source.globals[0];
        assert!(xs.mutable);
        assert_eq!(xs.type_name.as_deref(), Some("Integer"));
        assert!(matches!(
            xs.value.as_ref().map(|v| &v.kind),
            Some(ExpressionKind::List(values)) if values.len() == 3
        ));
        assert!(source.globals[2].value.is_none());
        assert!(!source.globals[3].mutable);

        assert_eq!(source.functions.len(), 2);
        let add = &source.functions[0];
        assert_eq!(add.arity(), 2);
        assert_eq!(add.parameters[1].type_name, "Integer");
        assert_eq!(add.return_type_name.as_deref(), Some("Integer"));
        assert_eq!(source.functions[1].return_type_name, None);
    }

    #[test]
    fn test_keywords_ignore_case() {
        let upper = parse_source_str("FUN main() DO LET x = 1; IF x == 1 DO x = 2; ELSE x = 3; END RETURN x; END");
        let lower = parse_source_str("fun main() do let x = 1; if x == 1 do x = 2; else x = 3; end return x; end");
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_statements() {
        let source = parse_source_str(
            "FUN main(): Integer DO
                LET i: Integer = 0;
                LET s;
                WHILE i < 3 DO i = i + 1; END
                SWITCH i CASE 1 : print(1); CASE 3 : print(3); DEFAULT print(0); END
                print(i);
                RETURN i;
            END",
        );
        let body = &source.functions[0].body;
        assert_eq!(body.len(), 6);
        assert!(matches!(&body[0], Statement::Declaration { type_name: Some(t), value: Some(_), .. } if t == "Integer"));
        assert!(matches!(&body[1], Statement::Declaration { type_name: None, value: None, .. }));
        assert!(matches!(&body[2], Statement::While { body, .. } if body.len() == 1));
        match &body[3] {
            Statement::Switch { cases, .. } => {
                assert_eq!(cases.len(), 3);
                assert!(cases[0].value.is_some());
                assert!(cases[2].value.is_none());
            }
            other => panic!("Expected Switch, got {:?}", other),
        }
        assert!(matches!(&body[4], Statement::Expression(e) if e.is_call()));
        assert!(matches!(&body[5], Statement::Return(_)));
    }

    #[test]
    fn test_indexed_assignment() {
        let source = parse_source_str("FUN main() DO xs[0] = 5; RETURN 0; END");
        match &source.functions[0].body[0] {
            Statement::Assignment { receiver, .. } => {
                assert!(matches!(&receiver.kind, ExpressionKind::Access { index: Some(_), .. }))
            }
            other => panic!("Expected Assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_commas_are_rejected() {
        let err = parse_error("FUN main() DO RETURN f(1, ); END");
        assert!(err.msg.contains("trailing"));
        assert_eq!(err.index, 10);
        let err = parse_error("LIST xs = [1, ]; FUN main() DO RETURN 0; END");
        assert!(err.msg.contains("trailing"));
        let err = parse_error("FUN f(a: Integer, ) DO RETURN 0; END");
        assert!(err.msg.contains("trailing"));
    }

    #[test]
    fn test_switch_requires_case_and_default() {
        assert!(parse(Token::split("FUN main() DO SWITCH 1 DEFAULT RETURN 0; END RETURN 0; END")).is_err());
        assert!(parse(Token::split("FUN main() DO SWITCH 1 CASE 1 : RETURN 1; END RETURN 0; END")).is_err());
        assert!(parse(Token::split(
            "FUN main() DO SWITCH 1 CASE 1 : RETURN 1; DEFAULT RETURN 0; CASE 2 : RETURN 2; END RETURN 0; END"
        ))
        .is_err());
    }

    #[test]
    fn test_if_requires_then_branch() {
        let err = parse_error("FUN main() DO IF TRUE DO ELSE RETURN 1; END RETURN 0; END");
        assert!(err.msg.contains("at least one statement"));
        assert!(parse(Token::split("FUN main() DO IF TRUE DO RETURN 1; END RETURN 0; END")).is_ok());
    }

    #[test]
    fn test_error_location() {
        let err = parse_error("FUN main ( ) DO RETURN 1 END");
        assert_eq!(err.index, 7);
        assert_eq!(err.offset, 25);
        assert!(err.msg.contains("expected ';'"));
    }

    #[test]
    fn test_error_at_end_of_input() {
        let err = parse_error("FUN main() DO RETURN 1;");
        assert_eq!(err.index, 8);
        assert_eq!(err.offset, 23);
    }

    #[test]
    fn test_source_shape_errors() {
        let err = parse_error("VAR x = 1;");
        assert!(err.msg.contains("'FUN'"));
        let err = parse_error("FUN main() DO RETURN 0; END VAR x = 1;");
        assert_eq!(err.index, 9);
        assert!(parse(Token::split("VAL x; FUN main() DO RETURN 0; END")).is_err());
        assert!(parse(Token::split("VAR x = 1 FUN main() DO RETURN 0; END")).is_err());
    }

    #[test]
    fn test_keyword_is_not_a_name() {
        let err = parse_error("FUN main() DO LET while = 1; RETURN 0; END");
        assert!(err.msg.contains("expected identifier"));
        let err = parse_error("FUN main() DO RETURN end; END");
        assert!(err.msg.contains("keyword"));
    }

    #[test]
    fn test_nil_type_name_is_accepted() {
        let source = parse_source_str("FUN log(x: Any): Nil DO print(x); END FUN main() DO RETURN 0; END");
        assert_eq!(source.functions[0].return_type_name.as_deref(), Some("Nil"));
    }
}
