use chumsky::Parser;
use sprig::parser::{script_parser, Expr, Statement};

#[test]
fn parses_an_assignment() {
    let ast = script_parser().parse("let greeting = \"hello\"\n").unwrap();

    assert_eq!(ast.statements.len(), 1);
    match &ast.statements[0] {
        Statement::Assign(name, Expr::Str(value)) => {
            assert_eq!(name, "greeting");
            assert_eq!(value, "hello");
        }
        other => panic!("expected an assignment, got {:?}", other),
    }
}

#[test]
fn parses_a_parameter_declaration() {
    let ast = script_parser().parse("param one, two, three\n").unwrap();

    match &ast.statements[0] {
        Statement::Params(names) => {
            assert_eq!(names.len(), 3);
            assert_eq!(names[0], "one");
            assert_eq!(names[1], "two");
            assert_eq!(names[2], "three");
        }
        other => panic!("expected a parameter declaration, got {:?}", other),
    }
}

#[test]
fn parses_logger_method_calls() {
    let ast = script_parser().parse("logger.information(\"hi\")\n").unwrap();

    match &ast.statements[0] {
        Statement::Call {
            receiver: Some(receiver),
            name,
            args,
        } => {
            assert_eq!(receiver, "logger");
            assert_eq!(name, "information");
            assert_eq!(args, &[Expr::Str("hi".to_string())]);
        }
        other => panic!("expected a method call, got {:?}", other),
    }
}

#[test]
fn parses_plain_calls_with_variable_arguments() {
    let ast = script_parser().parse("echo(message)\n").unwrap();

    match &ast.statements[0] {
        Statement::Call {
            receiver: None,
            name,
            args,
        } => {
            assert_eq!(name, "echo");
            assert_eq!(args, &[Expr::Var("message".to_string())]);
        }
        other => panic!("expected a call, got {:?}", other),
    }
}

#[test]
fn parses_heredoc_arguments() {
    let ast = script_parser()
        .parse("upload(<<<EOF\nline\nEOF>>>, \"/tmp/out\")\n")
        .unwrap();

    match &ast.statements[0] {
        Statement::Call { name, args, .. } => {
            assert_eq!(name, "upload");
            assert_eq!(args.len(), 2);
            assert_eq!(args[0], Expr::HereDoc("\nline\n".to_string()));
        }
        other => panic!("expected a call, got {:?}", other),
    }
}

#[test]
fn keeps_comments_and_skips_blank_lines() {
    let ast = script_parser()
        .parse("# a comment\n\nlogger.information(\"hi\")\n")
        .unwrap();

    assert_eq!(ast.statements.len(), 2);
    assert!(matches!(ast.statements[0], Statement::Comment));
    assert!(matches!(ast.statements[1], Statement::Call { .. }));
}

#[test]
fn rejects_malformed_statements() {
    assert!(script_parser().parse("let = nope\n").is_err());
}
