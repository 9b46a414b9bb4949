use chumsky::text::ident;
use chumsky::{prelude::*, Parser};

pub struct Script {
    pub statements: Vec<Statement>,
}

impl From<Vec<Statement>> for Script {
    fn from(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Params(Vec<String>),
    Assign(String, Expr),
    Call {
        receiver: Option<String>,
        name: String,
        args: Vec<Expr>,
    },
    Comment,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Str(String),
    HereDoc(String),
    Var(String),
}

// define the grammar for the script
pub fn script_parser() -> impl Parser<char, Script, Error = Simple<char>> {
    let inline_ws = one_of(" \t\r").repeated().ignored();

    let comment = just('#')
        .then(filter(|c: &char| *c != '\n').repeated())
        .to(Statement::Comment)
        .boxed();

    let string_exp = none_of("\\\"")
        .repeated()
        .delimited_by(just('"'), just('"'))
        .map(|v: Vec<char>| v.into_iter().collect::<String>())
        .map(Expr::Str)
        .boxed();

    let heredoc_exp = just("<<<")
        .ignore_then(ident().then_with(|tag: String| {
            take_until(just(format!("{}>>>", tag)))
                .map(|(content, _)| content.into_iter().collect::<String>())
        }))
        .map(Expr::HereDoc)
        .boxed();

    let variable_exp = ident().map(Expr::Var);

    let expr = choice((string_exp, heredoc_exp, variable_exp)).boxed();

    let arg = inline_ws
        .clone()
        .ignore_then(expr.clone())
        .then_ignore(inline_ws.clone());

    let call = ident()
        .then(just('.').ignore_then(ident()).or_not())
        .then(
            arg.separated_by(just(','))
                .delimited_by(just('('), just(')')),
        )
        .map(|((first, method), args)| match method {
            Some(name) => Statement::Call {
                receiver: Some(first),
                name,
                args,
            },
            None => Statement::Call {
                receiver: None,
                name: first,
                args,
            },
        })
        .boxed();

    let param_decl = just("param")
        .then_ignore(one_of(" \t").repeated().at_least(1))
        .ignore_then(
            ident()
                .then_ignore(inline_ws.clone())
                .separated_by(just(',').then_ignore(inline_ws.clone()))
                .at_least(1),
        )
        .map(Statement::Params)
        .boxed();

    let var_assign = just("let")
        .then_ignore(one_of(" \t").repeated().at_least(1))
        .ignore_then(ident())
        .then_ignore(inline_ws.clone())
        .then_ignore(just('='))
        .then_ignore(inline_ws.clone())
        .then(expr)
        .map(|(name, value)| Statement::Assign(name, value))
        .boxed();

    let statement = choice((comment, param_decl, var_assign, call));

    let line = inline_ws
        .clone()
        .ignore_then(statement.or_not())
        .then_ignore(inline_ws);

    line.separated_by(just('\n'))
        .then_ignore(end())
        .map(|lines| Script::from(lines.into_iter().flatten().collect::<Vec<_>>()))
}
