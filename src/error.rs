use thiserror::Error;

#[derive(Debug, Error)]
pub enum SprigError {

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("script parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Script(String),

    #[error("undefined variable {0}")]
    UndefinedVar(String),

    #[error("unknown function invocation '{0}'")]
    UnknownFunction(String),

    #[error("wrong number of arguments, expected {0}, got {1}")]
    WrongArgCount(usize, usize),

    #[error("bad argument to function call: {0}")]
    BadArgument(&'static str),

    #[error("template error {0}")]
    Template(#[from] minijinja::Error),

    #[error("SSH error: {0}")]
    Ssh(#[from] ssh2::Error),

    #[error("incorrect target specified")]
    BadTarget,

    #[error("SSH session not connected")]
    NotConnected,

    #[error("Regex error")]
    RegexError(#[from] regex::Error),
}
