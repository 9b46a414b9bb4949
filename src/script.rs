use std::collections::HashMap;
use std::fmt::Display;

use chumsky::Parser;
use minijinja::Environment;
use serde::{Serialize, Serializer};

use crate::args::ParameterMap;
use crate::built_in_functions::execute_function;
use crate::engine::{ScriptEngine, Session};
use crate::error::SprigError;
use crate::logging::{Logger, Severity};
use crate::parser::{script_parser, Expr, Statement};
use crate::sshclient::{RemoteExecutor, SshClient};

/// A value produced by evaluating a script expression.
#[derive(Debug, Clone)]
pub enum Literal {
    Str(String),
    HereDoc(String),
}

impl Literal {
    pub fn as_str(&self) -> &str {
        match self {
            Literal::Str(s) => s,
            Literal::HereDoc(s) => s,
        }
    }
}

impl Serialize for Literal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The default embedded engine.
pub struct Interpreter;

impl ScriptEngine for Interpreter {
    fn open_session(&self) -> Result<Box<dyn Session>, SprigError> {
        // ensure the companion SSH library is loadable before the script runs
        ssh2::Session::new()?;

        Ok(Box::new(ScriptSession::new(Box::new(SshClient::new()))))
    }
}

/// The script execution context
///
/// contains :
/// - the bound composite logger,
/// - the defined variables and their values,
/// - the injected parameters,
/// - the remote executor available to the built-in functions
///
pub struct ScriptSession {
    pub(crate) logger: Logger,
    variables: HashMap<String, Literal>,
    parameters: ParameterMap,
    pub(crate) remote: Box<dyn RemoteExecutor>,
}

impl ScriptSession {

    pub fn new(remote: Box<dyn RemoteExecutor>) -> Self {
        Self {
            logger: Logger::discard(),
            variables: HashMap::new(),
            parameters: ParameterMap::new(),
            remote,
        }
    }

    fn execute(&mut self, statement: Statement) -> Result<(), SprigError> {
        match statement {
            Statement::Comment => {
                // ignore comments
            }
            Statement::Params(names) => {
                // a declared parameter missing from the map resolves to ""
                for name in names {
                    let value = self.parameters.get(&name).cloned().unwrap_or_default();
                    self.variables.insert(name, Literal::Str(value));
                }
            }
            Statement::Assign(name, expr) => {
                let value = self.eval(&expr)?;
                self.variables.insert(name, value);
            }
            Statement::Call {
                receiver: Some(receiver),
                name,
                args,
            } => {
                if receiver != "logger" {
                    return Err(SprigError::UnknownFunction(format!("{}.{}", receiver, name)));
                }
                let args = self.eval_args(&args)?;
                self.log_call(&name, args)?;
            }
            Statement::Call {
                receiver: None,
                name,
                args,
            } => {
                let args = self.eval_args(&args)?;
                execute_function(&name, args, self)?;
            }
        }

        Ok(())
    }

    fn log_call(&self, method: &str, args: Vec<Literal>) -> Result<(), SprigError> {
        let severity = match method {
            "trace" => Severity::Trace,
            "debug" => Severity::Debug,
            "info" | "information" => Severity::Information,
            "warn" | "warning" => Severity::Warning,
            "error" => Severity::Error,
            "fatal" | "critical" => Severity::Critical,
            _ => return Err(SprigError::UnknownFunction(format!("logger.{}", method))),
        };

        if args.len() != 1 {
            return Err(SprigError::WrongArgCount(1, args.len()));
        }

        self.logger.log(severity, args[0].as_str());
        Ok(())
    }

    fn eval_args(&self, args: &[Expr]) -> Result<Vec<Literal>, SprigError> {
        args.iter().map(|arg| self.eval(arg)).collect()
    }

    /// expand an expression to a literal value
    ///
    /// A variable reference is replaced by its stored value; a string or
    /// heredoc goes through the template engine first.
    fn eval(&self, expr: &Expr) -> Result<Literal, SprigError> {
        match expr {
            Expr::Var(name) => self
                .variables
                .get(name)
                .cloned()
                .ok_or_else(|| SprigError::UndefinedVar(name.clone())),
            Expr::Str(source) => Ok(Literal::Str(self.resolve_template(source)?)),
            Expr::HereDoc(source) => Ok(Literal::HereDoc(self.resolve_template(source)?)),
        }
    }

    fn resolve_template(&self, source: &str) -> Result<String, SprigError> {
        let mut env = Environment::new();
        env.add_template("template", source)?;
        let tmpl = env.get_template("template")?;
        let result = tmpl.render(&self.variables)?;
        Ok(result)
    }
}

impl Session for ScriptSession {
    fn bind_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }

    fn bind_variable(&mut self, name: &str, value: &str) {
        self.variables
            .insert(name.to_string(), Literal::Str(value.to_string()));
    }

    fn set_parameters(&mut self, parameters: ParameterMap) {
        self.parameters = parameters;
    }

    fn run(&mut self, source: &str) -> Result<(), SprigError> {
        let script = script_parser().parse(source).map_err(|errors| {
            SprigError::Parse(
                errors
                    .iter()
                    .map(|error| error.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

        for statement in script.statements {
            self.execute(statement)?;
        }

        Ok(())
    }
}
