use std::fs;
use std::path::PathBuf;

use crate::args::ParameterMap;
use crate::error::SprigError;
use crate::logging::Logger;

/// One execution context of the embedded scripting engine.
///
/// A session holds the variables visible to the script and runs exactly
/// one script body.
pub trait Session {
    fn bind_logger(&mut self, logger: Logger);
    fn bind_variable(&mut self, name: &str, value: &str);
    fn set_parameters(&mut self, parameters: ParameterMap);
    fn run(&mut self, source: &str) -> Result<(), SprigError>;
}

pub trait ScriptEngine {
    fn open_session(&self) -> Result<Box<dyn Session>, SprigError>;
}

/// Everything one script run needs: the script location, the injected
/// parameters and the logger the run reports through. Consumed exactly
/// once.
pub struct ScriptInvocation {
    pub script: PathBuf,
    pub parameters: ParameterMap,
    pub logger: Logger,
}

/// Runs the invocation to completion in a fresh session.
///
/// The logger is bound into the session as the script's `logger` object,
/// `script_root` is bound to the script file's containing directory, and
/// supplied parameters the script does not declare are ignored. The call
/// blocks until the script finishes or fails; a script-level error is
/// propagated unretried.
pub fn execute(engine: &dyn ScriptEngine, invocation: ScriptInvocation) -> Result<(), SprigError> {
    let source = fs::read_to_string(&invocation.script)?;
    let script_root = invocation
        .script
        .parent()
        .map(|parent| parent.display().to_string())
        .unwrap_or_default();

    let mut session = engine.open_session()?;

    invocation
        .logger
        .information(&format!("Executing script '{}'.", invocation.script.display()));

    session.bind_logger(invocation.logger);
    session.bind_variable("script_root", &script_root);
    session.set_parameters(invocation.parameters);
    session.run(&source)
}
