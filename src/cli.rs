use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::args;
use crate::engine::{self, ScriptInvocation};
use crate::logging::{LoggerConfig, Severity, DEFAULT_TEMPLATE};
use crate::script::Interpreter;

#[derive(clap::Parser, Debug)]
#[clap(version, about = "Runs script files inside an embedded interpreter", long_about = None)]
struct App {
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Runs the provided script
    Exec(ExecArgs),
}

#[derive(clap::Args, Debug)]
struct ExecArgs {
    #[clap(long, help = "The location of the script")]
    script: PathBuf,

    #[clap(long, help = "Log messages are tagged with the identifier")]
    id: String,

    #[clap(long, help = "The parent folder of the log files")]
    log_folder: Option<PathBuf>,

    #[clap(long, help = "Write log output to the console", default_value_t = false, action)]
    console_logger: bool,

    #[clap(long, value_enum, ignore_case = true, default_value_t = Severity::Information,
           help = "The log level. Options are: trace, debug, information, warning, error or critical")]
    log_level: Severity,

    #[clap(long, default_value = DEFAULT_TEMPLATE, help = "The line format of the log output")]
    log_template: String,

    #[clap(long = "arg", num_args = 1..,
           help = "An argument for the script in the form of --arg argname=argvalue or --arg \"argname=argvalue with space\". Repeat this for every argument to append")]
    args: Vec<String>,
}

pub fn run() -> i32 {
    run_from(std::env::args_os())
}

/// Parses the process arguments and runs the selected command, returning
/// the process exit code. Public so tests can drive the whole surface
/// in-process.
pub fn run_from<I, T>(argv: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let app = match App::try_parse_from(argv) {
        Ok(app) => app,
        Err(error) => {
            let code = error.exit_code();
            let _ = error.print();
            return code;
        }
    };

    match app.command {
        Command::Exec(exec) => run_exec(exec),
    }
}

fn run_exec(exec: ExecArgs) -> i32 {
    // configure logging
    let config = LoggerConfig {
        console: exec.console_logger,
        file_folder: exec.log_folder.clone(),
        min_level: exec.log_level,
        template: exec.log_template.clone(),
        context: exec.id.clone(),
    };

    let logger = match config.build() {
        Ok(logger) => logger,
        Err(error) => {
            eprintln!("failed to configure logging: {}", error);
            return 1;
        }
    };

    let invocation = ScriptInvocation {
        script: exec.script.clone(),
        parameters: args::parse_parameters(&exec.args),
        logger: logger.clone(),
    };

    let code = match engine::execute(&Interpreter, invocation) {
        Ok(()) => {
            logger.information(&format!(
                "Execution of the 'exec' command finished successfully (path: '{}').",
                exec.script.display()
            ));
            0
        }
        Err(error) => {
            logger.error(&format!(
                "Execution of the 'exec' command failed (path: '{}'). Error message: '{}'.",
                exec.script.display(),
                error
            ));
            1
        }
    };

    logger.flush();
    code
}
