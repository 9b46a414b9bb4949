use crate::error::SprigError;
use crate::script::{Literal, ScriptSession};

fn execute_echo(args: Vec<Literal>, session: &mut ScriptSession) -> Result<(), SprigError> {
    // plain output maps to the Information channel
    for arg in args {
        session.logger.information(arg.as_str());
    }

    Ok(())
}

fn execute_fail(args: Vec<Literal>) -> Result<(), SprigError> {
    if args.len() != 1 {
        return Err(SprigError::WrongArgCount(1, args.len()));
    }

    Err(SprigError::Script(args[0].as_str().to_string()))
}

fn execute_ssh_connect(args: Vec<Literal>, session: &mut ScriptSession) -> Result<(), SprigError> {
    if args.len() != 1 {
        return Err(SprigError::WrongArgCount(1, args.len()));
    }

    let target = match &args[0] {
        Literal::Str(target) => target.clone(),
        _ => return Err(SprigError::BadArgument("ssh_connect expects a target string")),
    };

    session.remote.connect(&target)
}

fn execute_ssh_exec(args: Vec<Literal>, session: &mut ScriptSession) -> Result<(), SprigError> {
    if args.len() != 1 {
        return Err(SprigError::WrongArgCount(1, args.len()));
    }

    let command = match &args[0] {
        Literal::Str(command) => command.clone(),
        _ => return Err(SprigError::BadArgument("ssh_exec expects a command string")),
    };

    let stdout = session.remote.command(&command)?;
    for line in stdout.lines() {
        session.logger.information(line);
    }

    Ok(())
}

fn execute_ssh_run(args: Vec<Literal>, session: &mut ScriptSession) -> Result<(), SprigError> {
    if args.len() != 1 {
        return Err(SprigError::WrongArgCount(1, args.len()));
    }

    let output = session.remote.run(args[0].as_str())?;

    // bridge the remote streams onto the logger
    for line in output.stdout.lines() {
        session.logger.information(line);
    }
    for line in output.stderr.lines() {
        session.logger.error(line);
    }

    Ok(())
}

fn execute_upload(args: Vec<Literal>, session: &mut ScriptSession) -> Result<(), SprigError> {
    if args.len() != 2 {
        return Err(SprigError::WrongArgCount(2, args.len()));
    }

    let source = args.first().ok_or(SprigError::BadArgument("missing source argument"))?;
    let target = args.get(1).ok_or(SprigError::BadArgument("missing target argument"))?;

    let destination = match target {
        Literal::Str(path) => path.clone(),
        _ => return Err(SprigError::BadArgument("second argument of upload must be a string")),
    };

    // a heredoc carries the content itself, a string names a local file
    match source {
        Literal::HereDoc(content) => {
            session.remote.upload(content.as_str(), &destination)?;
        }
        Literal::Str(file_path) => {
            let contents = std::fs::read_to_string(file_path)?;
            session.remote.upload(contents.as_str(), &destination)?;
        }
    }

    Ok(())
}

pub fn execute_function(
    name: &str,
    args: Vec<Literal>,
    session: &mut ScriptSession,
) -> Result<(), SprigError> {
    match name {
        "echo" => execute_echo(args, session)?,
        "fail" => execute_fail(args)?,
        "ssh_connect" => execute_ssh_connect(args, session)?,
        "ssh_exec" => execute_ssh_exec(args, session)?,
        "ssh_run" => execute_ssh_run(args, session)?,
        "upload" => execute_upload(args, session)?,
        &_ => return Err(SprigError::UnknownFunction(name.to_string())),
    }

    Ok(())
}
