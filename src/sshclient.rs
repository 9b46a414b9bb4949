
use std::io::prelude::*;
use std::net::TcpStream;
use std::path::Path;

use ssh2::Session;

use crate::error::SprigError;

/// Captured output of a remote script run.
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

pub trait RemoteExecutor {
    fn connect(&mut self, target: &str) -> Result<(), SprigError>;
    fn command(&self, command: &str) -> Result<String, SprigError>;
    fn run(&self, script: &str) -> Result<CommandOutput, SprigError>;
    fn upload(&self, content: &str, dst_path: &str) -> Result<(), SprigError>;
}

pub struct SshClient {
    session: Option<Session>,
}

impl RemoteExecutor for SshClient {
    fn connect(&mut self, target: &str) -> Result<(), SprigError> {
        self.connect_impl(target)
    }

    fn command(&self, command: &str) -> Result<String, SprigError> {
        self.command_impl(command)
    }

    fn run(&self, script: &str) -> Result<CommandOutput, SprigError> {
        self.run_impl(script)
    }

    fn upload(&self, content: &str, dst_path: &str) -> Result<(), SprigError> {
        self.upload_impl(content, dst_path)
    }
}

impl SshClient {

    pub fn new() -> Self {
        Self { session: None }
    }

    fn session(&self) -> Result<&Session, SprigError> {
        self.session.as_ref().ok_or(SprigError::NotConnected)
    }

    fn connect_impl(&mut self, target: &str) -> Result<(), SprigError> {

        // parse target
        let pattern = regex::Regex::new(r"^(?P<username>[^:@]+)@(?P<hostname>[^:]+)(:(?P<port>\d+))?$")?;
        let captures = pattern.captures(target).ok_or(SprigError::BadTarget)?;

        let host = captures.name("hostname").ok_or(SprigError::BadTarget)?.as_str();
        let username = captures.name("username").ok_or(SprigError::BadTarget)?.as_str();

        let port = match captures.name("port") {
            Some(port) => port.as_str().parse::<u16>().map_err(|_| SprigError::BadTarget)?,
            None => 22,
        };

        // issue the connect process
        let tcp = TcpStream::connect(format!("{}:{}", host, port))?;
        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.handshake()?;

        // try to authenticate using the ssh agent
        let mut agent = session.agent()?;
        agent.connect()?;
        agent.list_identities()?;

        let authenticated = agent
            .identities()?
            .iter()
            .any(|identity| agent.userauth(username, identity).is_ok());

        if !authenticated {
            return Err(SprigError::BadTarget);
        }

        self.session = Some(session);

        Ok(())
    }

    fn command_impl(&self, command: &str) -> Result<String, SprigError> {
        let session = self.session()?;
        let mut channel = session.channel_session()?;
        channel.exec(command)?;

        let mut stdout = String::new();
        channel.read_to_string(&mut stdout)?;
        channel.wait_close()?;

        Ok(stdout)
    }

    fn run_impl(&self, script: &str) -> Result<CommandOutput, SprigError> {
        let session = self.session()?;

        let remote_script_path = format!("/tmp/sprig_script_{}.sh", uuid::Uuid::new_v4());

        // upload the script to the remote target
        let sftp = session.sftp()?;
        let path = Path::new(remote_script_path.as_str());
        let mut file = sftp.create(path)?;
        file.write_all(script.as_bytes())?;
        file.close()?;

        // execute the script, capturing both streams for the log bridge
        let mut channel = session.channel_session()?;
        channel.exec(format!("/bin/bash {}", remote_script_path).as_str())?;

        let mut stdout = String::new();
        channel.read_to_string(&mut stdout)?;

        let mut stderr = String::new();
        channel.stderr().read_to_string(&mut stderr)?;

        channel.wait_close()?;

        // remove the script from the remote target
        sftp.unlink(path)?;

        Ok(CommandOutput { stdout, stderr })
    }

    fn upload_impl(&self, content: &str, dst_path: &str) -> Result<(), SprigError> {
        let session = self.session()?;

        let sftp = session.sftp()?;
        let path = Path::new(dst_path);
        let mut file = sftp.create(path)?;
        file.write_all(content.as_bytes())?;
        file.close()?;

        Ok(())
    }
}
