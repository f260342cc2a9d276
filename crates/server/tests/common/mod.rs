use anyhow::Context as _;
use serde_json::Value;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

const READ_TIMEOUT: Duration = Duration::from_secs(15);

/// The server binary driven over piped stdio. Killed on drop.
pub struct StdioServer {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Lines<BufReader<ChildStdout>>,
}

pub fn server_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_aladhan-mcp-server"));
    cmd.env_remove("ALADHAN_BASE_URL")
        .env_remove("ALADHAN_TIMEOUT_SECS")
        .env_remove("ALADHAN_LOG_FORMAT")
        .env_remove("RUST_LOG")
        .kill_on_drop(true);
    cmd
}

impl StdioServer {
    pub fn spawn(args: &[&str]) -> anyhow::Result<Self> {
        let mut cmd = server_command();
        cmd.args(args);
        Self::spawn_command(cmd)
    }

    /// Spawn a prepared [`server_command`], e.g. one with extra environment.
    pub fn spawn_command(mut cmd: Command) -> anyhow::Result<Self> {
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .context("spawn aladhan-mcp-server")?;
        let stdin = child.stdin.take().context("child stdin")?;
        let stdout = child.stdout.take().context("child stdout")?;
        Ok(Self {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout).lines(),
        })
    }

    pub async fn send(&mut self, msg: &Value) -> anyhow::Result<()> {
        let stdin = self.stdin.as_mut().context("stdin already closed")?;
        let mut line = serde_json::to_string(msg)?;
        line.push('\n');
        stdin.write_all(line.as_bytes()).await?;
        stdin.flush().await?;
        Ok(())
    }

    pub async fn recv(&mut self) -> anyhow::Result<Value> {
        let line = tokio::time::timeout(READ_TIMEOUT, self.stdout.next_line())
            .await
            .context("timed out waiting for a reply")??
            .context("server closed stdout")?;
        serde_json::from_str(&line).with_context(|| format!("reply is not JSON: {line}"))
    }

    pub async fn request(&mut self, msg: &Value) -> anyhow::Result<Value> {
        self.send(msg).await?;
        self.recv().await
    }

    /// Close stdin and wait for the process to exit.
    pub async fn shutdown(mut self) -> anyhow::Result<std::process::ExitStatus> {
        drop(self.stdin.take());
        tokio::time::timeout(READ_TIMEOUT, self.child.wait())
            .await
            .context("timed out waiting for exit")?
            .context("wait for server")
    }
}
