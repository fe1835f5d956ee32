//! Runs the glance client with an environment's credentials

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::Command;

use crate::error::LaunchError;
use crate::resolver::ResolvedEntry;

/// Client executable looked up on `PATH` by default
pub const CLIENT_BINARY: &str = "glance";

/// Flag forcing glance debug output
pub const DEBUG_FLAG: &str = "--debug";

/// Flag telling glance to skip TLS verification; always the first argument
pub const INSECURE_FLAG: &str = "-k";

/// Arguments handed to the client for one run.
///
/// `--debug` is prepended when forced (even if the user already passed it),
/// then `-k` is prepended unless it already comes first.
pub fn client_args(user_args: &[String], force_debug: bool) -> Vec<String> {
    let mut args = Vec::with_capacity(user_args.len() + 2);
    if force_debug {
        args.push(DEBUG_FLAG.to_string());
    }
    args.extend(user_args.iter().cloned());

    if args.first().map(String::as_str) != Some(INSECURE_FLAG) {
        args.insert(0, INSECURE_FLAG.to_string());
    }
    args
}

/// Environment snapshot handed to a single client process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessEnvironment {
    vars: BTreeMap<OsString, OsString>,
}

impl ProcessEnvironment {
    /// Copy of the current process environment
    pub fn capture() -> Self {
        std::env::vars_os().collect()
    }

    /// Add resolved credentials, replacing host variables of the same name
    pub fn overlay(mut self, entries: &[ResolvedEntry]) -> Self {
        for entry in entries {
            self.vars
                .insert(OsString::from(&entry.key), OsString::from(&entry.value));
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&OsStr> {
        self.vars.get(OsStr::new(name)).map(OsString::as_os_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl FromIterator<(OsString, OsString)> for ProcessEnvironment {
    fn from_iter<I: IntoIterator<Item = (OsString, OsString)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

/// Everything one client run needs
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub args: Vec<String>,
    pub environment: ProcessEnvironment,
}

impl LaunchRequest {
    pub fn new(args: Vec<String>, environment: ProcessEnvironment) -> Self {
        Self { args, environment }
    }
}

/// How a client process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientExit {
    code: Option<i32>,
}

impl ClientExit {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Exit code, `None` when the child was killed by a signal
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ClientExit {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Starts the client for one environment and waits for it
#[async_trait]
pub trait Launcher {
    async fn launch(
        &self,
        environment: &str,
        request: LaunchRequest,
    ) -> Result<ClientExit, LaunchError>;
}

/// Launches the real glance executable
#[derive(Debug, Clone)]
pub struct GlanceLauncher {
    binary: PathBuf,
}

impl GlanceLauncher {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for GlanceLauncher {
    fn default() -> Self {
        Self::new(CLIENT_BINARY)
    }
}

#[async_trait]
impl Launcher for GlanceLauncher {
    async fn launch(
        &self,
        environment: &str,
        request: LaunchRequest,
    ) -> Result<ClientExit, LaunchError> {
        tracing::info!(
            environment,
            binary = %self.binary.display(),
            args = ?request.args,
            "Running glance client"
        );

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("-- {} --\n", environment).as_bytes())
            .await?;
        stdout.flush().await?;

        let mut child = Command::new(&self.binary)
            .args(&request.args)
            .env_clear()
            .envs(request.environment.iter())
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        let pipe = child.stdout.take().ok_or(LaunchError::MissingPipe)?;
        let streamed = stream_lines(BufReader::new(pipe), &mut stdout).await;

        // Wait even if forwarding failed so the child is reaped
        let status = child.wait().await?;
        let lines = streamed?;

        tracing::debug!(environment, lines, status = ?status.code(), "glance client exited");
        Ok(status.into())
    }
}

/// Copy `reader` to `writer` one line at a time, flushing after each line.
///
/// Returns the number of lines forwarded. Bytes are passed through untouched.
pub async fn stream_lines<R, W>(mut reader: R, writer: &mut W) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = Vec::new();
    let mut count = 0;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }

        writer.write_all(&line).await?;
        writer.flush().await?;
        tracing::debug!(target: "superglance::client", "{}", String::from_utf8_lossy(&line).trim_end());
        count += 1;
    }

    Ok(count)
}
