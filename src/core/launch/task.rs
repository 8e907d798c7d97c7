// ─── Launch Task ───
// Spawns the game process, drains its output and classifies how it ended.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::arguments::LaunchContext;
use super::classpath::safe_path_str;

/// Log target for everything the child writes.
pub const CLIENT_LOG_TARGET: &str = "client";

const READ_CHUNK: usize = 8 * 1024;

/// Why the child never produced a normal exit code.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Failed to start {program}: {source}")]
    FailedToStart {
        program: String,
        source: std::io::Error,
    },

    #[error("Process crashed (no exit code)")]
    Crashed,

    #[error("Timed out while starting the process: {0}")]
    TimedOut(std::io::Error),

    #[error("I/O error while running the process: {0}")]
    Io(std::io::Error),

    #[error("Unknown process error: {0}")]
    Unknown(std::io::Error),
}

impl ProcessError {
    /// Map a spawn error to its failure class.
    pub fn from_spawn(program: &str, err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied | ErrorKind::InvalidInput => {
                Self::FailedToStart {
                    program: program.to_string(),
                    source: err,
                }
            }
            ErrorKind::TimedOut => Self::TimedOut(err),
            ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof
            | ErrorKind::Interrupted
            | ErrorKind::WriteZero
            | ErrorKind::InvalidData => Self::Io(err),
            _ => Self::Unknown(err),
        }
    }
}

#[derive(Debug)]
pub enum ProcessResult {
    /// The child ran and returned this exit code.
    Exited(i32),
    /// The child could not be started or did not exit normally.
    Failed(ProcessError),
}

impl ProcessResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessResult::Exited(0))
    }
}

/// Receives the merged stdout/stderr stream of the child.
pub trait OutputSink: Send {
    fn chunk(&mut self, data: &[u8]);
}

/// Forwards child output to the `client` tracing target, one event per line.
///
/// Bytes are held until a full line arrived, so characters split across
/// reads decode intact.
#[derive(Default)]
pub struct TracingSink {
    pending: Vec<u8>,
}

impl TracingSink {
    fn emit(line: &[u8]) {
        let line = String::from_utf8_lossy(line);
        let line = line.trim_end_matches(['\r', '\n']);
        if !line.is_empty() {
            info!(target: CLIENT_LOG_TARGET, "{}", line);
        }
    }

    /// Take every complete line out of the buffer.
    fn drain_lines(&mut self) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            lines.push(self.pending.drain(..=pos).collect());
        }
        lines
    }
}

impl OutputSink for TracingSink {
    fn chunk(&mut self, data: &[u8]) {
        self.pending.extend_from_slice(data);
        for line in self.drain_lines() {
            Self::emit(&line);
        }
    }
}

impl Drop for TracingSink {
    fn drop(&mut self) {
        Self::emit(&self.pending);
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum WatchEvent {
    Chunk(Vec<u8>),
    EndOfStream,
}

/// Merged view over the child's output pipes.
///
/// Yields chunks in arrival order and `EndOfStream` once every pipe closed.
pub struct OutputWatch {
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl OutputWatch {
    pub fn new(pipes: Vec<Box<dyn AsyncRead + Send + Unpin>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        for mut pipe in pipes {
            let tx = tx.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; READ_CHUNK];
                loop {
                    match pipe.read(&mut buf).await {
                        Ok(0) => break,
                        Ok(n) => {
                            if tx.send(buf[..n].to_vec()).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            debug!("Output pipe closed: {}", e);
                            break;
                        }
                    }
                }
            });
        }
        Self { rx }
    }

    pub async fn next(&mut self) -> WatchEvent {
        match self.rx.recv().await {
            Some(chunk) => WatchEvent::Chunk(chunk),
            None => WatchEvent::EndOfStream,
        }
    }
}

/// Start the child described by `ctx`.
///
/// `on_started` runs once the process exists; the call then blocks until the
/// child exits and its output has been drained into `sink`.
pub async fn run(
    ctx: &LaunchContext,
    sink: &mut dyn OutputSink,
    on_started: impl FnOnce(),
) -> ProcessResult {
    let program = safe_path_str(&ctx.interpreter);

    if let Err(e) = tokio::fs::create_dir_all(&ctx.working_dir).await {
        return ProcessResult::Failed(ProcessError::from_spawn(&program, e));
    }

    let mut cmd = Command::new(&ctx.interpreter);
    cmd.args(&ctx.args)
        .current_dir(&ctx.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    configure_native_library_env(&mut cmd, &ctx.natives_dir);

    info!("Launching client with interpreter: {}", program);
    debug!("Command (copy/paste): {}", format_command_for_logs(&program, &ctx.args));

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return ProcessResult::Failed(ProcessError::from_spawn(&program, e)),
    };

    info!("Client started (PID {:?})", child.id());
    on_started();

    let mut pipes: Vec<Box<dyn AsyncRead + Send + Unpin>> = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        pipes.push(Box::new(stdout));
    }
    if let Some(stderr) = child.stderr.take() {
        pipes.push(Box::new(stderr));
    }

    let mut watch = OutputWatch::new(pipes);
    while let WatchEvent::Chunk(data) = watch.next().await {
        sink.chunk(&data);
    }

    match child.wait().await {
        Ok(status) => match status.code() {
            Some(code) => {
                info!("Client exited with code {}", code);
                ProcessResult::Exited(code)
            }
            None => ProcessResult::Failed(ProcessError::Crashed),
        },
        Err(e) => ProcessResult::Failed(ProcessError::Io(e)),
    }
}

fn configure_native_library_env(cmd: &mut Command, natives_dir: &Path) {
    let native_path = safe_path_str(natives_dir);

    if cfg!(target_os = "windows") {
        cmd.env("PATH", append_env_path("PATH", &native_path));
    } else if cfg!(target_os = "linux") {
        cmd.env("LD_LIBRARY_PATH", append_env_path("LD_LIBRARY_PATH", &native_path));
    } else if cfg!(target_os = "macos") {
        cmd.env(
            "DYLD_LIBRARY_PATH",
            append_env_path("DYLD_LIBRARY_PATH", &native_path),
        );
    }
}

fn append_env_path(var_name: &str, value: &str) -> String {
    let separator = if cfg!(target_os = "windows") { ";" } else { ":" };
    match std::env::var(var_name) {
        Ok(existing) if !existing.trim().is_empty() => {
            format!("{}{}{}", value, separator, existing)
        }
        _ => value.to_string(),
    }
}

fn format_command_for_logs(program: &str, args: &[String]) -> String {
    std::iter::once(shell_escape(program))
        .chain(args.iter().map(|arg| shell_escape(arg)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_escape(raw: &str) -> String {
    if raw.is_empty() {
        return "\"\"".to_string();
    }

    if raw.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '\\' | '=')
    }) {
        return raw.to_string();
    }

    format!("\"{}\"", raw.replace('"', "\\\""))
}
