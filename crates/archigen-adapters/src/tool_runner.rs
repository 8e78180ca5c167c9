//! Build-tool runner backed by `std::process::Command`.
//!
//! Output is streamed line by line to a sink while the process runs and
//! collected into the returned [`ToolOutput`].

use std::{
    fmt,
    io::{BufRead, BufReader, Read},
    path::Path,
    process::{Command, Stdio},
    sync::Arc,
    thread,
};

use tracing::{debug, instrument};

use archigen_core::{
    application::{
        ApplicationError,
        ports::{ToolCommand, ToolOutput, ToolRunner},
    },
    error::ArchigenResult,
};

/// Which pipe a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

type LineSink = Arc<dyn Fn(Stream, &str) + Send + Sync>;

/// Spawns the tool as a child process.
#[derive(Clone)]
pub struct ProcessToolRunner {
    sink: LineSink,
}

impl fmt::Debug for ProcessToolRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessToolRunner").finish_non_exhaustive()
    }
}

impl Default for ProcessToolRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessToolRunner {
    /// Runner that forwards output lines to the `debug` log only.
    pub fn new() -> Self {
        Self::with_sink(|stream, line| debug!(?stream, "{line}"))
    }

    /// Runner that hands every output line to `sink` as it arrives.
    pub fn with_sink<F>(sink: F) -> Self
    where
        F: Fn(Stream, &str) + Send + Sync + 'static,
    {
        Self {
            sink: Arc::new(sink),
        }
    }
}

impl ToolRunner for ProcessToolRunner {
    #[instrument(skip_all, fields(dir = %working_dir.display(), command = %command))]
    fn run(&self, working_dir: &Path, command: &ToolCommand) -> ArchigenResult<ToolOutput> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ApplicationError::ToolFailed {
                command: command.to_string(),
                stderr: format!("failed to start {}: {e}", command.program),
            })?;

        let stdout = child.stdout.take().map(|pipe| pump(pipe, Stream::Stdout, self.sink.clone()));
        let stderr = child.stderr.take().map(|pipe| pump(pipe, Stream::Stderr, self.sink.clone()));

        let status = child.wait().map_err(|e| ApplicationError::ToolFailed {
            command: command.to_string(),
            stderr: e.to_string(),
        })?;

        let collect = |handle: Option<thread::JoinHandle<String>>| {
            handle.and_then(|h| h.join().ok()).unwrap_or_default()
        };

        let output = ToolOutput {
            success: status.success(),
            stdout: collect(stdout),
            stderr: collect(stderr),
        };
        debug!(success = output.success, code = ?status.code(), "Command finished");
        Ok(output)
    }
}

/// Read `pipe` to the end on its own thread, forwarding each line.
fn pump<R>(pipe: R, stream: Stream, sink: LineSink) -> thread::JoinHandle<String>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut collected = String::new();
        for line in BufReader::new(pipe).lines() {
            let Ok(line) = line else { break };
            sink(stream, &line);
            collected.push_str(&line);
            collected.push('\n');
        }
        collected
    })
}
