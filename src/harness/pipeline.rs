//! Process plumbing for the harness: `stream <fixture> | interpreter`.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, ChildStderr, ChildStdout, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use super::{HarnessError, RuntimeSpec};

/// The two running children. Anything still alive when this is dropped is killed and reaped.
pub(super) struct Pipeline {
    producer: Child,
    consumer: Child,
}

impl Pipeline {
    /// Spawn the stream producer, then the interpreter reading from it.
    pub(super) fn spawn(runtime: &RuntimeSpec, root: &Path, fixture: &Path) -> Result<Self, HarnessError> {
        let (program, args) = split(&runtime.stream)?;
        let mut producer = Command::new(program)
            .args(args)
            .arg(fixture)
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| HarnessError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let Some(stream) = producer.stdout.take() else {
            reap(&mut producer);
            return Err(HarnessError::Wire("stream command has no stdout".to_string()));
        };

        let (program, args) = match split(&runtime.interpreter) {
            Ok(parts) => parts,
            Err(e) => {
                reap(&mut producer);
                return Err(e);
            }
        };
        // `stream` moves into the child's stdin; our copy closes when the Command is dropped.
        let consumer = Command::new(program)
            .args(args)
            .current_dir(root)
            .stdin(Stdio::from(stream))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();
        let consumer = match consumer {
            Ok(child) => child,
            Err(source) => {
                reap(&mut producer);
                return Err(HarnessError::Spawn {
                    program: program.to_string(),
                    source,
                });
            }
        };

        tracing::debug!(producer = producer.id(), consumer = consumer.id(), "spawned pipeline");
        Ok(Self { producer, consumer })
    }

    /// Hand out the interpreter's output streams.
    pub(super) fn take_outputs(&mut self) -> Result<(ChildStdout, ChildStderr), HarnessError> {
        match (self.consumer.stdout.take(), self.consumer.stderr.take()) {
            (Some(out), Some(err)) => Ok((out, err)),
            _ => Err(HarnessError::Wire("interpreter output streams unavailable".to_string())),
        }
    }

    /// Poll both children until they exit or `deadline` passes.
    ///
    /// Returns the interpreter's exit status. On timeout both children are killed and reaped.
    pub(super) fn wait(&mut self, deadline: &Deadline, poll_interval: Duration) -> Result<ExitStatus, HarnessError> {
        let mut consumer_status = None;
        loop {
            if consumer_status.is_none() {
                consumer_status = self.consumer.try_wait().map_err(HarnessError::Wait)?;
            }
            let producer_done = self.producer.try_wait().map_err(HarnessError::Wait)?.is_some();
            if let (Some(status), true) = (consumer_status, producer_done) {
                return Ok(status);
            }
            if deadline.expired() {
                self.kill_all();
                return Err(deadline.error());
            }
            thread::sleep(poll_interval);
        }
    }

    fn kill_all(&mut self) {
        reap(&mut self.consumer);
        reap(&mut self.producer);
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.kill_all();
    }
}

/// Kill a child if it is still running, then wait for it.
fn reap(child: &mut Child) {
    if let Ok(None) = child.try_wait() {
        let _ = child.kill();
        let _ = child.wait();
    }
}

fn split(command: &[String]) -> Result<(&str, &[String]), HarnessError> {
    match command.split_first() {
        Some((program, args)) => Ok((program.as_str(), args)),
        None => Err(HarnessError::Wire("empty command line".to_string())),
    }
}

/// Wall-clock limit shared by the child polling and the output readers.
pub(super) struct Deadline {
    at: Instant,
    timeout: Duration,
}

impl Deadline {
    pub(super) fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
            timeout,
        }
    }

    fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    fn expired(&self) -> bool {
        self.remaining().is_zero()
    }

    fn error(&self) -> HarnessError {
        HarnessError::Timeout {
            seconds: self.timeout.as_secs(),
        }
    }
}

/// Read a stream to the end on its own thread; the bytes arrive on the returned channel.
///
/// The thread is detached. A grandchild that inherited the pipe can keep it open after both
/// children exit, so the reader may outlive the run.
pub(super) fn drain<R: Read + Send + 'static>(mut stream: R) -> Receiver<io::Result<Vec<u8>>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let result = stream.read_to_end(&mut buf).map(|_| buf);
        let _ = tx.send(result);
    });
    rx
}

/// Collect a drained stream, giving up when `deadline` passes.
pub(super) fn collect(
    rx: &Receiver<io::Result<Vec<u8>>>,
    stream: &'static str,
    deadline: &Deadline,
) -> Result<Vec<u8>, HarnessError> {
    match rx.recv_timeout(deadline.remaining()) {
        Ok(Ok(bytes)) => Ok(bytes),
        Ok(Err(source)) => Err(HarnessError::Read { stream, source }),
        Err(RecvTimeoutError::Timeout) => {
            tracing::debug!(stream, "output still open after the weapp exited");
            Err(deadline.error())
        }
        Err(RecvTimeoutError::Disconnected) => Err(HarnessError::Read {
            stream,
            source: io::Error::other("reader thread panicked"),
        }),
    }
}
