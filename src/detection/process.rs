// Bounded external process execution
// Drains stdout/stderr on reader threads; the deadline covers both the child's exit
// and the pipes closing, and a timeout kills the child's whole process group.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use super::DetectionFailure;
use crate::constants::PROCESS_POLL_INTERVAL_MS;

#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone, Copy)]
enum Pipe {
    Stdout,
    Stderr,
}

/// Run `command` to completion or until `timeout` elapses.
/// On timeout the child and everything in its process group are killed.
pub fn run_with_timeout(command: &mut Command, timeout: Duration) -> Result<ProcessOutput, DetectionFailure> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // Helpers the evaluator starts join this group and die with it
        command.process_group(0);
    }

    let mut child = command.spawn()?;
    let deadline = Instant::now() + timeout;

    let (tx, rx) = mpsc::channel();
    spawn_reader(child.stdout.take(), Pipe::Stdout, tx.clone());
    spawn_reader(child.stderr.take(), Pipe::Stderr, tx);

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(e) => {
                kill_tree(&mut child);
                return Err(e.into());
            }
        }

        if Instant::now() >= deadline {
            kill_tree(&mut child);
            return Err(DetectionFailure::Timeout(timeout));
        }

        thread::sleep(Duration::from_millis(PROCESS_POLL_INTERVAL_MS));
    };

    // A background grandchild can keep the pipes open after the child exits
    let mut stdout = String::new();
    let mut stderr = String::new();
    for _ in 0..2 {
        match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok((Pipe::Stdout, text)) => stdout = text,
            Ok((Pipe::Stderr, text)) => stderr = text,
            Err(RecvTimeoutError::Timeout) => {
                kill_group(&child);
                return Err(DetectionFailure::Timeout(timeout));
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(ProcessOutput { status, stdout, stderr })
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>, which: Pipe, tx: Sender<(Pipe, String)>) {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        // Receiver is gone once the caller has timed out
        let _ = tx.send((which, String::from_utf8_lossy(&buf).into_owned()));
    });
}

fn kill_tree(child: &mut Child) {
    kill_group(child);
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn kill_group(child: &Child) {
    let Ok(pgid) = libc::pid_t::try_from(child.id()) else {
        return;
    };
    if pgid <= 0 {
        return;
    }
    // SAFETY: kill(2) takes no pointers; a negative pid addresses the process
    // group created for this child by `process_group(0)`.
    unsafe {
        libc::kill(-pgid, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_group(_child: &Child) {}
