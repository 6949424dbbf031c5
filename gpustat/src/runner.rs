//! Subprocess execution for vendor tools.
//!
//! Commands go through `sh -c` because several call sites embed `2>&1` or `| grep ...`
//! in their argument string; escaping is therefore chosen per call site.

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// What came back from a vendor command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Process exited (or finished the line the policy waits for) and this is its stdout.
    Captured(String),
    /// Poll budget ran out; whatever was written before the forced close.
    TimedOut(String),
    /// The process could not be spawned.
    SpawnFailed(String),
}

impl RunOutcome {
    /// Captured text, if a process ran at all. Empty text is the caller's "no data" signal.
    pub fn output(&self) -> Option<&str> {
        match self {
            RunOutcome::Captured(s) | RunOutcome::TimedOut(s) => Some(s),
            RunOutcome::SpawnFailed(_) => None,
        }
    }
}

/// Poll schedule for tools that stream until killed (radeontop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
    /// Output is complete once a line containing this token has ended.
    /// `None` accepts the first complete line of any kind.
    pub ready_after: Option<&'static str>,
}

impl PollPolicy {
    /// Policy that skips preamble lines until one carrying `token` is finished.
    pub fn until_line_with(token: &'static str) -> Self {
        Self {
            ready_after: Some(token),
            ..Self::default()
        }
    }

    pub fn is_ready(&self, captured: &[u8]) -> bool {
        let from = match self.ready_after {
            None => 0,
            Some(token) => match captured
                .windows(token.len().max(1))
                .position(|w| w == token.as_bytes())
            {
                Some(at) => at + token.len(),
                None => return false,
            },
        };
        captured[from..].contains(&b'\n')
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        // worst case ~1s before the forced close
        Self {
            interval: Duration::from_millis(100),
            max_attempts: 10,
            ready_after: None,
        }
    }
}

pub trait CommandRunner {
    /// Bounded-wait mode: run to exit and return stdout.
    fn run(&self, command: &str, argument: &str, escape: bool) -> RunOutcome;

    /// Poll-until-output mode: sample the pipe, then close it and kill the process regardless.
    fn run_polled(&self, command: &str, argument: &str, policy: PollPolicy) -> RunOutcome;
}

/// Single-quotes an argument for `sh`.
pub fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

pub fn command_line(command: &str, argument: &str, escape: bool) -> String {
    if argument.is_empty() {
        command.to_string()
    } else if escape {
        format!("{command} {}", shell_quote(argument))
    } else {
        format!("{command} {argument}")
    }
}

/// Runs vendor commands on the host through `sh`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, argument: &str, escape: bool) -> RunOutcome {
        let line = command_line(command, argument, escape);
        debug!(%line, "running vendor command");
        match Command::new("sh")
            .arg("-c")
            .arg(&line)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
        {
            Ok(out) => RunOutcome::Captured(String::from_utf8_lossy(&out.stdout).into_owned()),
            Err(e) => {
                warn!("failed to spawn `{line}`: {e}");
                RunOutcome::SpawnFailed(e.to_string())
            }
        }
    }

    fn run_polled(&self, command: &str, argument: &str, policy: PollPolicy) -> RunOutcome {
        // exec so the kill below reaches the tool itself, not just the shell
        let line = format!("exec {}", command_line(command, argument, false));
        debug!(%line, ?policy, "polling vendor command");
        let mut child = match Command::new("sh")
            .arg("-c")
            .arg(&line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(c) => c,
            Err(e) => {
                warn!("failed to spawn `{line}`: {e}");
                return RunOutcome::SpawnFailed(e.to_string());
            }
        };
        let Some(mut stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return RunOutcome::SpawnFailed("stdout pipe unavailable".into());
        };

        // Reads block until the tool flushes, so they happen off the polling thread.
        let (tx, rx) = mpsc::channel::<Vec<u8>>();
        thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match stdout.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        let mut captured: Vec<u8> = Vec::new();
        let mut done = false;
        for _ in 0..policy.max_attempts {
            thread::sleep(policy.interval);
            while let Ok(chunk) = rx.try_recv() {
                captured.extend_from_slice(&chunk);
            }
            if policy.is_ready(&captured) || matches!(child.try_wait(), Ok(Some(_))) {
                done = true;
                break;
            }
        }

        let _ = child.kill();
        let _ = child.wait();
        // pick up anything flushed right before the pipe closed
        while let Ok(chunk) = rx.recv_timeout(Duration::from_millis(20)) {
            captured.extend_from_slice(&chunk);
        }

        let text = String::from_utf8_lossy(&captured).into_owned();
        if done {
            RunOutcome::Captured(text)
        } else {
            debug!("poll budget exhausted for `{line}`");
            RunOutcome::TimedOut(text)
        }
    }
}
