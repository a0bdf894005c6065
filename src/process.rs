// SPDX-License-Identifier: GPL-2.0
//
// GhostBrew Keys - Agent Process Invocation
//
// Runs the trust-store agent with a bounded wait. A timed out or
// interrupted child is terminated (SIGTERM, then SIGKILL) and reported as
// an error.
//
// Copyright (C) 2025-2026 ghostkellz <ckelley@ghostkellz.sh>

use log::{debug, warn};
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{KeyError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const TERM_GRACE: Duration = Duration::from_secs(2);

/// Shared cancellation flag, set from a signal handler
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    triggered: Arc<AtomicBool>,
    /// Set while blocked reading the user's answer
    prompting: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::Relaxed);
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::Relaxed)
    }

    /// Mark the caller as waiting on the user until the guard is dropped
    pub fn prompting(&self) -> PromptGuard<'_> {
        self.prompting.store(true, Ordering::Relaxed);
        PromptGuard(self)
    }

    /// A blocking read cannot observe the flag, so the handler has to end
    /// the process itself while this is true.
    pub fn is_prompting(&self) -> bool {
        self.prompting.load(Ordering::Relaxed)
    }
}

pub struct PromptGuard<'a>(&'a Interrupt);

impl Drop for PromptGuard<'_> {
    fn drop(&mut self) {
        self.0.prompting.store(false, Ordering::Relaxed);
    }
}

/// How the agent's stdio is wired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Discard everything (presence queries)
    Quiet,
    /// Share the terminal (imports show gpg progress)
    Inherit,
}

/// Run `binary args...` and return its exit status
pub fn run_agent(
    binary: &str,
    args: &[String],
    timeout: Duration,
    interrupt: &Interrupt,
    output: Output,
) -> Result<ExitStatus> {
    debug!("Running {} {}", binary, args.join(" "));

    let mut cmd = Command::new(binary);
    cmd.args(args);
    match output {
        Output::Quiet => {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        }
        Output::Inherit => {
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }
    }

    let mut child = cmd.spawn().map_err(|source| KeyError::AgentUnavailable {
        binary: binary.to_string(),
        source,
    })?;

    let started = Instant::now();
    loop {
        let waited = child
            .try_wait()
            .map_err(|source| KeyError::AgentUnavailable {
                binary: binary.to_string(),
                source,
            })?;
        if let Some(status) = waited {
            debug!("{} exited with {}", binary, status);
            return Ok(status);
        }

        if interrupt.is_triggered() {
            warn!("Interrupted, stopping {}", binary);
            terminate(&mut child);
            return Err(KeyError::Interrupted);
        }

        if started.elapsed() >= timeout {
            warn!("{} timed out after {:?}", binary, timeout);
            terminate(&mut child);
            return Err(KeyError::AgentTimeout {
                binary: binary.to_string(),
                timeout,
            });
        }

        thread::sleep(POLL_INTERVAL);
    }
}

fn terminate(child: &mut Child) {
    let pid = Pid::from_raw(child.id() as i32);
    if let Err(e) = signal::kill(pid, Signal::SIGTERM) {
        debug!("SIGTERM to {} failed: {}", pid, e);
    }

    let deadline = Instant::now() + TERM_GRACE;
    while Instant::now() < deadline {
        if let Ok(Some(_)) = child.try_wait() {
            return;
        }
        thread::sleep(POLL_INTERVAL);
    }

    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exit_status_is_returned() {
        let interrupt = Interrupt::new();
        let ok = run_agent("true", &[], Duration::from_secs(5), &interrupt, Output::Quiet).unwrap();
        assert!(ok.success());

        let failed =
            run_agent("false", &[], Duration::from_secs(5), &interrupt, Output::Quiet).unwrap();
        assert!(!failed.success());
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let err = run_agent(
            "/nonexistent/ghostbrew-keys-agent",
            &[],
            Duration::from_secs(1),
            &Interrupt::new(),
            Output::Quiet,
        )
        .unwrap_err();
        assert!(matches!(err, KeyError::AgentUnavailable { .. }));
    }

    #[test]
    fn test_timeout_kills_child() {
        let started = Instant::now();
        let err = run_agent(
            "sleep",
            &args(&["30"]),
            Duration::from_millis(100),
            &Interrupt::new(),
            Output::Quiet,
        )
        .unwrap_err();
        assert!(matches!(err, KeyError::AgentTimeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_prompt_guard_resets() {
        let interrupt = Interrupt::new();
        {
            let _guard = interrupt.prompting();
            assert!(interrupt.clone().is_prompting());
        }
        assert!(!interrupt.is_prompting());
    }

    #[test]
    fn test_interrupt_is_an_error() {
        let interrupt = Interrupt::new();
        interrupt.trigger();
        let err = run_agent(
            "sleep",
            &args(&["30"]),
            Duration::from_secs(30),
            &interrupt,
            Output::Quiet,
        )
        .unwrap_err();
        assert!(matches!(err, KeyError::Interrupted));
    }
}
