//! Scripted stand-ins for the host: no vendor tool is ever executed in tests.
#![allow(dead_code)]

use gpustat::probe::Probe;
use gpustat::procs::ProcessTable;
use gpustat::runner::{CommandRunner, PollPolicy, RunOutcome};
use gpustat::Host;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

/// Replies keyed on the command name and a fragment of its argument string.
#[derive(Default)]
pub struct FakeRunner {
    replies: Vec<(String, String, RunOutcome)>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, command: &str, arg_fragment: &str, outcome: RunOutcome) -> Self {
        self.replies
            .push((command.to_string(), arg_fragment.to_string(), outcome));
        self
    }

    pub fn text(self, command: &str, arg_fragment: &str, text: &str) -> Self {
        self.reply(command, arg_fragment, RunOutcome::Captured(text.to_string()))
    }

    fn answer(&self, command: &str, argument: &str) -> RunOutcome {
        self.calls.borrow_mut().push(format!("{command} {argument}"));
        self.replies
            .iter()
            .find(|(c, frag, _)| command.ends_with(c.as_str()) && argument.contains(frag.as_str()))
            .map(|(_, _, outcome)| outcome.clone())
            .unwrap_or_else(|| RunOutcome::Captured(String::new()))
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &str, argument: &str, _escape: bool) -> RunOutcome {
        self.answer(command, argument)
    }

    fn run_polled(&self, command: &str, argument: &str, _policy: PollPolicy) -> RunOutcome {
        self.answer(command, argument)
    }
}

#[derive(Default)]
pub struct FakeProbe(HashSet<String>);

impl FakeProbe {
    pub fn with(utilities: &[&str]) -> Self {
        Self(utilities.iter().map(|u| u.to_string()).collect())
    }
}

impl Probe for FakeProbe {
    fn is_available(&self, utility: &str) -> bool {
        self.0.contains(utility)
    }
}

#[derive(Default)]
pub struct FakeProcs(HashMap<u32, String>);

impl FakeProcs {
    pub fn with(entries: &[(u32, &str)]) -> Self {
        Self(entries.iter().map(|(pid, cmd)| (*pid, cmd.to_string())).collect())
    }
}

impl ProcessTable for FakeProcs {
    fn cmdline(&self, pid: u32) -> Option<String> {
        self.0.get(&pid).cloned()
    }
}

pub fn host<'a>(runner: &'a FakeRunner, probe: &'a FakeProbe, procs: &'a FakeProcs) -> Host<'a> {
    Host {
        runner,
        probe,
        procs,
    }
}
