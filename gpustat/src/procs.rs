//! Process table lookups used to tell apart applications sharing one GPU binary (ffmpeg & co).

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

pub trait ProcessTable {
    /// Full command line of `pid`, arguments joined by spaces.
    fn cmdline(&self, pid: u32) -> Option<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessTable;

impl ProcessTable for SystemProcessTable {
    fn cmdline(&self, pid: u32) -> Option<String> {
        let pid = Pid::from_u32(pid);
        let mut sys = System::new();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            false,
            ProcessRefreshKind::nothing().with_cmd(UpdateKind::Always),
        );
        let proc_ = sys.process(pid)?;
        let cmd = proc_
            .cmd()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ");
        if cmd.is_empty() {
            None
        } else {
            Some(cmd)
        }
    }
}
