//! Shell runner behavior against ordinary POSIX utilities.
use gpustat::runner::{command_line, shell_quote, CommandRunner, PollPolicy, RunOutcome, ShellRunner};
use gpustat::settings::DisplayToggles;
use gpustat::vendor::amd::{self, parse_radeontop};
use std::time::{Duration, Instant};

#[test]
fn quoting_neutralizes_shell_syntax() {
    assert_eq!(shell_quote("0c"), "'0c'");
    assert_eq!(shell_quote("a'b"), r"'a'\''b'");
    assert_eq!(command_line("echo", "$(id)", true), "echo '$(id)'");
    assert_eq!(command_line("lspci", "| grep VGA", false), "lspci | grep VGA");
    assert_eq!(command_line("sensors", "", false), "sensors");

    let out = ShellRunner.run("echo", "$(echo injected)", true);
    assert_eq!(out, RunOutcome::Captured("$(echo injected)\n".into()));
}

#[test]
fn bounded_mode_captures_stdout_only() {
    let out = ShellRunner.run("echo", "visible; echo hidden 1>&2", false);
    assert_eq!(out.output(), Some("visible\n"));
}

#[test]
fn polled_mode_waits_past_the_preamble_for_the_data_line() {
    let start = Instant::now();
    // radeontop-like: preamble first, data half a second later, then keeps the pipe open
    let tool = "-c 'echo Dumping to -, line limit 1.; sleep 0.5; \
                echo 1.0: bus 0c, gpu 3.33%, ee 0.00%, ta 2.50%; sleep 10'";
    let policy = PollPolicy {
        max_attempts: 25,
        ..PollPolicy::until_line_with("gpu")
    };
    let out = ShellRunner.run_polled("sh", tool, policy);
    assert!(start.elapsed() < Duration::from_secs(3));
    let text = match out {
        RunOutcome::Captured(text) => text,
        other => panic!("expected captured output, got {other:?}"),
    };
    assert!(text.starts_with("Dumping to -, line limit 1.\n"), "{text:?}");

    let mut r = amd::default_reading();
    parse_radeontop(&text, &DisplayToggles::default(), &mut r);
    assert!(r.errors().is_empty(), "{:?}", r.errors());
    assert_eq!(r.get_str("util"), Some("3.3%"));
    assert_eq!(r.get_str("texture"), Some("2.5%"));
}

#[test]
fn polled_mode_without_a_token_stops_at_first_line() {
    let policy = PollPolicy {
        interval: Duration::from_millis(50),
        max_attempts: 20,
        ready_after: None,
    };
    let start = Instant::now();
    let out = ShellRunner.run_polled("sh", "-c 'echo first; sleep 10'", policy);
    assert!(start.elapsed() < Duration::from_secs(3));
    assert_eq!(out, RunOutcome::Captured("first\n".into()));
}

#[test]
fn readiness_needs_a_finished_line_after_the_token() {
    let policy = PollPolicy::until_line_with("gpu");
    assert!(!policy.is_ready(b""));
    assert!(!policy.is_ready(b"Dumping to -, line limit 1.\n"));
    assert!(!policy.is_ready(b"Dumping to -, line limit 1.\n1.0: bus 0c, gpu 3.33%"));
    assert!(policy.is_ready(b"Dumping to -, line limit 1.\n1.0: bus 0c, gpu 3.33%, ta 2.50%\n"));
    assert!(PollPolicy::default().is_ready(b"Dumping to -, line limit 1.\n"));
}

#[test]
fn polled_mode_times_out_on_silent_tool() {
    let policy = PollPolicy {
        interval: Duration::from_millis(20),
        max_attempts: 5,
        ready_after: None,
    };
    let start = Instant::now();
    let out = ShellRunner.run_polled("sleep", "10", policy);
    assert!(start.elapsed() < Duration::from_secs(3));
    assert_eq!(out, RunOutcome::TimedOut(String::new()));
}
