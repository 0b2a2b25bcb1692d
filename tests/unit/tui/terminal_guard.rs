use super::*;
use std::sync::Mutex;

#[derive(Default)]
struct RecordingMode {
    calls: Mutex<Vec<&'static str>>,
}

impl ScreenMode for RecordingMode {
    fn enter(&self) -> io::Result<()> {
        self.calls.lock().unwrap().push("enter");
        Ok(())
    }

    fn leave(&self) -> io::Result<()> {
        self.calls.lock().unwrap().push("leave");
        Ok(())
    }
}

struct FailingMode;

impl ScreenMode for FailingMode {
    fn enter(&self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "not a tty"))
    }

    fn leave(&self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn guard_leaves_screen_on_drop() {
    let mode = Arc::new(RecordingMode::default());
    {
        let _guard = TerminalGuard::with_mode(mode.clone()).unwrap();
    }
    assert_eq!(&*mode.calls.lock().unwrap(), &["enter", "leave"]);
}

#[test]
fn restore_runs_once_across_handles() {
    let mode = Arc::new(RecordingMode::default());
    let guard = TerminalGuard::with_mode(mode.clone()).unwrap();
    let handle = guard.restore_handle();

    assert!(!handle.is_restored());
    handle.restore().unwrap();
    handle.clone().restore().unwrap();
    assert!(handle.is_restored());
    drop(guard);

    assert_eq!(&*mode.calls.lock().unwrap(), &["enter", "leave"]);
}

#[test]
fn failed_enter_yields_no_guard() {
    assert!(TerminalGuard::with_mode(Arc::new(FailingMode)).is_err());
}

#[test]
fn shutdown_flag_is_shared_between_clones() {
    let flag = ShutdownFlag::new();
    let other = flag.clone();
    assert!(!flag.is_requested());
    other.request();
    assert!(flag.is_requested());
}

#[test]
fn signal_exit_codes_follow_shell_convention() {
    assert_eq!(exit_code_for_signal(2), 130);
    assert_eq!(exit_code_for_signal(15), 143);
}
