//! Signal plumbing for pipeline teardown.

use nix::sys::signal;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use crate::error;

/// Installs a SIGINT handler that sweeps child processes, so an interrupt at
/// the prompt leaves no pipeline running. The handler restricts itself to
/// async-signal-safe calls (non-blocking wait and signal delivery).
pub fn install_sigint_sweep() -> Result<(), error::Error> {
    let action = signal::SigAction::new(
        signal::SigHandler::Handler(on_sigint),
        signal::SaFlags::SA_RESTART,
        signal::SigSet::empty(),
    );

    // SAFETY: the handler only performs reentrant operations (waitpid with
    // WNOHANG and kill).
    unsafe {
        signal::sigaction(signal::Signal::SIGINT, &action)?;
    }

    Ok(())
}

extern "C" fn on_sigint(_signo: nix::libc::c_int) {
    sweep_stray_children();
}

/// Non-blockingly reaps every waitable child, sending SIGKILL to each
/// candidate as it is collected. Returns once no further children are
/// immediately waitable.
pub fn sweep_stray_children() {
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) | Err(_) => break,
            Ok(status) => {
                if let Some(pid) = status.pid() {
                    let _ = signal::kill(pid, signal::Signal::SIGKILL);
                }
            }
        }
    }
}
