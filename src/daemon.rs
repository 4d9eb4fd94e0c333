//! Optional daemonization
//!
//! Detaches from the controlling terminal and session, then pauses so a
//! physical cable (serial console, USB) can be swapped before fuzzing
//! begins. Must be called before any thread is spawned.

use crate::error::DaemonError;
use std::thread;
use std::time::Duration;
use tracing::info;

/// daemon(3) with chdir to `/` and stdio to `/dev/null`, then sleep `settle`
pub fn detach(settle: Duration) -> Result<(), DaemonError> {
    info!("Daemonizing");

    nix::unistd::daemon(false, false)?;

    thread::sleep(settle);
    Ok(())
}
