//! PTY Process Spawning
//!
//! Starts a shell inside a pseudoterminal using portable-pty and bridges
//! its blocking I/O to async code with one reader and one writer thread.

use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::unbounded_channel;

use super::streams::PtyStreams;
use crate::error::{Error, Result};

/// Shell used when neither the config nor `$SHELL` names one
pub const FALLBACK_SHELL: &str = "/bin/sh";

/// A shell running in a PTY
pub struct SpawnedShell {
    /// Handle used to kill the shell
    pub child: Box<dyn Child + Send + Sync>,
    /// Master side; the PTY stays open while this is alive
    pub master: Box<dyn MasterPty + Send>,
    /// Async I/O channels
    pub streams: PtyStreams,
    /// Process id, if the platform reports one
    pub pid: Option<u32>,
}

impl std::fmt::Debug for SpawnedShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpawnedShell")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

/// Spawn `shell` in a new PTY of `cols` x `rows`, working in `working_directory`
pub fn spawn_shell(
    shell: &Path,
    working_directory: &Path,
    (cols, rows): (u16, u16),
) -> Result<SpawnedShell> {
    let shell_name = shell.display().to_string();
    let pty_system = native_pty_system();

    let pair = pty_system
        .openpty(PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        })
        .map_err(|e| Error::PtyCreationFailed {
            shell: shell_name.clone(),
            reason: e.to_string(),
        })?;

    let mut cmd_builder = CommandBuilder::new(shell);
    cmd_builder.cwd(working_directory);
    // Keep package-manager output plain where the tools honour it
    cmd_builder.env("TERM", "dumb");

    let child = pair
        .slave
        .spawn_command(cmd_builder)
        .map_err(|e| Error::CommandSpawnFailed {
            command: shell_name,
            reason: e.to_string(),
        })?;
    // Only the child holds the slave now, so the reader sees EOF when it exits
    drop(pair.slave);

    let pid = child.process_id();
    debug!("Spawned shell {} (pid {:?})", shell.display(), pid);

    let streams = create_pty_streams(pair.master.as_ref())?;

    Ok(SpawnedShell {
        child,
        master: pair.master,
        streams,
        pid,
    })
}

/// Bridge the PTY master to channels through blocking threads
fn create_pty_streams(master: &(dyn MasterPty + Send)) -> Result<PtyStreams> {
    let mut master_reader = master
        .try_clone_reader()
        .map_err(|e| Error::PtyReaderCloneFailed {
            reason: e.to_string(),
        })?;
    let mut master_writer = master
        .take_writer()
        .map_err(|e| Error::PtyWriterTakeFailed {
            reason: e.to_string(),
        })?;

    // PTY output -> async consumer
    let (tx_async_out, rx_async_out) = unbounded_channel::<Vec<u8>>();
    // async producer -> PTY writer thread
    let (tx_stdin, rx_stdin) = channel::<Vec<u8>>();

    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        let mut consecutive_errors = 0;
        const MAX_CONSECUTIVE_ERRORS: u32 = 5;

        loop {
            match master_reader.read(&mut buf) {
                Ok(0) => {
                    debug!("PTY read EOF - shell exited");
                    break;
                }
                Ok(n) => {
                    consecutive_errors = 0;
                    if tx_async_out.send(buf[..n].to_vec()).is_err() {
                        debug!("PTY read: receiver dropped, stopping reader thread");
                        break;
                    }
                }
                Err(e) => {
                    if e.kind() == std::io::ErrorKind::Interrupted {
                        continue;
                    }
                    if e.kind() == std::io::ErrorKind::WouldBlock {
                        thread::sleep(Duration::from_millis(10));
                        continue;
                    }

                    consecutive_errors += 1;
                    // EIO is the normal way a Linux PTY reports a closed slave
                    debug!(
                        "PTY read error ({}): {} (attempt {}/{})",
                        e.kind(),
                        e,
                        consecutive_errors,
                        MAX_CONSECUTIVE_ERRORS
                    );

                    if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                        warn!("PTY read: too many consecutive errors, stopping reader thread");
                        break;
                    }
                    thread::sleep(Duration::from_millis(50));
                }
            }
        }
        debug!("PTY reader thread exiting");
    });

    thread::spawn(move || {
        let mut consecutive_errors = 0;
        const MAX_CONSECUTIVE_ERRORS: u32 = 3;

        while let Ok(data) = rx_stdin.recv() {
            let mut attempts = 0;
            const MAX_ATTEMPTS: u32 = 3;

            loop {
                match master_writer.write_all(&data) {
                    Ok(()) => {
                        consecutive_errors = 0;
                        if let Err(e) = master_writer.flush() {
                            debug!("PTY flush error: {}", e);
                        }
                        break;
                    }
                    Err(e) => {
                        attempts += 1;

                        if e.kind() == std::io::ErrorKind::Interrupted {
                            continue;
                        }
                        if e.kind() == std::io::ErrorKind::WouldBlock && attempts < MAX_ATTEMPTS {
                            thread::sleep(Duration::from_millis(10));
                            continue;
                        }

                        consecutive_errors += 1;
                        warn!(
                            "PTY write error ({}): {} (consecutive errors: {}/{})",
                            e.kind(),
                            e,
                            consecutive_errors,
                            MAX_CONSECUTIVE_ERRORS
                        );

                        if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                            error!("PTY write: too many consecutive errors, stopping writer thread");
                            return;
                        }
                        break;
                    }
                }
            }
        }
        debug!("PTY writer thread exiting");
    });

    Ok(PtyStreams::from_channels(rx_async_out, tx_stdin))
}

/// The user's shell: `$SHELL`, else [`FALLBACK_SHELL`]
pub fn get_user_shell() -> PathBuf {
    std::env::var_os("SHELL")
        .filter(|shell| !shell.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(FALLBACK_SHELL))
}
