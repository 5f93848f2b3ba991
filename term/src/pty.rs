//! The `[PTY]` component: pseudo-terminal allocation, the reader/writer
//! routines, resize, and shutdown.
//!
//! Grounded in `pty.c`'s `setuppty`/`readfrompty`/`writetopty`/`termwrite`
//! from the source this engine's spec was distilled from: `forkpty` to
//! spawn the child behind a pty, a static carry buffer across reads so a
//! UTF-8 sequence split across two `read()`s is reassembled before
//! decoding, a 256-byte write limit per `write()` call, and CR+LF
//! splitting on the way out when `TermMode::CR_AND_LF` is set.
//!
//! The master fd is shared (via `Arc`) between a [`PtyReader`], owned by
//! the PTY reader thread, and a [`PtyWriter`], owned by the main/UI thread
//! that forwards keystrokes — matching the supervisor's three-thread model
//! where reads and user-originated writes happen on different threads
//! without any lock on the fd itself.

use std::ffi::CString;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd};
use std::sync::Arc;

use nix::pty::{forkpty, ForkptyResult, Winsize};
use nix::sys::select::{select, FdSet};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{execvp, pipe, read, write, Pid};

use crate::codec::decode_all;
use crate::error::{Result, TermError};

/// Per-`write()` byte limit mirrored from the source's `writetopty`, which
/// caps each `write(2)` at 256 bytes so a child that stops reading its
/// stdin cannot make a single write() call block indefinitely.
const WRITE_LIMIT: usize = 256;
const READ_BUF_SIZE: usize = 4096;

/// Everything `spawn` produces: the child's pid, a reader half
/// for the PTY reader thread, a writer half for the main/UI thread, and a
/// shutdown handle the supervisor can signal from either.
pub struct PtyHandle {
    pub child: Pid,
    pub reader: PtyReader,
    pub writer: PtyWriter,
    pub shutdown: ShutdownHandle,
}

#[derive(Clone)]
pub struct ShutdownHandle {
    write: Arc<OwnedFd>,
}

impl ShutdownHandle {
    /// Wake a blocked `PtyReader::wait_readable`. Idempotent enough to call
    /// from a signal-driven cleanup path as well as normal EOF handling.
    pub fn signal(&self) {
        let _ = write(self.write.as_fd(), &[0u8]);
    }
}

pub struct PtyReader {
    master: Arc<OwnedFd>,
    shutdown_read: Arc<OwnedFd>,
    /// Bytes read but not yet consumed as complete scalar values — the
    /// carry buffer for a UTF-8 sequence split across reads.
    carry: Vec<u8>,
}

pub struct PtyWriter {
    master: Arc<OwnedFd>,
}

pub fn spawn(argv: &[String], rows: u16, cols: u16) -> Result<PtyHandle> {
    let winsize = Winsize { ws_row: rows, ws_col: cols, ws_xpixel: 0, ws_ypixel: 0 };

    // SAFETY: the child branch only calls an async-signal-safe exec before
    // replacing itself; no allocation happens there.
    let fork_result =
        unsafe { forkpty(Some(&winsize), None) }.map_err(|e| TermError::PtySetup(e.into()))?;

    match fork_result {
        ForkptyResult::Parent { child, master } => {
            let (shutdown_read, shutdown_write) =
                pipe().map_err(|e| TermError::PtySetup(e.into()))?;
            let master = Arc::new(master);
            let shutdown_read = Arc::new(shutdown_read);
            Ok(PtyHandle {
                child,
                reader: PtyReader { master: master.clone(), shutdown_read, carry: Vec::new() },
                writer: PtyWriter { master },
                shutdown: ShutdownHandle { write: Arc::new(shutdown_write) },
            })
        }
        ForkptyResult::Child => {
            let prog = CString::new(argv[0].as_bytes()).expect("argv has no interior NUL");
            let args: Vec<CString> =
                argv.iter().map(|a| CString::new(a.as_bytes()).unwrap()).collect();
            let _ = execvp(&prog, &args);
            // execvp only returns on failure; there is no sensible way to
            // report that back up a torn-off child process, so exit
            // immediately instead of unwinding a forked Rust stack.
            std::process::exit(127);
        }
    }
}

impl PtyReader {
    fn master_fd(&self) -> BorrowedFd<'_> {
        self.master.as_fd()
    }

    /// Block until either the pty master or the shutdown pipe is readable.
    /// Returns `true` if the master has data, `false` if shutdown was
    /// requested.
    pub fn wait_readable(&self) -> Result<bool> {
        let mut fds = FdSet::new();
        fds.insert(self.master_fd());
        fds.insert(self.shutdown_read.as_fd());
        select(None, &mut fds, None, None, None).map_err(|e| TermError::Read(e.into()))?;
        if fds.contains(self.shutdown_read.as_fd()) {
            return Ok(false);
        }
        Ok(fds.contains(self.master_fd()))
    }

    /// Read one batch from the pty, decode as many complete scalar values
    /// as possible, and hand each to `on_char`. Incomplete trailing UTF-8
    /// bytes are retained in `self.carry` for the next call. Returns
    /// `Ok(false)` on EOF (child exited).
    pub fn read_once(&mut self, mut on_char: impl FnMut(u32)) -> Result<bool> {
        let mut buf = [0u8; READ_BUF_SIZE];
        let n =
            read(self.master_fd().as_raw_fd(), &mut buf).map_err(|e| TermError::Read(e.into()))?;
        if n == 0 {
            return Ok(false);
        }

        self.carry.extend_from_slice(&buf[..n]);

        let mut chars = Vec::new();
        let consumed = decode_all(&self.carry, &mut chars);
        for c in &chars {
            on_char(*c as u32);
        }
        self.carry.drain(..consumed);
        Ok(true)
    }

    /// Write a parser-generated reply (DA/DSR/CPR) directly from the
    /// reader thread, bypassing CR+LF translation, per spec: "Replies
    /// generated by the parser bypass this translation."
    pub fn write_reply(&mut self, mut buf: &[u8]) -> Result<()> {
        while !buf.is_empty() {
            let chunk = &buf[..buf.len().min(WRITE_LIMIT)];
            match write(self.master_fd(), chunk) {
                Ok(n) => buf = &buf[n..],
                Err(nix::errno::Errno::EINTR) => continue,
                Err(e) => return Err(TermError::Write(e.into())),
            }
        }
        Ok(())
    }
}

impl PtyWriter {
    fn master_fd(&self) -> BorrowedFd<'_> {
        self.master.as_fd()
    }

    /// Write `buf` to the child, respecting the 256-byte per-call limit.
    /// EINTR is retried in place; any other error is fatal.
    pub fn write_raw(&mut self, mut buf: &[u8]) -> Result<()> {
        while !buf.is_empty() {
            let chunk = &buf[..buf.len().min(WRITE_LIMIT)];
            match write(self.master_fd(), chunk) {
                Ok(n) => buf = &buf[n..],
                Err(nix::errno::Errno::EINTR) => continue,
                Err(e) => return Err(TermError::Write(e.into())),
            }
        }
        Ok(())
    }

    /// `termwrite`: split on embedded `\r` and emit a literal `\r\n` for
    /// each one, matching `pty.c`'s loop exactly. When `cr_and_lf` is
    /// false (the mode bit is off), the buffer goes out unmodified.
    pub fn write_user_input(&mut self, buf: &[u8], cr_and_lf: bool) -> Result<()> {
        if !cr_and_lf {
            return self.write_raw(buf);
        }
        let mut rest = buf;
        while !rest.is_empty() {
            if rest[0] == b'\r' {
                self.write_raw(b"\r\n")?;
                rest = &rest[1..];
            } else {
                let next_cr = rest.iter().position(|&b| b == b'\r').unwrap_or(rest.len());
                self.write_raw(&rest[..next_cr])?;
                rest = &rest[next_cr..];
            }
        }
        Ok(())
    }

    /// Replies the parser queued (DA/DSR/CPR) bypass CR+LF translation,
    /// per spec: "Replies generated by the parser bypass this
    /// translation."
    pub fn write_reply(&mut self, buf: &[u8]) -> Result<()> {
        self.write_raw(buf)
    }

    pub fn resize(&mut self, rows: u16, cols: u16) -> Result<()> {
        let winsize = Winsize { ws_row: rows, ws_col: cols, ws_xpixel: 0, ws_ypixel: 0 };
        // SAFETY: TIOCSWINSZ's argument is a `Winsize` by value through a
        // pointer; the fd is a valid, open pty master for the lifetime of
        // this call.
        let res = unsafe { libc::ioctl(self.master_fd().as_raw_fd(), libc::TIOCSWINSZ, &winsize) };
        if res != 0 {
            return Err(TermError::Resize(std::io::Error::last_os_error()));
        }
        Ok(())
    }
}

pub fn reap(child: Pid) -> Option<WaitStatus> {
    waitpid(child, None).ok()
}
