use thiserror::Error;

/// Errors surfaced by the terminal engine.
///
/// Per the engine's error-handling design, the parser and the grid never
/// produce one of these: malformed escape sequences and invalid UTF-8 are
/// absorbed locally (see `parser::Parser::advance`). `TermError` only covers
/// the PTY channel, where failures are either transient (retried in place)
/// or fatal (the caller unwinds).
#[derive(Debug, Error)]
pub enum TermError {
    #[error("failed to allocate a pseudo-terminal: {0}")]
    PtySetup(#[source] std::io::Error),

    #[error("failed to spawn child process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("write to pty master failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("read from pty master failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to resize pty: {0}")]
    Resize(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TermError>;
