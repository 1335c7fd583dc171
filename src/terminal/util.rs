//! Terminal utilities

use crate::{Result, VoiceActionsError};
use log::debug;
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::libc;
use nix::sys::termios::{cfmakeraw, tcgetattr, tcsetattr, SetArg, Termios};
use std::io::{self, Read};
use std::os::unix::io::{AsRawFd, RawFd};

/// Get the terminal size for the given file descriptor
///
/// Falls back to 80x24 when the size cannot be read.
pub fn get_terminal_size(fd: RawFd) -> (u16, u16) {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };

    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        (ws.ws_col, ws.ws_row)
    } else {
        (80, 24)
    }
}

/// Is stdin an interactive terminal?
pub fn stdin_is_tty() -> bool {
    unsafe { libc::isatty(io::stdin().as_raw_fd()) == 1 }
}

/// RAII guard holding stdin in raw, non-blocking mode
///
/// Raw mode delivers every key press immediately, including control
/// keys. Non-blocking reads let the event loop drain stdin completely
/// after each edge-triggered wakeup. The original attributes and file
/// flags are restored on drop, even if the program is unwinding; the
/// shell shares this file description.
pub struct RawModeGuard {
    original: Termios,
    original_flags: OFlag,
}

impl RawModeGuard {
    /// Put stdin into raw, non-blocking mode
    pub fn enable() -> Result<Self> {
        let stdin = io::stdin();
        let original = tcgetattr(&stdin)
            .map_err(|e| VoiceActionsError::Terminal(format!("tcgetattr failed: {}", e)))?;

        let fd = stdin.as_raw_fd();
        let original_flags = fcntl(fd, FcntlArg::F_GETFL)
            .map(OFlag::from_bits_truncate)
            .map_err(|e| VoiceActionsError::Terminal(format!("F_GETFL failed: {}", e)))?;

        let mut raw = original.clone();
        cfmakeraw(&mut raw);
        tcsetattr(&stdin, SetArg::TCSANOW, &raw)
            .map_err(|e| VoiceActionsError::Terminal(format!("tcsetattr failed: {}", e)))?;

        // From here on Drop undoes the raw mode if setting the flags fails
        let guard = Self {
            original,
            original_flags,
        };
        fcntl(fd, FcntlArg::F_SETFL(original_flags | OFlag::O_NONBLOCK))
            .map_err(|e| VoiceActionsError::Terminal(format!("F_SETFL failed: {}", e)))?;

        debug!("Terminal in raw mode");
        Ok(guard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let stdin = io::stdin();
        let _ = fcntl(stdin.as_raw_fd(), FcntlArg::F_SETFL(self.original_flags));
        let _ = tcsetattr(&stdin, SetArg::TCSANOW, &self.original);
        debug!("Terminal attributes restored");
    }
}

/// Drain everything readable from non-blocking stdin
///
/// The poll is edge-triggered, so anything left unread would wait for
/// the next key press. Also reports whether end of input was reached.
pub fn read_pending(stdin: &mut impl Read) -> Result<(Vec<u8>, bool)> {
    let mut input = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        match stdin.read(&mut buf) {
            Ok(0) => return Ok((input, true)),
            Ok(n) => input.extend_from_slice(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok((input, false)),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}
