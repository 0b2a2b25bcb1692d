//! Terminal clipboard through OSC 52 escape sequences.
//!
//! The host terminal owns the clipboard, so this works over ssh and inside
//! multiplexers as long as the terminal honours OSC 52.

use std::fmt;
use std::io::{self, Write};

/// Payloads above this are refused; several terminals silently drop longer
/// sequences.
pub const MAX_CLIPBOARD_BYTES: usize = 64 * 1024;

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    TooLarge { bytes: usize },
    Io(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::TooLarge { bytes } => write!(
                f,
                "code is too large for the terminal clipboard ({} KB, limit {} KB)",
                bytes.div_ceil(1024),
                MAX_CLIPBOARD_BYTES / 1024
            ),
            ClipboardError::Io(e) => write!(f, "clipboard write failed: {e}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// How the sequence must be wrapped to reach the outer terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Passthrough {
    #[default]
    Direct,
    Tmux,
    Screen,
}

impl Passthrough {
    pub fn detect() -> Self {
        Self::from_env(|key| std::env::var_os(key).is_some())
    }

    pub fn from_env(has_var: impl Fn(&str) -> bool) -> Self {
        if has_var("TMUX") {
            Passthrough::Tmux
        } else if has_var("STY") {
            Passthrough::Screen
        } else {
            Passthrough::Direct
        }
    }

    fn wrap(self, osc: &str) -> String {
        match self {
            Passthrough::Direct => osc.to_string(),
            // ESC inside the DCS body must be doubled for tmux.
            Passthrough::Tmux => format!("\x1bPtmux;{}\x1b\\", osc.replace('\x1b', "\x1b\x1b")),
            Passthrough::Screen => format!("\x1bP{osc}\x1b\\"),
        }
    }
}

pub fn encode_sequence(text: &str, passthrough: Passthrough) -> Result<String, ClipboardError> {
    let bytes = text.as_bytes();
    if bytes.len() > MAX_CLIPBOARD_BYTES {
        return Err(ClipboardError::TooLarge { bytes: bytes.len() });
    }
    let osc = format!("\x1b]52;c;{}\x07", base64(bytes));
    Ok(passthrough.wrap(&osc))
}

pub struct Clipboard<W: Write> {
    out: W,
    passthrough: Passthrough,
}

impl Clipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), Passthrough::detect())
    }
}

impl<W: Write> Clipboard<W> {
    pub fn new(out: W, passthrough: Passthrough) -> Self {
        Self { out, passthrough }
    }

    /// Sends `text` to the terminal clipboard and returns the payload size.
    pub fn copy(&mut self, text: &str) -> Result<usize, ClipboardError> {
        let seq = encode_sequence(text, self.passthrough)?;
        self.out
            .write_all(seq.as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| ClipboardError::Io(e.to_string()))?;
        Ok(text.len())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn base64(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let mut group = [0u8; 3];
        group[..chunk.len()].copy_from_slice(chunk);
        let n = u32::from_be_bytes([0, group[0], group[1], group[2]]);
        for i in 0..4 {
            if i <= chunk.len() {
                let index = (n >> (18 - 6 * i)) & 0x3f;
                out.push(BASE64[index as usize] as char);
            } else {
                out.push('=');
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/tui/clipboard.rs"]
mod tests;
