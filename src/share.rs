//! Copy and share for the displayed quote. Best effort throughout.

use std::io::Write;
use std::process::{Command, Stdio};

use base64::Engine;
use tracing::{debug, warn};

use crate::error::ActionError;
use crate::models::Quote;

/// `"<text>" - <author>`, the form used for copy and share.
pub fn format_quote(quote: &Quote) -> String {
    if quote.author.is_empty() {
        format!("\"{}\"", quote.text)
    } else {
        format!("\"{}\" - {}", quote.text, quote.author)
    }
}

/// OSC 52 escape sequence for `text`, wrapped for tmux when `in_tmux`.
pub fn osc52_sequence(text: &str, in_tmux: bool) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text);
    if in_tmux {
        format!("\x1bPtmux;\x1b\x1b]52;c;{}\x07\x1b\\", encoded)
    } else {
        format!("\x1b]52;c;{}\x07", encoded)
    }
}

/// Copy text to the clipboard.
/// Tries OSC 52 first (works over ssh and in tmux), then native tools.
pub fn copy_to_clipboard(text: &str) -> Result<(), ActionError> {
    if try_osc52_copy(text) {
        return Ok(());
    }
    try_native_clipboard(text)
}

fn try_osc52_copy(text: &str) -> bool {
    let seq = osc52_sequence(text, std::env::var("TMUX").is_ok());
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(seq.as_bytes()).is_ok() && stdout.flush().is_ok()
}

/// Spawn `cmd` and write `text` to its stdin. True if it exited successfully.
fn pipe_to(cmd: &str, args: &[&str], text: &str) -> bool {
    let child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    let mut child = match child {
        Ok(c) => c,
        Err(e) => {
            debug!(%cmd, error = %e, "clipboard tool unavailable");
            return false;
        }
    };

    let written = child
        .stdin
        .take()
        .map(|mut stdin| stdin.write_all(text.as_bytes()).is_ok())
        .unwrap_or(false);
    let exited_ok = child.wait().map(|s| s.success()).unwrap_or(false);
    written && exited_ok
}

fn try_native_clipboard(text: &str) -> Result<(), ActionError> {
    if std::env::var("WAYLAND_DISPLAY").is_ok() && pipe_to("wl-copy", &[], text) {
        return Ok(());
    }

    let tools: [(&str, &[&str]); 3] = [
        ("xclip", &["-selection", "clipboard"]),
        ("xsel", &["--clipboard", "--input"]),
        ("pbcopy", &[]),
    ];
    if tools.iter().any(|(cmd, args)| pipe_to(cmd, args, text)) {
        return Ok(());
    }

    Err(ActionError::Clipboard(
        "No clipboard tool available".to_string(),
    ))
}

/// Copy the formatted quote to the clipboard.
pub fn copy_quote(quote: &Quote) -> Result<(), ActionError> {
    copy_to_clipboard(&format_quote(quote))
}

/// How a share request was fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareMethod {
    Command,
    Clipboard,
}

/// Pipe the formatted quote into `command` (run with `sh -c`).
///
/// Without a command, falls back to copying it to the clipboard.
pub fn share_quote(quote: &Quote, command: Option<&str>) -> Result<ShareMethod, ActionError> {
    let text = format_quote(quote);
    match command {
        Some(cmd) if !cmd.trim().is_empty() => {
            if pipe_to("sh", &["-c", cmd], &text) {
                Ok(ShareMethod::Command)
            } else {
                warn!(%cmd, "share command failed");
                Err(ActionError::Share(format!("command `{cmd}` failed")))
            }
        }
        _ => copy_to_clipboard(&text)
            .map(|()| ShareMethod::Clipboard)
            .map_err(|e| ActionError::Share(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_quote() {
        let q = Quote::new("Books are a uniquely portable magic.", "Stephen King", vec![]);
        assert_eq!(
            format_quote(&q),
            "\"Books are a uniquely portable magic.\" - Stephen King"
        );
        let anon = Quote::new("Anonymous words.", "", vec![]);
        assert_eq!(format_quote(&anon), "\"Anonymous words.\"");
    }

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(osc52_sequence("hi", false), "\x1b]52;c;aGk=\x07");
        assert_eq!(
            osc52_sequence("hi", true),
            "\x1bPtmux;\x1b\x1b]52;c;aGk=\x07\x1b\\"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_share_through_command() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("shared.txt");
        let cmd = format!("cat > '{}'", out.display());
        let q = Quote::new("Stay curious.", "Anon", vec![]);

        let method = share_quote(&q, Some(&cmd)).unwrap();
        assert_eq!(method, ShareMethod::Command);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "\"Stay curious.\" - Anon");
    }

    #[cfg(unix)]
    #[test]
    fn test_share_command_failure_is_share_error() {
        let q = Quote::new("Stay curious.", "Anon", vec![]);
        let err = share_quote(&q, Some("exit 3")).unwrap_err();
        assert!(matches!(err, ActionError::Share(_)));
    }
}
