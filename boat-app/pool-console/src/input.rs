//! Keyboard input for the thruster session.
//!
//! On a terminal, keys are read one at a time in raw mode. When stdin is not a
//! terminal (piped scripts), bytes are forwarded from a reader thread instead.

use std::{
    io::{self, Read},
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::Duration,
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};
use tracing::warn;

#[derive(Debug, PartialEq, Eq)]
pub enum KeyPoll {
    Key(char),
    Idle,
    Closed,
}

pub enum KeySource {
    Raw,
    Piped(mpsc::Receiver<char>),
}

impl KeySource {
    /// Enter raw mode, falling back to piped stdin.
    pub fn open() -> Self {
        match terminal::enable_raw_mode() {
            Ok(()) => KeySource::Raw,
            Err(e) => {
                warn!("raw terminal mode unavailable, reading stdin: {}", e);
                KeySource::Piped(spawn_stdin_reader())
            }
        }
    }

    /// Wait at most `timeout` for one key press.
    pub fn poll(
        &self,
        timeout: Duration,
    ) -> KeyPoll {
        match self {
            KeySource::Raw => poll_terminal(timeout),
            KeySource::Piped(rx) => match rx.recv_timeout(timeout) {
                Ok(key) => KeyPoll::Key(key),
                Err(RecvTimeoutError::Timeout) => KeyPoll::Idle,
                Err(RecvTimeoutError::Disconnected) => KeyPoll::Closed,
            },
        }
    }
}

impl Drop for KeySource {
    fn drop(&mut self) {
        if let KeySource::Raw = self {
            if let Err(e) = terminal::disable_raw_mode() {
                warn!("failed to restore terminal: {}", e);
            }
        }
    }
}

fn poll_terminal(timeout: Duration) -> KeyPoll {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return KeyPoll::Idle,
        Err(_) => return KeyPoll::Closed,
    }
    match event::read() {
        Ok(Event::Key(key)) => key_char(&key).map_or(KeyPoll::Idle, KeyPoll::Key),
        Ok(_) => KeyPoll::Idle,
        Err(_) => KeyPoll::Closed,
    }
}

/// Character of a key press; Ctrl-C reads as `q` since raw mode swallows SIGINT.
fn key_char(key: &KeyEvent) -> Option<char> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some('q'),
        KeyCode::Char(c) => Some(c),
        _ => None,
    }
}

/// Forward single bytes from stdin; the channel closes on EOF.
fn spawn_stdin_reader() -> mpsc::Receiver<char> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for byte in io::stdin().lock().bytes() {
            let Ok(byte) = byte else { break };
            if tx.send(byte as char).is_err() {
                break;
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_char() {
        let press = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::NONE);
        assert_eq!(key_char(&press), Some('w'));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_char(&ctrl_c), Some('q'));

        let release = KeyEvent::new_with_kind(
            KeyCode::Char('w'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert_eq!(key_char(&release), None);
        assert_eq!(key_char(&KeyEvent::new(KeyCode::Up, KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_piped_source_closes() {
        let (tx, rx) = mpsc::channel();
        let source = KeySource::Piped(rx);
        tx.send('d').unwrap();
        assert_eq!(source.poll(Duration::from_millis(1)), KeyPoll::Key('d'));
        assert_eq!(source.poll(Duration::from_millis(1)), KeyPoll::Idle);
        drop(tx);
        assert_eq!(source.poll(Duration::from_millis(1)), KeyPoll::Closed);
    }
}
