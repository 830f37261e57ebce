use std::io::IsTerminal;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Cancels a scan when 'q' or Ctrl-C is pressed.
///
/// The terminal is in raw mode while the handle is alive.
pub struct InputHandle {
    stop: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl InputHandle {
    /// Starts listening, or returns `None` when stdin is not a terminal.
    pub fn start(cancel: CancellationToken) -> Option<Self> {
        if !std::io::stdin().is_terminal() {
            return None;
        }
        if let Err(err) = enable_raw_mode() {
            warn!("Keyboard input disabled: {err}");
            return None;
        }

        let stop = CancellationToken::new();
        let listening = stop.clone();

        let thread = thread::spawn(move || {
            while !listening.is_cancelled() && !cancel.is_cancelled() {
                match event::poll(POLL_INTERVAL) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(_) => break,
                }
                if let Ok(Event::Key(key_event)) = event::read() {
                    if is_interrupt(&key_event) {
                        debug!("Scan interrupted from keyboard");
                        cancel.cancel();
                    }
                }
            }
            let _ = disable_raw_mode();
        });

        Some(Self {
            stop,
            thread: Some(thread),
        })
    }
}

fn is_interrupt(key_event: &KeyEvent) -> bool {
    let is_q = key_event.code == KeyCode::Char('q');
    let is_ctrl_c = key_event.code == KeyCode::Char('c')
        && key_event.modifiers.contains(KeyModifiers::CONTROL);

    (is_q || is_ctrl_c) && key_event.kind == KeyEventKind::Press
}

impl Drop for InputHandle {
    fn drop(&mut self) {
        self.stop.cancel();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        let _ = disable_raw_mode();
    }
}
