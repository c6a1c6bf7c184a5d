use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::{error, warn};

use crate::payload::Payload;
use crate::render::render_table;
use crate::store::read_payload;

/// Polls the player document and keeps the last good copy around, so a bad
/// read shows an error banner above stale data instead of blanking the view.
pub struct Watcher {
    path: PathBuf,
    interval: Duration,
    last_good: Option<Payload>,
}

impl Watcher {
    pub fn new(path: &Path, interval: Duration) -> Self {
        Self {
            path: path.to_path_buf(),
            interval,
            last_good: None,
        }
    }

    /// Re-reads the document and returns the frame to display.
    pub fn refresh(&mut self) -> String {
        let error = match read_payload(&self.path) {
            Ok(payload) => {
                self.last_good = Some(payload);
                None
            }
            Err(e) => {
                warn!("Failed to load {}: {e}", self.path.display());
                Some(e)
            }
        };

        let mut frame = String::new();
        if let Some(e) = error {
            frame.push_str(&format!("ERROR: failed to load player data ({e})\n\n"));
        }
        match &self.last_good {
            Some(payload) => frame.push_str(&render_table(payload)),
            None => frame.push_str("No player data yet.\n"),
        }
        frame.push_str(&format!(
            "\nAuto refresh: every {}s\n",
            self.interval.as_secs()
        ));
        frame
    }

    /// Draws once right away, then again every interval. Only returns when
    /// `once` is set.
    pub fn run(&mut self, once: bool) {
        let stdout = std::io::stdout();
        let clear = stdout.is_terminal() && !once;

        loop {
            let frame = self.refresh();
            if let Err(e) = draw(&mut stdout.lock(), &frame, clear) {
                error!("Cannot write to stdout: {e}");
                return;
            }

            if once {
                return;
            }
            thread::sleep(self.interval);
        }
    }
}

fn draw(out: &mut impl Write, frame: &str, clear: bool) -> std::io::Result<()> {
    if clear {
        write!(out, "\x1b[2J\x1b[H")?;
    }
    write!(out, "{frame}")?;
    out.flush()
}
