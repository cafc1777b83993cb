// ABOUTME: User-facing output of the kubeb commands.
// ABOUTME: Normal mode is for people, quiet mode for CI logs, JSON mode for scripts.

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Messages, spinners and timings
    Normal,
    /// Results and errors only
    Quiet,
    /// One JSON object per line
    Json,
}

/// Writes command results according to the selected [`OutputMode`].
pub struct Output {
    mode: OutputMode,
    started: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            started: None,
        }
    }

    /// Time the rest of the command; the duration is appended to the result.
    pub fn start_timer(&mut self) {
        self.started = Some(Instant::now());
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().unwrap_or(0.0)
    }

    fn elapsed(&self) -> Option<f64> {
        self.started.map(|t| t.elapsed().as_secs_f64())
    }

    /// Print a result line; JSON mode prints data through [`data`](Self::data) instead.
    pub fn line(&self, message: &str) {
        if self.mode != OutputMode::Json {
            println!("{message}");
        }
    }

    /// Print a value as one JSON line (json mode only).
    ///
    /// Returns whether it was printed, so callers can fall back to text.
    pub fn data<T: Serialize>(&self, value: &T) -> bool {
        if self.mode != OutputMode::Json {
            return false;
        }
        match serde_json::to_string(value) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::warn!("Failed to serialize output: {}", e),
        }
        true
    }

    /// Spinner shown while an external command runs (normal mode only).
    ///
    /// The caller clears it with `finish_and_clear` before reporting.
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if self.mode != OutputMode::Normal {
            return None;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    }

    /// Final result of a command, with its duration when timed.
    pub fn success(&self, message: &str) {
        match (self.mode, self.elapsed()) {
            (OutputMode::Json, duration) => emit(Stream::Stdout, "success", message, duration),
            (OutputMode::Normal, Some(secs)) if secs > 0.0 => {
                println!("{message} ({secs:.1}s)")
            }
            _ => println!("{message}"),
        }
    }

    /// Non-fatal problem; not shown in quiet mode.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("Warning: {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => emit(Stream::Stderr, "warning", message, None),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Json => emit(Stream::Stderr, "error", message, self.elapsed()),
            _ => eprintln!("Error: {message}"),
        }
    }
}

enum Stream {
    Stdout,
    Stderr,
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

fn emit(stream: Stream, event: &str, message: &str, duration_secs: Option<f64>) {
    let event = JsonEvent {
        event,
        message,
        duration_secs,
    };
    let Ok(json) = serde_json::to_string(&event) else {
        return;
    };
    match stream {
        Stream::Stdout => println!("{json}"),
        Stream::Stderr => eprintln!("{json}"),
    }
}
