// ABOUTME: Progressive text reveal for step prompts
// Lazy stream of growing prefixes plus a restartable driver for the render loop

use std::time::Duration;

use async_stream::stream;
use futures_util::pin_mut;
use futures_util::stream::{Stream, StreamExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

/// Delays controlling the reveal speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTiming {
    /// Wait before the first character
    pub initial_delay: Duration,
    /// Wait before each character
    pub char_interval: Duration,
}

impl RevealTiming {
    pub fn new(initial_delay: Duration, char_interval: Duration) -> Self {
        Self {
            initial_delay,
            char_interval,
        }
    }
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self::new(Duration::from_millis(300), Duration::from_millis(30))
    }
}

/// Yield progressively longer prefixes of `text`, one character per interval,
/// ending with the full string. An empty string yields nothing.
pub fn reveal(text: impl Into<String>, timing: RevealTiming) -> impl Stream<Item = String> + Send + 'static {
    let text = text.into();
    stream! {
        if !timing.initial_delay.is_zero() {
            tokio::time::sleep(timing.initial_delay).await;
        }
        for (idx, ch) in text.char_indices() {
            if !timing.char_interval.is_zero() {
                tokio::time::sleep(timing.char_interval).await;
            }
            yield text[..idx + ch.len_utf8()].to_string();
        }
    }
}

/// Drives one reveal at a time for the UI.
///
/// Retargeting abandons the running sequence: its task is aborted and any
/// prefix it already queued is discarded by generation, so only output for
/// the current target ever becomes visible.
pub struct RevealDriver {
    timing: RevealTiming,
    enabled: bool,
    target: Option<String>,
    visible: String,
    generation: u64,
    task: Option<JoinHandle<()>>,
    tx: UnboundedSender<(u64, String)>,
    rx: UnboundedReceiver<(u64, String)>,
}

impl RevealDriver {
    pub fn new(timing: RevealTiming, enabled: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            timing,
            enabled,
            target: None,
            visible: String::new(),
            generation: 0,
            task: None,
            tx,
            rx,
        }
    }

    /// Start revealing `text` unless it is already the target.
    /// Must be called from within a tokio runtime when animation is enabled.
    pub fn set_target(&mut self, text: &str) {
        if self.target.as_deref() == Some(text) {
            return;
        }

        self.abort_task();
        self.generation += 1;
        self.target = Some(text.to_string());
        self.visible.clear();

        if !self.enabled {
            self.visible = text.to_string();
            return;
        }

        debug!("Starting reveal #{} ({} chars)", self.generation, text.chars().count());

        let generation = self.generation;
        let tx = self.tx.clone();
        let sequence = reveal(text, self.timing);
        self.task = Some(tokio::spawn(async move {
            pin_mut!(sequence);
            while let Some(prefix) = sequence.next().await {
                if tx.send((generation, prefix)).is_err() {
                    break;
                }
            }
        }));
    }

    /// Apply prefixes produced since the last poll. Returns true if the
    /// visible text changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok((generation, prefix)) = self.rx.try_recv() {
            if generation == self.generation {
                self.visible = prefix;
                changed = true;
            }
        }
        changed
    }

    /// Jump straight to the full target text
    pub fn finish(&mut self) {
        self.abort_task();
        // Stale prefixes still queued must not overwrite the full text
        self.generation += 1;
        if let Some(target) = &self.target {
            self.visible.clone_from(target);
        }
    }

    /// Stop revealing and forget the target (step unmounted)
    pub fn cancel(&mut self) {
        self.abort_task();
        self.generation += 1;
        self.target = None;
        self.visible.clear();
    }

    pub fn visible(&self) -> &str {
        &self.visible
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.target.as_deref().map_or(true, |t| t == self.visible)
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for RevealDriver {
    fn drop(&mut self) {
        self.abort_task();
    }
}
