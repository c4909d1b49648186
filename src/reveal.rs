//! Typewriter-style reveal of resolved text.
//!
//! A reveal emits every prefix of a string, one character longer each step, at
//! a fixed interval. Each display slot owns at most one running reveal:
//! starting a new one cancels the previous, and dropping the slot cancels it
//! too.

use std::time::Duration;

use futures::{stream, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Default delay between two revealed characters.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(25);

/// Capacity of the prefix channel between the timer task and its consumer.
const CHANNEL_CAPACITY: usize = 64;

/// Every prefix of `text`, shortest first, split on character boundaries.
///
/// `prefixes("Atlas")` yields "A", "At", "Atl", "Atla", "Atlas".
pub fn prefixes(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.char_indices()
        .map(move |(i, c)| &text[..i + c.len_utf8()])
}

/// The prefixes of `text` as a stream paced by `interval`.
///
/// The first prefix arrives one interval after polling starts; the stream ends
/// after the full text.
pub fn reveal_stream(text: String, interval: Duration) -> impl Stream<Item = String> {
    let ends: Vec<usize> = text.char_indices().map(|(i, c)| i + c.len_utf8()).collect();
    let interval = interval.max(Duration::from_millis(1));

    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    stream::unfold((ticker, ends.into_iter()), move |(mut ticker, mut ends)| {
        let text = text.clone();
        async move {
            let end = ends.next()?;
            ticker.tick().await;
            Some((text[..end].to_string(), (ticker, ends)))
        }
    })
}

/// Handle to one running reveal.
///
/// The timer runs on its own task and stops when the handle is cancelled or
/// dropped. No prefix is delivered after that.
#[derive(Debug)]
pub struct RevealHandle {
    rx: mpsc::Receiver<String>,
    task: JoinHandle<()>,
}

impl RevealHandle {
    /// Start revealing `text`. Must be called inside a tokio runtime.
    pub fn start(text: impl Into<String>, interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let stream = reveal_stream(text.into(), interval);

        let task = tokio::spawn(async move {
            let mut stream = Box::pin(stream);
            while let Some(prefix) = stream.next().await {
                if tx.send(prefix).await.is_err() {
                    break;
                }
            }
        });

        Self { rx, task }
    }

    /// Wait for the next prefix. `None` once the reveal has finished.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Take every prefix available right now, returning the newest.
    ///
    /// The flag is true once the reveal has emitted its last prefix.
    pub fn drain(&mut self) -> (Option<String>, bool) {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(prefix) => latest = Some(prefix),
                Err(mpsc::error::TryRecvError::Empty) => return (latest, false),
                Err(mpsc::error::TryRecvError::Disconnected) => return (latest, true),
            }
        }
    }

    /// Stop the timer.
    pub fn cancel(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A display slot that shows one revealing text at a time.
#[derive(Debug)]
pub struct RevealSlot {
    interval: Duration,
    target: String,
    shown: String,
    active: Option<RevealHandle>,
}

impl RevealSlot {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            target: String::new(),
            shown: String::new(),
            active: None,
        }
    }

    /// Start revealing `text`, cancelling any reveal already running here.
    pub fn reveal(&mut self, text: impl Into<String>) {
        self.cancel();
        self.target = text.into();
        self.shown.clear();
        self.active = Some(RevealHandle::start(self.target.clone(), self.interval));
    }

    /// Stop the running reveal, keeping whatever is shown.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.cancel();
        }
    }

    /// Pull new prefixes from the timer. Returns true if the shown text changed.
    pub fn poll(&mut self) -> bool {
        let Some(handle) = self.active.as_mut() else {
            return false;
        };

        let (latest, finished) = handle.drain();
        if finished {
            self.active = None;
        }

        match latest {
            Some(prefix) => {
                self.shown = prefix;
                true
            }
            None => false,
        }
    }

    /// Text currently visible.
    pub fn shown(&self) -> &str {
        &self.shown
    }

    /// Full text being revealed.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.active.is_none() && self.shown == self.target
    }
}

impl Default for RevealSlot {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_ascii() {
        let all: Vec<&str> = prefixes("Dune").collect();
        assert_eq!(all, vec!["D", "Du", "Dun", "Dune"]);
    }

    #[test]
    fn test_prefixes_multibyte() {
        let all: Vec<&str> = prefixes("né✓").collect();
        assert_eq!(all, vec!["n", "né", "né✓"]);
    }

    #[test]
    fn test_prefixes_empty() {
        assert_eq!(prefixes("").count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_stream_is_paced() {
        let start = Instant::now();
        let collected: Vec<String> = reveal_stream("abc".to_string(), Duration::from_millis(40))
            .collect()
            .await;

        assert_eq!(collected, vec!["a", "ab", "abc"]);
        assert_eq!(start.elapsed(), Duration::from_millis(120));
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_accepts_borrowed_text() {
        let title = String::from("Emma");
        let mut handle = RevealHandle::start(title.as_str(), Duration::from_millis(10));
        drop(title);

        let mut last = None;
        while let Some(prefix) = handle.recv().await {
            last = Some(prefix);
        }
        assert_eq!(last.as_deref(), Some("Emma"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_text_finishes_immediately() {
        let mut slot = RevealSlot::default();
        slot.reveal("");
        time::sleep(Duration::from_millis(5)).await;
        slot.poll();

        assert!(!slot.is_animating());
        assert!(slot.is_complete());
        assert_eq!(slot.shown(), "");
    }
}
