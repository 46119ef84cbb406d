//! # Search Debouncer
//!
//! Holds back typed search queries until input settles, so a burst of
//! keystrokes produces one backend search.
//!
//! ## Timing
//! ```text
//!  input:   "s"   "sh"  "shi"            "shirt"
//!            │     │     │                  │
//!  time:  ───┴─────┴─────┴──────────────────┴──────────────────►
//!                        ├──── 300ms ────┤  ├──── 300ms ────┤
//!                                        │                  │
//!  output:                             "shi"             "shirt"
//! ```
//! Each query restarts the quiet window; only the last one of a burst is
//! released. Dropping every handle stops the task and discards whatever
//! was still waiting.

use std::time::Duration;
use storefront_core::SEARCH_DEBOUNCE_MS;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};

/// Buffered commands before `query` waits.
const COMMAND_CAPACITY: usize = 64;

/// Commands for the debouncer task.
#[derive(Debug)]
enum DebounceCommand {
    /// A new query; restarts the quiet window.
    Query(String),
    /// Release the waiting query now.
    Flush,
}

/// Handle for feeding queries to a running debouncer.
#[derive(Debug, Clone)]
pub struct DebouncerHandle {
    cmd_tx: mpsc::Sender<DebounceCommand>,
}

impl DebouncerHandle {
    /// Submits the current contents of the search box.
    pub async fn query(&self, query: impl Into<String>) -> ClientResult<()> {
        self.cmd_tx
            .send(DebounceCommand::Query(query.into()))
            .await
            .map_err(|_| ClientError::ChannelClosed("Debouncer stopped".into()))
    }

    /// Releases the waiting query without waiting out the window (Enter key).
    pub async fn flush(&self) -> ClientResult<()> {
        self.cmd_tx
            .send(DebounceCommand::Flush)
            .await
            .map_err(|_| ClientError::ChannelClosed("Debouncer stopped".into()))
    }
}

/// Debounces search input.
#[derive(Debug, Clone, Copy)]
pub struct SearchDebouncer {
    delay: Duration,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        SearchDebouncer::new(Duration::from_millis(SEARCH_DEBOUNCE_MS))
    }
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        SearchDebouncer { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Starts the debouncer task.
    ///
    /// Returns the input handle and the receiver of settled queries.
    pub fn start(self) -> (DebouncerHandle, mpsc::Receiver<String>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (out_tx, out_rx) = mpsc::channel(COMMAND_CAPACITY);

        tokio::spawn(async move {
            self.run(cmd_rx, out_tx).await;
        });

        (DebouncerHandle { cmd_tx }, out_rx)
    }

    async fn run(self, mut cmd_rx: mpsc::Receiver<DebounceCommand>, out_tx: mpsc::Sender<String>) {
        info!(delay_ms = self.delay.as_millis() as u64, "Search debouncer started");

        let mut pending: Option<String> = None;
        let mut deadline = Instant::now();

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(DebounceCommand::Query(query)) => {
                        debug!(query = %query, "Search input");
                        pending = Some(query);
                        deadline = Instant::now() + self.delay;
                    }
                    Some(DebounceCommand::Flush) => {
                        if let Some(query) = pending.take() {
                            if out_tx.send(query).await.is_err() {
                                break;
                            }
                        }
                    }
                    None => break,
                },
                _ = sleep_until(deadline), if pending.is_some() => {
                    if let Some(query) = pending.take() {
                        debug!(query = %query, "Search input settled");
                        if out_tx.send(query).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }

        info!("Search debouncer stopped");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_releases_only_last_query() {
        let (handle, mut settled) = SearchDebouncer::default().start();
        let started = Instant::now();

        for query in ["s", "sh", "shi"] {
            handle.query(query).await.unwrap();
        }

        assert_eq!(settled.recv().await.as_deref(), Some("shi"));
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert!(settled.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_query_restarts_window() {
        let (handle, mut settled) = SearchDebouncer::default().start();

        handle.query("lin").await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.query("linen").await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        // 400ms since the first query but only 200ms since the second.
        assert!(settled.try_recv().is_err());

        assert_eq!(settled.recv().await.as_deref(), Some("linen"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_each_fire() {
        let (handle, mut settled) = SearchDebouncer::new(Duration::from_millis(100)).start();

        handle.query("shirt").await.unwrap();
        assert_eq!(settled.recv().await.as_deref(), Some("shirt"));

        handle.query("shoes").await.unwrap();
        assert_eq!(settled.recv().await.as_deref(), Some("shoes"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_releases_immediately() {
        let (handle, mut settled) = SearchDebouncer::default().start();
        let started = Instant::now();

        handle.query("dress").await.unwrap();
        handle.flush().await.unwrap();

        assert_eq!(settled.recv().await.as_deref(), Some("dress"));
        assert!(started.elapsed() < Duration::from_millis(300));

        // Nothing left to fire once the window passes.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(settled.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_discards_pending() {
        let (handle, mut settled) = SearchDebouncer::default().start();
        handle.query("bag").await.unwrap();
        drop(handle);

        assert_eq!(settled.recv().await, None);
    }
}
