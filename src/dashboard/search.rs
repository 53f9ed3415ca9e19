//! Debounced search input

use std::time::Duration;

use log::{debug, trace};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Buffers keystrokes and emits the latest text once input has been quiet
/// for the configured period.
pub struct SearchDebouncer {
    input: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl SearchDebouncer {
    /// Start the debounce task. Settled values arrive on the returned receiver.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(debounce(quiet, input_rx, output_tx));
        (
            Self {
                input: input_tx,
                task,
            },
            output_rx,
        )
    }

    /// Record new input text, restarting the quiet period
    pub fn input(&self, text: impl Into<String>) {
        let text = text.into();
        trace!("Search input: {:?}", text);
        if self.input.send(text).is_err() {
            debug!("Search debouncer is no longer running");
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn debounce(
    quiet: Duration,
    mut input: mpsc::UnboundedReceiver<String>,
    output: mpsc::UnboundedSender<String>,
) {
    while let Some(mut pending) = input.recv().await {
        loop {
            tokio::select! {
                next = input.recv() => {
                    match next {
                        Some(text) => pending = text,
                        None => {
                            let _ = output.send(pending);
                            return;
                        }
                    }
                }
                _ = sleep(quiet) => {
                    debug!("Search settled on {:?}", pending);
                    if output.send(std::mem::take(&mut pending)).is_err() {
                        return;
                    }
                    break;
                }
            }
        }
    }
}
