use std::sync::Arc;

use tokio::sync::broadcast::{Receiver, Sender};
use tokio::sync::Mutex;

/// Handle used to stop a running load test.
///
/// A stop can come from the user (Ctrl-C), from an overall run duration elapsing, or from a test
/// asking the run to end early. Clients in flight observe the stop through a
/// [DelegatedStopListener] and fail their next exchange with a [StopSignalError].
#[derive(Debug, Clone)]
pub struct StopHandle {
    sender: Sender<()>,
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StopHandle {
    pub fn new() -> Self {
        Self {
            sender: tokio::sync::broadcast::channel(1).0,
        }
    }

    pub fn stop(&self) {
        if let Err(e) = self.sender.send(()) {
            // Will fail if nobody is listening for a stop signal, in which case the log message
            // can be ignored.
            log::warn!("Failed to send stop signal: {e:?}");
        }
    }

    pub fn new_listener(&self) -> DelegatedStopListener {
        DelegatedStopListener::new(self.sender.subscribe())
    }
}

#[derive(Clone, Debug)]
pub struct DelegatedStopListener {
    receiver: Arc<Mutex<Receiver<()>>>,
}

impl DelegatedStopListener {
    pub(crate) fn new(receiver: Receiver<()>) -> Self {
        Self {
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    /// Point in time check whether the stop signal has been received. If this returns true then
    /// work should be wound down so the run can finish.
    pub fn should_stop(&mut self) -> bool {
        match self.receiver.try_lock() {
            Ok(mut guard) => {
                match guard.try_recv() {
                    Ok(_) => true,
                    Err(tokio::sync::broadcast::error::TryRecvError::Closed) => true,
                    // If the receiver is empty or lagged then we should keep going.
                    Err(_) => false,
                }
            }
            Err(_) => false,
        }
    }

    /// Wait for the stop signal to be received. It is safe to race this against another future so
    /// that the stop signal can be used to cancel work in progress.
    pub async fn wait_for_stop(&mut self) {
        // The only sender lives on the runner for the whole run, so recv can only fail after the
        // run has already been torn down. Treat that the same as a stop.
        let _ = self.receiver.lock().await.recv().await;
    }
}

/// Error value produced when an in-flight operation is cancelled by the stop signal.
///
/// This is an ordinary failure as far as a conversation is concerned. The conversation records a
/// failed turn and halts, exactly as it would for a transport error.
#[derive(derive_more::Error, derive_more::Display, Debug)]
pub struct StopSignalError {
    msg: String,
}

impl Default for StopSignalError {
    fn default() -> Self {
        Self {
            msg: "Execution cancelled by stop signal".to_string(),
        }
    }
}
