use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::error;

use crate::session::Shared;

/// Background task that flushes the session queue on a fixed cadence.
///
/// One per session, spawned at construction. The loop is strictly
/// sequential (sleep, then flush, then sleep again) and takes the same
/// session lock as every other flush trigger, so it can never interleave
/// a partial batch with a threshold flush. It exits when the session
/// shuts down, when every handle to the session is gone, or when a flush
/// fails with a fatal error.
pub(crate) struct Flusher {
    session: Weak<Shared>,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl Flusher {
    pub(crate) fn new(
        session: Weak<Shared>,
        interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Flusher {
            session,
            interval,
            shutdown,
        }
    }

    pub(crate) fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.shutdown.changed() => return,
            }

            let Some(session) = self.session.upgrade() else {
                return;
            };

            let retry_limit = session.config.max_flush_retries;
            if let Err(e) = session.flush(retry_limit).await {
                // fatal transport errors end the timer, not the process
                error!(error = %e, "periodic flush failed, stopping flusher");
                return;
            }
        }
    }
}
