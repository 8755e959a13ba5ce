use gqlbind_core::transport::SubscriptionState;
use tokio::sync::oneshot;
use tokio::sync::watch;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Owns the background task of one subscription.
///
/// Dropping the handle stops the subscription without waiting for it to wind
/// down; call [`SubscriptionHandle::unsubscribe()`] to wait.
#[derive(Debug)]
pub struct SubscriptionHandle {
    state: watch::Receiver<SubscriptionState>,
    task: Mutex<Option<(oneshot::Sender<()>, JoinHandle<()>)>>,
}
impl SubscriptionHandle {
    pub(super) fn new(
        state: watch::Receiver<SubscriptionState>,
        stop: oneshot::Sender<()>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            state,
            task: Mutex::new(Some((stop, task))),
        }
    }

    pub fn state(&self) -> SubscriptionState {
        *self.state.borrow()
    }

    /// Stop the subscription: send a best-effort `complete` frame, close the
    /// socket and wait for the background task to finish. No listener
    /// callback runs after this returns.
    ///
    /// Calling this more than once, or after the subscription already ended,
    /// is a no-op.
    pub async fn unsubscribe(&self) {
        let mut task = self.task.lock().await;
        let Some((stop, join)) = task.take() else {
            return;
        };
        // The task may have ended on its own already.
        let _ = stop.send(());
        if let Err(err) = join.await {
            tracing::warn!(%err, "subscription task did not finish cleanly");
        }
    }

    /// Wait until the subscription reaches `target` or ends, and return the
    /// state it is in then.
    pub async fn wait_for(&self, target: SubscriptionState) -> SubscriptionState {
        let mut state = self.state.clone();
        match state.wait_for(|state| *state == target || state.is_terminal()).await {
            Ok(state) => *state,
            // The task dropped its sender, so the last value is final.
            Err(_) => *self.state.borrow(),
        }
    }
}
impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        if let Some((stop, _join)) = self.task.get_mut().take() {
            let _ = stop.send(());
        }
    }
}
