use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// A transient banner. `id` ties it to the timer that will dismiss it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Fired by one-shot timers back into the view controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    ComingSoonDue,
    ToastExpired(u64),
}

/// One-shot timers that report back over a channel instead of touching state.
///
/// Each timer is a tokio task that sleeps and then posts its event. Whoever owns
/// the `Timers` drains the channel and applies the events. Dropping the `Timers`
/// aborts anything still pending, so a torn-down view never sees a late event.
pub struct Timers {
    tx: mpsc::UnboundedSender<TimerEvent>,
    rx: mpsc::UnboundedReceiver<TimerEvent>,
    pending: Vec<JoinHandle<()>>,
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}

impl Timers {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            pending: Vec::new(),
        }
    }

    /// Posts `event` after `delay`. Must be called inside a tokio runtime.
    pub fn schedule(&mut self, delay: Duration, event: TimerEvent) {
        self.pending.retain(|handle| !handle.is_finished());

        let tx = self.tx.clone();
        self.pending.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver only goes away together with us.
            let _ = tx.send(event);
        }));
    }

    /// Number of timers that have not fired yet.
    pub fn pending(&self) -> usize {
        self.pending.iter().filter(|h| !h.is_finished()).count()
    }

    /// An event that already fired, if any.
    pub fn try_next(&mut self) -> Option<TimerEvent> {
        self.rx.try_recv().ok()
    }

    /// Waits for the next event. `None` once nothing is pending or queued.
    pub async fn next(&mut self) -> Option<TimerEvent> {
        if let Some(event) = self.try_next() {
            return Some(event);
        }
        if self.pending() == 0 {
            // A timer may have fired between the two checks.
            return self.try_next();
        }
        self.rx.recv().await
    }

    /// Aborts all pending timers and discards fired-but-unread events.
    pub fn cancel_all(&mut self) {
        for handle in self.pending.drain(..) {
            handle.abort();
        }
        while self.rx.try_recv().is_ok() {}
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        for handle in &self.pending {
            handle.abort();
        }
    }
}
