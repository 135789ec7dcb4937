//! "Location Updated" toast shown after the selected location changes.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::store::{StoreEvent, WeatherStore};

pub const NOTIFICATION_TITLE: &str = "Location Updated";

#[derive(Default)]
struct ToastState {
    location: Option<String>,
    timer: Option<CancellationToken>,
}

struct ToastInner {
    state: Mutex<ToastState>,
    duration: Duration,
    cancel: CancellationToken,
}

pub struct LocationNotification {
    inner: Arc<ToastInner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl LocationNotification {
    /// Start listening for location changes on the current tokio runtime
    pub fn start(store: &WeatherStore, duration: Duration) -> Self {
        let inner = Arc::new(ToastInner {
            state: Mutex::new(ToastState::default()),
            duration,
            cancel: CancellationToken::new(),
        });
        let task = tokio::spawn(inner.clone().listen(store.subscribe()));
        Self {
            inner,
            task: Mutex::new(Some(task)),
        }
    }

    pub fn title(&self) -> &'static str {
        NOTIFICATION_TITLE
    }

    /// Location currently announced, if the toast is showing
    pub fn location(&self) -> Option<String> {
        self.inner.state.lock().location.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.inner.state.lock().location.is_some()
    }

    /// Close button
    pub fn close(&self) {
        self.inner.hide();
    }

    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.inner.hide();
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::error!("Notification task failed: {}", e);
            }
        }
    }
}

impl Drop for LocationNotification {
    fn drop(&mut self) {
        self.inner.cancel.cancel();
    }
}

impl ToastInner {
    async fn listen(self: Arc<Self>, mut events: broadcast::Receiver<StoreEvent>) {
        loop {
            let event = tokio::select! {
                _ = self.cancel.cancelled() => break,
                event = events.recv() => event,
            };
            match event {
                Ok(StoreEvent::LocationChanged { previous, current }) => {
                    if !previous.is_empty() && previous != current {
                        self.clone().show(current);
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Notification missed {} store events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    fn show(self: Arc<Self>, location: String) {
        let timer = self.cancel.child_token();
        {
            let mut state = self.state.lock();
            if let Some(old) = state.timer.replace(timer.clone()) {
                old.cancel();
            }
            state.location = Some(location);
        }

        tokio::spawn(async move {
            tokio::select! {
                _ = timer.cancelled() => {}
                _ = tokio::time::sleep(self.duration) => {
                    let mut state = self.state.lock();
                    if !timer.is_cancelled() {
                        state.location = None;
                        state.timer = None;
                    }
                }
            }
        });
    }

    fn hide(&self) {
        let mut state = self.state.lock();
        if let Some(timer) = state.timer.take() {
            timer.cancel();
        }
        state.location = None;
    }
}
