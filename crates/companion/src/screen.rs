use std::{future::Future, sync::Arc};

use tokio::sync::watch;
use utility::generation::RequestGeneration;

use crate::RequestResult;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    /// Loading failed; holds the message to show.
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// View state of one screen. Every load is tagged with a ticket of the
/// screen's generation and only the latest load may publish its result, so
/// a slow response can not overwrite the answer to a newer request.
pub struct Screen<T> {
    name: &'static str,
    generation: RequestGeneration,
    state: watch::Sender<Arc<ViewState<T>>>,
    refreshing: watch::Sender<bool>,
}

impl<T> Screen<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            generation: RequestGeneration::new(),
            state: watch::channel(Arc::new(ViewState::Idle)).0,
            refreshing: watch::channel(false).0,
        }
    }

    pub fn state(&self) -> Arc<ViewState<T>> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ViewState<T>>> {
        self.state.subscribe()
    }

    pub fn is_refreshing(&self) -> bool {
        *self.refreshing.borrow()
    }

    /// Shows the loading state, runs `fetch` and publishes its outcome.
    /// Returns whether the outcome was published. Publishing also ends a
    /// refresh this load superseded.
    pub async fn load<F>(&self, fetch: F) -> bool
    where
        F: Future<Output = RequestResult<T>>,
    {
        let ticket = self.generation.begin();
        self.state.send_replace(Arc::new(ViewState::Loading));
        let result = fetch.await;

        if !self.generation.is_latest(&ticket) {
            log::warn!(
                "{}: discarding stale response of generation {}",
                self.name,
                ticket.generation()
            );
            return false;
        }
        let state = match result {
            Ok(value) => ViewState::Ready(value),
            Err(why) => {
                log::error!("{}: loading failed: {}", self.name, why);
                ViewState::Failed(why.user_message())
            }
        };
        self.state.send_replace(Arc::new(state));
        self.refreshing.send_replace(false);
        true
    }

    /// Like `load`, but keeps the current state visible and flags the
    /// screen as refreshing until `fetch` completed.
    pub async fn refresh<F>(&self, fetch: F) -> bool
    where
        F: Future<Output = RequestResult<T>>,
    {
        let ticket = self.generation.begin();
        self.refreshing.send_replace(true);
        let result = fetch.await;

        let published = self.generation.is_latest(&ticket);
        if published {
            match result {
                Ok(value) => {
                    self.state.send_replace(Arc::new(ViewState::Ready(value)));
                }
                Err(why) => {
                    log::error!("{}: refresh failed: {}", self.name, why);
                    self.state
                        .send_replace(Arc::new(ViewState::Failed(why.user_message())));
                }
            }
            self.refreshing.send_replace(false);
        } else {
            log::warn!(
                "{}: discarding stale refresh of generation {}",
                self.name,
                ticket.generation()
            );
        }
        published
    }
}
