//! Navigation drawer store.

use std::sync::Arc;

use tokio::sync::watch;

/// Observable navigation drawer state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavState {
    /// Whether the navigation drawer is open.
    pub is_active: bool,
}

/// Cloneable handle to the navigation drawer state.
#[derive(Debug, Clone)]
pub struct NavStore {
    state: Arc<watch::Sender<NavState>>,
}

impl Default for NavStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NavStore {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(NavState::default());
        Self {
            state: Arc::new(state),
        }
    }

    /// Observe every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NavState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.borrow().is_active
    }

    pub fn toggle(&self) {
        self.state.send_modify(|s| s.is_active = !s.is_active);
    }

    pub fn open(&self) {
        self.state
            .send_if_modified(|s| !std::mem::replace(&mut s.is_active, true));
    }

    pub fn close(&self) {
        self.state
            .send_if_modified(|s| std::mem::replace(&mut s.is_active, false));
    }
}
