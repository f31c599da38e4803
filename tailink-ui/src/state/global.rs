//! Global Application State
//!
//! Reactive state shared by the pages.

use leptos::*;
use tailink::{RegistrationDraft, Session, SessionStore};

use super::session::LocalStorageSessionStore;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Account fields from register step 1, consumed by step 2
    pub registration_draft: RwSignal<Option<RegistrationDraft>>,
    /// Whether a token is stored
    pub logged_in: RwSignal<bool>,
    /// A request is in flight
    pub loading: RwSignal<bool>,
    pub sessions: LocalStorageSessionStore,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let sessions = LocalStorageSessionStore;
    let logged_in = matches!(sessions.token(), Ok(Some(_)));

    let state = GlobalState {
        registration_draft: create_rw_signal(None),
        logged_in: create_rw_signal(logged_in),
        loading: create_rw_signal(false),
        sessions,
    };

    provide_context(state);
}

impl GlobalState {
    /// Stored session, if any. Storage failures count as logged out.
    pub fn session(&self) -> Option<Session> {
        match self.sessions.load() {
            Ok(session) => session,
            Err(e) => {
                log_error(&e.to_string());
                None
            }
        }
    }

    pub fn store_session(&self, session: &Session) {
        if let Err(e) = self.sessions.save(session) {
            log_error(&e.to_string());
        }
        self.logged_in.set(true);
    }

    pub fn logout(&self) {
        if let Err(e) = self.sessions.clear() {
            log_error(&e.to_string());
        }
        self.logged_in.set(false);
    }

    pub fn draft(&self) -> Option<RegistrationDraft> {
        self.registration_draft.get_untracked()
    }

    /// Drop the draft once registration went through
    pub fn clear_draft(&self) {
        self.registration_draft.set(None);
    }
}

/// Blocking browser alert
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

pub fn log_info(message: &str) {
    web_sys::console::log_1(&message.into());
}

pub fn log_error(message: &str) {
    web_sys::console::error_1(&message.into());
}
