//! Browser Session Store
//!
//! Keeps the token in `localStorage` under the shared token key.

use tailink::session::TOKEN_KEY;
use tailink::{Session, SessionError, SessionStore};

/// Session token in the browser's `localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageSessionStore;

impl LocalStorageSessionStore {
    fn storage(&self) -> Result<web_sys::Storage, SessionError> {
        web_sys::window()
            .ok_or_else(|| SessionError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| SessionError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| SessionError::Unavailable("localStorage disabled".to_string()))
    }
}

impl SessionStore for LocalStorageSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let token = self
            .storage()?
            .get_item(TOKEN_KEY)
            .map_err(|e| SessionError::Unavailable(format!("{:?}", e)))?;

        Ok(token.filter(|t| !t.is_empty()).map(Session::new))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        self.storage()?
            .set_item(TOKEN_KEY, &session.token)
            .map_err(|e| SessionError::Unavailable(format!("{:?}", e)))
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.storage()?
            .remove_item(TOKEN_KEY)
            .map_err(|e| SessionError::Unavailable(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_token_round_trip() {
        let store = LocalStorageSessionStore;
        store.clear().unwrap();
        assert_eq!(store.token().unwrap(), None);

        store.save(&Session::new("tok-1")).unwrap();
        assert_eq!(store.token().unwrap().as_deref(), Some("tok-1"));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
