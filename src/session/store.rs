//! Session isolation for the web server.
//!
//! Each browser gets its own [`SessionState`], keyed by a random UUID carried
//! in a cookie. The server is single-threaded, so the store is a plain map
//! owned by the request loop; nothing is shared or locked.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::SessionState;
use crate::catalog::ModelCatalog;

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "metricdash_session";

#[derive(Debug)]
struct Entry {
    state: SessionState,
    last_seen: DateTime<Utc>,
}

/// A session resolved for one request.
#[derive(Debug)]
pub struct Checkout<'a> {
    pub id: Uuid,
    /// `true` when no live session matched and a fresh one was created.
    pub created: bool,
    pub state: &'a mut SessionState,
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<Uuid, Entry>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(idle_timeout_secs: u64, max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_timeout: Duration::seconds(idle_timeout_secs.min(u64::from(u32::MAX)) as i64),
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Resolve the session named by `requested` (a cookie value), creating
    /// one with default state if it is missing, malformed, or expired.
    pub fn checkout(&mut self, catalog: &ModelCatalog, requested: Option<&str>) -> Checkout<'_> {
        self.checkout_at(catalog, requested, Utc::now())
    }

    /// [`checkout`](Self::checkout) with an explicit clock.
    pub fn checkout_at(
        &mut self,
        catalog: &ModelCatalog,
        requested: Option<&str>,
        now: DateTime<Utc>,
    ) -> Checkout<'_> {
        self.evict_idle(now);

        let existing = requested
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .filter(|id| self.sessions.contains_key(id));

        let (id, created) = match existing {
            Some(id) => (id, false),
            None => {
                if self.sessions.len() >= self.max_sessions {
                    self.evict_oldest();
                }
                let id = Uuid::new_v4();
                self.sessions.insert(
                    id,
                    Entry {
                        state: SessionState::new(catalog),
                        last_seen: now,
                    },
                );
                (id, true)
            }
        };

        // Both branches guarantee the key is present.
        let entry = self
            .sessions
            .entry(id)
            .or_insert_with(|| Entry {
                state: SessionState::new(catalog),
                last_seen: now,
            });
        entry.last_seen = now;

        Checkout {
            id,
            created,
            state: &mut entry.state,
        }
    }

    /// Remove a session outright. Returns whether it existed.
    pub fn remove(&mut self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Drop sessions idle for longer than the timeout. Returns how many were removed.
    pub fn evict_idle(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        let timeout = self.idle_timeout;
        self.sessions.retain(|_, entry| now - entry.last_seen <= timeout);
        before - self.sessions.len()
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|(_, entry)| entry.last_seen)
            .map(|(id, _)| *id);
        if let Some(id) = oldest {
            self.sessions.remove(&id);
        }
    }
}

/// Extract the session id from a `Cookie` header value.
pub fn session_id_from_cookie(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::View;

    #[test]
    fn missing_cookie_creates_session() {
        let catalog = ModelCatalog::builtin();
        let mut store = SessionStore::new(3600, 16);
        let checkout = store.checkout(&catalog, None);
        assert!(checkout.created);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn known_cookie_reuses_state() {
        let catalog = ModelCatalog::builtin();
        let mut store = SessionStore::new(3600, 16);
        let id = {
            let checkout = store.checkout(&catalog, None);
            checkout.state.set_view(View::Models);
            checkout.id.to_string()
        };

        let checkout = store.checkout(&catalog, Some(&id));
        assert!(!checkout.created);
        assert_eq!(checkout.state.view(), View::Models);
    }

    #[test]
    fn sessions_are_isolated() {
        let catalog = ModelCatalog::builtin();
        let mut store = SessionStore::new(3600, 16);
        let a = {
            let checkout = store.checkout(&catalog, None);
            checkout.state.set_selected_model(&catalog, "SVM").unwrap();
            checkout.id.to_string()
        };
        let b = store.checkout(&catalog, None).id.to_string();

        assert_eq!(store.checkout(&catalog, Some(&a)).state.selected_model(), "SVM");
        assert_eq!(
            store.checkout(&catalog, Some(&b)).state.selected_model(),
            "Random Forest"
        );
    }

    #[test]
    fn garbage_cookie_gets_fresh_session() {
        let catalog = ModelCatalog::builtin();
        let mut store = SessionStore::new(3600, 16);
        let checkout = store.checkout(&catalog, Some("not-a-uuid"));
        assert!(checkout.created);
    }

    #[test]
    fn removed_session_is_not_resumed() {
        let catalog = ModelCatalog::builtin();
        let mut store = SessionStore::new(3600, 16);
        let id = store.checkout(&catalog, None).id;

        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(store.is_empty());

        let again = store.checkout(&catalog, Some(&id.to_string()));
        assert!(again.created);
        assert_ne!(again.id, id);
    }

    #[test]
    fn idle_sessions_expire() {
        let catalog = ModelCatalog::builtin();
        let mut store = SessionStore::new(60, 16);
        let start = Utc::now();
        let id = store.checkout_at(&catalog, None, start).id.to_string();

        let later = start + Duration::seconds(120);
        let checkout = store.checkout_at(&catalog, Some(&id), later);
        assert!(checkout.created);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn capacity_evicts_least_recently_seen() {
        let catalog = ModelCatalog::builtin();
        let mut store = SessionStore::new(3600, 2);
        let start = Utc::now();
        let first = store.checkout_at(&catalog, None, start).id.to_string();
        let second = store
            .checkout_at(&catalog, None, start + Duration::seconds(1))
            .id
            .to_string();
        store.checkout_at(&catalog, None, start + Duration::seconds(2));

        assert_eq!(store.len(), 2);
        let now = start + Duration::seconds(3);
        assert!(store.checkout_at(&catalog, Some(&first), now).created);
        // `second` was evicted by the re-created `first`
        assert!(store.checkout_at(&catalog, Some(&second), now).created);
    }

    #[test]
    fn cookie_parsing_finds_session() {
        let header = "theme=dark; metricdash_session=abc-123; other=1";
        assert_eq!(session_id_from_cookie(header), Some("abc-123"));
        assert_eq!(session_id_from_cookie("theme=dark"), None);
    }
}
