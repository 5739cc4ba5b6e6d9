//! Persisted session store, generic over the identity space.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::ClientResult;
use crate::session::{Identity, Session};
use crate::storage::KvStore;

/// Persists and restores one session per identity space.
///
/// `load` never fails outward: anything malformed, invalid, or expired
/// in storage is cleared and reported as "no session". The persisted
/// blob is the shared source of truth across tabs; last writer wins.
pub struct SessionStore<I: Identity> {
    kv: Arc<dyn KvStore>,
    _identity: PhantomData<I>,
}

impl<I: Identity> Clone for SessionStore<I> {
    fn clone(&self) -> Self {
        Self {
            kv: Arc::clone(&self.kv),
            _identity: PhantomData,
        }
    }
}

impl<I: Identity> SessionStore<I> {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            _identity: PhantomData,
        }
    }

    /// Restores the persisted session, discarding anything unusable.
    pub fn load(&self) -> Option<Session<I>> {
        let raw = self.kv.get(I::PRIMARY_KEY)?;

        let session = match serde_json::from_str::<Session<I>>(&raw) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(key = I::PRIMARY_KEY, error = %err, "Discarding malformed session");
                self.clear();
                return None;
            }
        };

        if let Err(err) = session.identity.validate() {
            tracing::warn!(key = I::PRIMARY_KEY, error = %err, "Discarding invalid session");
            self.clear();
            return None;
        }

        if session.is_expired() {
            tracing::info!(key = I::PRIMARY_KEY, "Cached session expired, cleared");
            self.clear();
            return None;
        }

        Some(session)
    }

    /// Validates and persists a session plus its mirror entries.
    pub fn save(&self, session: &Session<I>) -> ClientResult<()> {
        session.identity.validate()?;
        let raw = serde_json::to_string(session)?;
        self.kv.set(I::PRIMARY_KEY, &raw);
        for (key, value) in session.identity.side_entries() {
            self.kv.set(key, &value);
        }
        Ok(())
    }

    /// Removes the session, its mirror entries, and every cache entry
    /// under the identity's namespace. Safe to call repeatedly.
    pub fn clear(&self) {
        for key in I::clear_keys() {
            self.kv.remove(key);
        }
        if let Some(prefix) = I::cache_namespace() {
            for key in self.kv.keys() {
                if key.starts_with(prefix) {
                    self.kv.remove(&key);
                }
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.load().is_some()
    }

    /// Writes a cache entry under the identity's namespace so logout
    /// sweeps it with the session.
    pub fn cache_set(&self, key: &str, value: &str) {
        self.kv.set(&self.cache_key(key), value);
    }

    pub fn cache_get(&self, key: &str) -> Option<String> {
        self.kv.get(&self.cache_key(key))
    }

    fn cache_key(&self, key: &str) -> String {
        match I::cache_namespace() {
            Some(prefix) => format!("{prefix}{key}"),
            None => key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{StaffIdentity, StudentIdentity};
    use crate::storage::MemoryKvStore;
    use crate::testutil::{make_token, staff_identity, student_identity};
    use shared::policy::StaffRole;

    fn kv() -> Arc<MemoryKvStore> {
        Arc::new(MemoryKvStore::new())
    }

    #[test]
    fn test_save_load_round_trip() {
        let kv = kv();
        let store = SessionStore::<StaffIdentity>::new(kv.clone());

        let session = Session::new(staff_identity(StaffRole::Manager, Some(3)));
        store.save(&session).unwrap();

        let loaded = store.load().expect("session restored");
        assert_eq!(loaded.identity.username, "mira");
        assert_eq!(loaded.identity.role, StaffRole::Manager);
        assert_eq!(loaded.identity.branch_id, Some(3));

        // mirror entry sits beside the blob
        assert_eq!(kv.get("userRole").as_deref(), Some("manager"));
    }

    #[test]
    fn test_malformed_blob_clears_silently() {
        let kv = kv();
        kv.set("user", "{ not json");
        kv.set("userRole", "manager");

        let store = SessionStore::<StaffIdentity>::new(kv.clone());
        assert!(store.load().is_none());

        // storage swept, not left half-broken
        assert_eq!(kv.get("user"), None);
        assert_eq!(kv.get("userRole"), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_invalid_identity_clears_silently() {
        let kv = kv();
        // manager persisted without a branch: shape check must reject it
        let raw = format!(
            r#"{{"identity":{{"id":"11","username":"mira","role":"manager","branchId":null,"permissions":[],"token":"{}"}},"issuedAt":1}}"#,
            make_token(9_999_999_999)
        );
        kv.set("user", &raw);

        let store = SessionStore::<StaffIdentity>::new(kv.clone());
        assert!(store.load().is_none());
        assert_eq!(kv.get("user"), None);
    }

    #[test]
    fn test_expired_session_clears_on_load() {
        let kv = kv();
        let store = SessionStore::<StaffIdentity>::new(kv.clone());

        let mut identity = staff_identity(StaffRole::Manager, Some(3));
        identity.token = make_token(1_000);
        store.save(&Session::new(identity)).unwrap();

        assert!(store.load().is_none());
        assert_eq!(kv.get("user"), None);
    }

    #[test]
    fn test_save_rejects_invalid_identity() {
        let store = SessionStore::<StaffIdentity>::new(kv());
        let session = Session::new(staff_identity(StaffRole::Trainer, None));
        assert!(store.save(&session).is_err());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let kv = kv();
        let store = SessionStore::<StaffIdentity>::new(kv.clone());
        store
            .save(&Session::new(staff_identity(StaffRole::Admin, None)))
            .unwrap();

        store.clear();
        store.clear();
        assert_eq!(kv.get("user"), None);
        assert_eq!(kv.get("userRole"), None);
    }

    #[test]
    fn test_student_logout_sweeps_namespace() {
        let kv = kv();
        let store = SessionStore::<StudentIdentity>::new(kv.clone());

        store.save(&Session::new(student_identity())).unwrap();
        store.cache_set("attendance", "[...]");
        store.cache_set("fees", "[...]");
        kv.set("theme", "dark"); // unrelated entry survives the sweep

        assert_eq!(store.cache_get("attendance").as_deref(), Some("[...]"));
        assert_eq!(kv.get("student:attendance").as_deref(), Some("[...]"));

        store.clear();

        assert_eq!(kv.get("student"), None);
        assert_eq!(kv.get("studentToken"), None);
        assert_eq!(kv.get("student:attendance"), None);
        assert_eq!(kv.get("student:fees"), None);
        assert_eq!(kv.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_identity_spaces_do_not_cross() {
        let kv = kv();
        let staff_store = SessionStore::<StaffIdentity>::new(kv.clone());
        let student_store = SessionStore::<StudentIdentity>::new(kv.clone());

        staff_store
            .save(&Session::new(staff_identity(StaffRole::Manager, Some(3))))
            .unwrap();

        // a staff login never satisfies the student space
        assert!(student_store.load().is_none());
        assert!(!student_store.is_authenticated());

        // and clearing the student space leaves the staff session alone
        student_store.clear();
        assert!(staff_store.is_authenticated());
    }
}
