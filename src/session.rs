use crate::ledger::Ledger;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};
use rand::{rngs::OsRng, RngCore};
use std::collections::HashMap;
use std::convert::Infallible;
use std::time::{Duration, Instant};

pub const SESSION_COOKIE: &str = "aquatrack_session";
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 4096;

/// Wallet and ledger for one browser session.
#[derive(Debug)]
pub struct Session {
    pub wallet: Option<String>,
    pub ledger: Ledger,
    pub last_seen: Instant,
}

impl Session {
    pub fn new(now: Instant) -> Self {
        Self {
            wallet: None,
            ledger: Ledger::new(),
            last_seen: now,
        }
    }
}

/// In-memory sessions. Idle sessions are dropped on the next access, and the
/// least recently seen one makes room once `max_sessions` is reached.
#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Returns the live session for `id` and marks it as seen.
    pub fn lookup(&mut self, id: &str, now: Instant) -> Option<&mut Session> {
        self.evict_idle(now);
        let session = self.sessions.get_mut(id)?;
        session.last_seen = now;
        Some(session)
    }

    /// Returns the live session for `id`, or starts a fresh one under a new id.
    pub fn get_or_create(&mut self, id: Option<&str>, now: Instant) -> (String, &mut Session, bool) {
        self.evict_idle(now);
        let existing = id.filter(|id| self.sessions.contains_key(*id)).map(str::to_string);
        let (id, created) = match existing {
            Some(id) => (id, false),
            None => {
                self.make_room();
                (new_session_id(), true)
            }
        };
        let session = self
            .sessions
            .entry(id.clone())
            .or_insert_with(|| Session::new(now));
        session.last_seen = now;
        (id, session, created)
    }

    pub fn remove(&mut self, id: &str) -> Option<Session> {
        self.sessions.remove(id)
    }

    pub fn evict_idle(&mut self, now: Instant) -> usize {
        let before = self.sessions.len();
        let idle_timeout = self.idle_timeout;
        self.sessions
            .retain(|_, session| now.saturating_duration_since(session.last_seen) < idle_timeout);
        before - self.sessions.len()
    }

    fn make_room(&mut self) {
        while self.sessions.len() >= self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|(_, session)| session.last_seen)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    self.sessions.remove(&id);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn new_session_id() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// Response part that sets or clears the session cookie.
#[derive(Debug)]
pub enum SessionCookie {
    Keep,
    Set(String),
    Clear,
}

impl IntoResponseParts for SessionCookie {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let value = match self {
            Self::Keep => return Ok(res),
            Self::Set(id) => format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax"),
            Self::Clear => format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
        };
        // Session ids are hex, so the header value is always valid ASCII.
        if let Ok(value) = HeaderValue::from_str(&value) {
            res.headers_mut().append(header::SET_COOKIE, value);
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; aquatrack_session=abc123; lang=en"),
        );
        assert_eq!(session_id(&headers).as_deref(), Some("abc123"));
        assert_eq!(session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn unknown_id_starts_new_session() {
        let now = Instant::now();
        let mut store = SessionStore::default();
        let (id, session, created) = store.get_or_create(Some("stale"), now);
        session.wallet = Some("0xabc".into());

        assert!(created);
        assert_ne!(id, "stale");
        assert_eq!(id.len(), 32);

        let (again, session, created) = store.get_or_create(Some(id.as_str()), now);
        assert!(!created);
        assert_eq!(again, id);
        assert_eq!(session.wallet.as_deref(), Some("0xabc"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn removed_session_is_gone() {
        let now = Instant::now();
        let mut store = SessionStore::default();
        let (id, _, _) = store.get_or_create(None, now);
        assert!(store.remove(&id).is_some());
        assert!(store.lookup(&id, now).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn idle_sessions_are_evicted() {
        let start = Instant::now();
        let idle = Duration::from_secs(60);
        let mut store = SessionStore::new(idle, 16);
        let (quiet, _, _) = store.get_or_create(None, start);
        let (busy, _, _) = store.get_or_create(None, start);

        assert!(store.lookup(&busy, start + Duration::from_secs(45)).is_some());
        assert!(store.lookup(&quiet, start + Duration::from_secs(61)).is_none());
        assert!(store.lookup(&busy, start + Duration::from_secs(100)).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn store_never_exceeds_its_cap() {
        let start = Instant::now();
        let mut store = SessionStore::default();
        for i in 0..10_000u64 {
            store.get_or_create(None, start + Duration::from_millis(i));
        }
        assert_eq!(store.len(), DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn full_store_drops_least_recently_seen() {
        let start = Instant::now();
        let mut store = SessionStore::new(Duration::from_secs(3600), 2);
        let (first, _, _) = store.get_or_create(None, start);
        let (second, _, _) = store.get_or_create(None, start + Duration::from_secs(1));
        store.lookup(&first, start + Duration::from_secs(2));

        let (third, _, _) = store.get_or_create(None, start + Duration::from_secs(3));

        assert_eq!(store.len(), 2);
        assert!(store.lookup(&second, start + Duration::from_secs(4)).is_none());
        assert!(store.lookup(&first, start + Duration::from_secs(4)).is_some());
        assert!(store.lookup(&third, start + Duration::from_secs(4)).is_some());
    }
}
