//! Per-user token storage

use crate::cache::{Clock, SystemClock, TtlCache};
use crate::music::client::TokenSet;
use std::sync::Mutex;

/// Access tokens keyed by music account id, expiring with the token
#[derive(Debug)]
pub struct MusicTokenStore<C: Clock = SystemClock> {
    cache: Mutex<TtlCache<String, TokenSet, C>>,
}

impl Default for MusicTokenStore<SystemClock> {
    fn default() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> MusicTokenStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            cache: Mutex::new(TtlCache::with_clock(clock)),
        }
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, TtlCache<String, TokenSet, C>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn store(&self, user_id: &str, tokens: TokenSet) {
        let ttl = tokens.lifetime();
        self.cache().put(user_id.to_string(), tokens, ttl);
    }

    /// Live access token for `user_id`
    pub fn access_token(&self, user_id: &str) -> Option<String> {
        self.cache()
            .get(&user_id.to_string())
            .map(|tokens| tokens.access_token.clone())
    }

    pub fn forget(&self, user_id: &str) {
        self.cache().remove(&user_id.to_string());
    }

    pub fn evict_expired(&self) -> usize {
        self.cache().evict_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use std::time::Duration;

    fn tokens(access: &str, expires_in: u64) -> TokenSet {
        TokenSet {
            access_token: access.to_string(),
            token_type: Some("Bearer".to_string()),
            expires_in,
            refresh_token: None,
            scope: None,
        }
    }

    #[test]
    fn test_token_expires_with_lifetime() {
        let clock = ManualClock::new();
        let store = MusicTokenStore::with_clock(clock.clone());
        store.store("listener", tokens("abc", 3600));
        assert_eq!(store.access_token("listener").as_deref(), Some("abc"));

        clock.advance(Duration::from_secs(3600));
        assert_eq!(store.access_token("listener"), None);
        assert_eq!(store.evict_expired(), 1);
    }

    #[test]
    fn test_unbounded_lifetime_from_provider() {
        let store = MusicTokenStore::with_clock(ManualClock::new());
        store.store("listener", tokens("abc", u64::MAX));
        assert_eq!(store.access_token("listener").as_deref(), Some("abc"));
    }

    #[test]
    fn test_reconnect_replaces_token() {
        let store: MusicTokenStore = MusicTokenStore::default();
        store.store("listener", tokens("old", 60));
        store.store("listener", tokens("new", 60));
        assert_eq!(store.access_token("listener").as_deref(), Some("new"));
        store.forget("listener");
        assert_eq!(store.access_token("listener"), None);
    }
}
