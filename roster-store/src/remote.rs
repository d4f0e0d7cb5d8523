use crate::config::RemoteSearchConfig;
use crate::error::Result;
use crate::store::MemoryRoster;
use async_trait::async_trait;
use composer_member_search::{GuildId, RemoteMemberSearch, RosterEntry};
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

/// Transport for the remote member search endpoint.
#[async_trait]
pub trait MemberSearchClient: Send + Sync {
    async fn search_members(
        &self,
        guild_id: GuildId,
        query: &str,
        limit: u32,
    ) -> anyhow::Result<Vec<RosterEntry>>;
}

#[async_trait]
impl<T: MemberSearchClient + ?Sized> MemberSearchClient for Arc<T> {
    async fn search_members(
        &self,
        guild_id: GuildId,
        query: &str,
        limit: u32,
    ) -> anyhow::Result<Vec<RosterEntry>> {
        (**self).search_members(guild_id, query, limit).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Granted,
    Repeated,
    TooSoon,
}

struct SearchThrottle {
    last_search: HashMap<GuildId, Instant>,
    recent: LruCache<(GuildId, String), ()>,
}

impl SearchThrottle {
    fn new(capacity: NonZeroUsize) -> Self {
        Self {
            last_search: HashMap::new(),
            recent: LruCache::new(capacity),
        }
    }

    fn admit(
        &mut self,
        guild_id: GuildId,
        query: &str,
        now: Instant,
        min_interval: Duration,
    ) -> Admission {
        let key = (guild_id, query.to_lowercase());
        if self.recent.get(&key).is_some() {
            return Admission::Repeated;
        }
        if let Some(last) = self.last_search.get(&guild_id) {
            if now.duration_since(*last) < min_interval {
                return Admission::TooSoon;
            }
        }
        self.last_search.insert(guild_id, now);
        self.recent.put(key, ());
        Admission::Granted
    }

    fn forget(&mut self, guild_id: GuildId, query: &str) {
        self.recent.pop(&(guild_id, query.to_lowercase()));
    }
}

/// Remote member search that writes its results into a [`MemoryRoster`].
///
/// Requests are throttled per guild and identical recent queries are skipped.
/// A failed request is logged and forgotten so a later keystroke can retry it.
pub struct RemoteMemberSearcher<C> {
    client: C,
    store: Arc<MemoryRoster>,
    config: RemoteSearchConfig,
    throttle: Mutex<SearchThrottle>,
}

impl<C: MemberSearchClient> RemoteMemberSearcher<C> {
    pub fn new(client: C, store: Arc<MemoryRoster>) -> Self {
        Self::build(client, store, RemoteSearchConfig::default())
    }

    pub fn with_config(
        client: C,
        store: Arc<MemoryRoster>,
        config: RemoteSearchConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(client, store, config))
    }

    fn build(client: C, store: Arc<MemoryRoster>, config: RemoteSearchConfig) -> Self {
        let capacity = NonZeroUsize::new(config.recent_queries).unwrap_or(NonZeroUsize::MIN);
        Self {
            client,
            store,
            config,
            throttle: Mutex::new(SearchThrottle::new(capacity)),
        }
    }

    pub fn store(&self) -> &Arc<MemoryRoster> {
        &self.store
    }

    pub fn config(&self) -> &RemoteSearchConfig {
        &self.config
    }

    fn admit(&self, guild_id: GuildId, query: &str) -> Admission {
        self.lock_throttle()
            .admit(guild_id, query, Instant::now(), self.config.min_interval())
    }

    fn lock_throttle(&self) -> MutexGuard<'_, SearchThrottle> {
        match self.throttle.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl<C: MemberSearchClient> RemoteMemberSearch for RemoteMemberSearcher<C> {
    async fn request_member_search(&self, guild_id: GuildId, query: String) {
        let admission = self.admit(guild_id, &query);
        if admission != Admission::Granted {
            trace!("skipping member search {query:?} in guild {guild_id}: {admission:?}");
            return;
        }

        match self
            .client
            .search_members(guild_id, &query, self.config.result_limit)
            .await
        {
            Ok(members) => {
                let fetched = members.len();
                let added = self.store.upsert_members(guild_id, members);
                debug!(
                    "member search {query:?} in guild {guild_id}: {fetched} fetched, {added} new"
                );
            }
            Err(err) => {
                self.lock_throttle().forget(guild_id, &query);
                warn!("member search {query:?} in guild {guild_id} failed: {err:?}");
            }
        }
    }
}
