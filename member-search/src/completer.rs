use crate::config::MemberSearchConfig;
use crate::error::Result;
use crate::model::{Candidate, ChannelId, GuildId, RosterEntry};
use crate::ranking::FuzzyRanker;
use crate::source::{ChannelScope, RemoteMemberSearch, RosterSource};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::time::Instant;
use tracing::{debug, trace};

/// A completion provider hosted by a message composer.
pub trait Completer: Send + Sync {
    /// Character that starts a completion, e.g. `@`.
    fn trigger(&self) -> char;

    /// Ranked candidates for the text typed after the trigger.
    fn search(&self, query: &str) -> Vec<Candidate>;
}

/// What a completer's channel resolved to.
///
/// Starts `Unresolved` and moves to `Guild` or `Direct` at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelBinding {
    Unresolved,
    Guild(GuildId),
    Direct,
}

struct CachedRoster {
    entries: Vec<RosterEntry>,
    fetched_at: Instant,
}

struct CompleterState {
    binding: ChannelBinding,
    roster: Option<CachedRoster>,
    ranker: FuzzyRanker,
}

/// Completes `@member` mentions for one channel.
///
/// The roster is loaded lazily and reused for `cache_ttl` so fast typing does
/// not rescore a freshly copied roster on every keystroke. Long enough queries
/// also ask the remote service for more members; those arrive through the
/// [`RosterSource`] on a later refresh.
pub struct MemberCompleter {
    channel_id: ChannelId,
    config: MemberSearchConfig,
    source: Arc<dyn RosterSource>,
    remote: Arc<dyn RemoteMemberSearch>,
    state: Mutex<CompleterState>,
}

impl MemberCompleter {
    pub fn new(
        channel_id: ChannelId,
        source: Arc<dyn RosterSource>,
        remote: Arc<dyn RemoteMemberSearch>,
    ) -> Self {
        Self::build(channel_id, MemberSearchConfig::default(), source, remote)
    }

    pub fn with_config(
        channel_id: ChannelId,
        config: MemberSearchConfig,
        source: Arc<dyn RosterSource>,
        remote: Arc<dyn RemoteMemberSearch>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(channel_id, config, source, remote))
    }

    fn build(
        channel_id: ChannelId,
        config: MemberSearchConfig,
        source: Arc<dyn RosterSource>,
        remote: Arc<dyn RemoteMemberSearch>,
    ) -> Self {
        Self {
            channel_id,
            config,
            source,
            remote,
            state: Mutex::new(CompleterState {
                binding: ChannelBinding::Unresolved,
                roster: None,
                ranker: FuzzyRanker::new(),
            }),
        }
    }

    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    pub fn config(&self) -> &MemberSearchConfig {
        &self.config
    }

    pub fn binding(&self) -> ChannelBinding {
        self.lock_state().binding
    }

    /// Search the channel roster for `query`.
    ///
    /// Never fails: an unknown channel, an empty roster and a query with no
    /// match all yield an empty list.
    pub fn search(&self, query: &str) -> Vec<Candidate> {
        if query.is_empty() {
            return Vec::new();
        }

        // Held across check, refresh and rank so concurrent callers never
        // observe a roster and timestamp from different refreshes.
        let mut state = self.lock_state();
        let now = Instant::now();

        let ttl = self.config.cache_ttl();
        let fresh = state
            .roster
            .as_ref()
            .is_some_and(|roster| now.duration_since(roster.fetched_at) < ttl);
        if fresh {
            trace!("member cache hit for channel {}", self.channel_id);
        } else if !self.refresh(&mut state, now) {
            return Vec::new();
        }

        if query.chars().count() > self.config.remote_search_min_chars {
            self.dispatch_remote_search(state.binding, query);
        }

        let CompleterState { roster, ranker, .. } = &mut *state;
        let Some(roster) = roster.as_ref() else {
            return Vec::new();
        };
        ranker
            .rank(roster.entries.as_slice(), query, self.config.max_results)
            .iter()
            .enumerate()
            .map(|(rank, m)| {
                Candidate::new(roster.entries[m.index].clone(), m.score).with_rank(rank)
            })
            .collect()
    }

    /// Resolve the binding if needed and replace the cached roster. Returns
    /// false while the channel is still unknown.
    fn refresh(&self, state: &mut CompleterState, now: Instant) -> bool {
        if state.binding == ChannelBinding::Unresolved {
            state.binding = match self.source.resolve_channel(self.channel_id) {
                Some(ChannelScope::Guild(guild_id)) => ChannelBinding::Guild(guild_id),
                Some(ChannelScope::Direct) => ChannelBinding::Direct,
                None => {
                    debug!(
                        "channel {} not known yet; no member candidates",
                        self.channel_id
                    );
                    return false;
                }
            };
            debug!("channel {} bound to {:?}", self.channel_id, state.binding);
        }

        let entries = match state.binding {
            ChannelBinding::Guild(guild_id) => self.source.members_of(guild_id),
            ChannelBinding::Direct => self
                .source
                .dm_participants_of(self.channel_id)
                .into_iter()
                .map(RosterEntry::from_user)
                .collect(),
            ChannelBinding::Unresolved => return false,
        };
        debug!(
            "reloaded {} roster entries for channel {}",
            entries.len(),
            self.channel_id
        );

        state.roster = Some(CachedRoster {
            entries,
            fetched_at: now,
        });
        true
    }

    fn dispatch_remote_search(&self, binding: ChannelBinding, query: &str) {
        let ChannelBinding::Guild(guild_id) = binding else {
            return;
        };
        let Ok(handle) = Handle::try_current() else {
            debug!("no async runtime; skipping remote member search for guild {guild_id}");
            return;
        };

        let remote = Arc::clone(&self.remote);
        let query = query.to_string();
        // Detached: the result lands in the roster source, not here.
        handle.spawn(async move {
            remote.request_member_search(guild_id, query).await;
        });
    }

    fn lock_state(&self) -> MutexGuard<'_, CompleterState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Completer for MemberCompleter {
    fn trigger(&self) -> char {
        self.config.trigger
    }

    fn search(&self, query: &str) -> Vec<Candidate> {
        MemberCompleter::search(self, query)
    }
}
