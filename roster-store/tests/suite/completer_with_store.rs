use async_trait::async_trait;
use composer_member_search::{
    Candidate, ChannelBinding, ChannelId, GuildId, MemberCompleter, RosterEntry, User, UserId,
};
use composer_roster_store::{MemberSearchClient, MemoryRoster, RemoteMemberSearcher};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const CHANNEL: ChannelId = ChannelId(100);
const GUILD: GuildId = GuildId(7);
const TTL: Duration = Duration::from_secs(2);

fn member(id: u64, username: &str, discriminator: &str) -> RosterEntry {
    RosterEntry::from_user(User::new(UserId(id), username).with_discriminator(discriminator))
}

/// Serves members whose username starts with the query.
struct DirectoryClient {
    directory: Vec<RosterEntry>,
    fail: bool,
    calls: AtomicUsize,
}

impl DirectoryClient {
    fn new(directory: Vec<RosterEntry>) -> Arc<Self> {
        Arc::new(Self {
            directory,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            directory: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl MemberSearchClient for DirectoryClient {
    async fn search_members(
        &self,
        guild_id: GuildId,
        query: &str,
        limit: u32,
    ) -> anyhow::Result<Vec<RosterEntry>> {
        assert_eq!(guild_id, GUILD);
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("member search rejected");
        }
        let query = query.to_lowercase();
        Ok(self
            .directory
            .iter()
            .filter(|entry| entry.user.username.starts_with(&query))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

fn tags(results: &[Candidate]) -> Vec<String> {
    results.iter().map(Candidate::tag).collect()
}

async fn wait_for_members(store: &MemoryRoster, guild_id: GuildId, count: usize) {
    for _ in 0..100 {
        if store.member_count(guild_id) >= count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("guild {guild_id} never reached {count} members");
}

async fn wait_for_calls(client: &DirectoryClient, count: usize) {
    for _ in 0..100 {
        if client.calls.load(Ordering::SeqCst) >= count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("client never saw {count} calls");
}

#[tokio::test(start_paused = true)]
async fn remote_results_appear_after_next_refresh() {
    let store = Arc::new(MemoryRoster::new());
    store.insert_guild_channel(CHANNEL, GUILD);
    store.replace_members(GUILD, vec![member(2, "bob", "2")]);

    let client = DirectoryClient::new(vec![member(1, "alice", "1"), member(3, "alina", "3")]);
    let remote = Arc::new(RemoteMemberSearcher::new(Arc::clone(&client), Arc::clone(&store)));
    let completer = MemberCompleter::new(CHANNEL, store.clone(), remote);

    assert!(completer.search("ali").is_empty());
    wait_for_members(&store, GUILD, 3).await;

    // The fetched roster is still fresh, so the new members stay invisible.
    assert!(completer.search("ali").is_empty());

    tokio::time::advance(TTL + Duration::from_millis(1)).await;
    let mut found = tags(&completer.search("ali"));
    found.sort();
    assert_eq!(found, vec!["alice#1".to_string(), "alina#3".to_string()]);
    assert_eq!(completer.binding(), ChannelBinding::Guild(GUILD));
}

#[tokio::test]
async fn direct_channel_uses_recipients_from_store() {
    let store = Arc::new(MemoryRoster::new());
    store.insert_direct_channel(
        CHANNEL,
        vec![
            User::new(UserId(1), "alice").with_discriminator("1"),
            User::new(UserId(2), "bob").with_discriminator("2"),
        ],
    );
    let client = DirectoryClient::new(Vec::new());
    let remote = Arc::new(RemoteMemberSearcher::new(Arc::clone(&client), Arc::clone(&store)));
    let completer = MemberCompleter::new(CHANNEL, store, remote);

    assert_eq!(tags(&completer.search("ali")), vec!["alice#1".to_string()]);
    assert!(completer.search("zzz").is_empty());

    tokio::task::yield_now().await;
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failing_remote_search_leaves_local_results_intact() {
    let store = Arc::new(MemoryRoster::new());
    store.insert_guild_channel(CHANNEL, GUILD);
    store.replace_members(GUILD, vec![member(1, "alice", "1")]);

    let client = DirectoryClient::failing();
    let remote = Arc::new(RemoteMemberSearcher::new(Arc::clone(&client), Arc::clone(&store)));
    let completer = MemberCompleter::new(CHANNEL, store.clone(), remote);

    assert_eq!(tags(&completer.search("alice")), vec!["alice#1".to_string()]);
    wait_for_calls(&client, 1).await;

    assert_eq!(store.member_count(GUILD), 1);
    assert_eq!(tags(&completer.search("alice")), vec!["alice#1".to_string()]);
}

#[tokio::test]
async fn channel_added_later_is_picked_up() {
    let store = Arc::new(MemoryRoster::new());
    let client = DirectoryClient::new(Vec::new());
    let remote = Arc::new(RemoteMemberSearcher::new(Arc::clone(&client), Arc::clone(&store)));
    let completer = MemberCompleter::new(CHANNEL, store.clone(), remote);

    assert!(completer.search("ali").is_empty());
    assert_eq!(completer.binding(), ChannelBinding::Unresolved);

    store.insert_guild_channel(CHANNEL, GUILD);
    store.replace_members(GUILD, vec![member(1, "alice", "1")]);
    assert_eq!(tags(&completer.search("ali")), vec!["alice#1".to_string()]);
    assert_eq!(completer.binding(), ChannelBinding::Guild(GUILD));
}
