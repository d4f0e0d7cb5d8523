use composer_member_search::{
    ChannelId, ChannelScope, GuildId, RosterEntry, RosterSource, User, UserId,
};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A channel as recorded by the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRecord {
    Guild(GuildId),
    Direct { recipients: Vec<User> },
}

#[derive(Default)]
struct RosterTables {
    channels: HashMap<ChannelId, ChannelRecord>,
    members: HashMap<GuildId, IndexMap<UserId, RosterEntry>>,
}

/// In-memory channel and member store.
///
/// Guild members keep first-seen order; an upsert for a known user replaces
/// the entry in place.
#[derive(Default)]
pub struct MemoryRoster {
    tables: RwLock<RosterTables>,
}

impl MemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_channel(&self, channel_id: ChannelId, record: ChannelRecord) {
        self.write().channels.insert(channel_id, record);
    }

    pub fn insert_guild_channel(&self, channel_id: ChannelId, guild_id: GuildId) {
        self.insert_channel(channel_id, ChannelRecord::Guild(guild_id));
    }

    pub fn insert_direct_channel(&self, channel_id: ChannelId, recipients: Vec<User>) {
        self.insert_channel(channel_id, ChannelRecord::Direct { recipients });
    }

    pub fn remove_channel(&self, channel_id: ChannelId) -> Option<ChannelRecord> {
        self.write().channels.remove(&channel_id)
    }

    /// Drop whatever was known about `guild_id` and store `members` instead.
    pub fn replace_members(&self, guild_id: GuildId, members: Vec<RosterEntry>) {
        let table = members
            .into_iter()
            .map(|entry| (entry.user.id, entry))
            .collect();
        self.write().members.insert(guild_id, table);
    }

    /// Merge `members` into the guild's list. Returns how many were new.
    pub fn upsert_members(&self, guild_id: GuildId, members: Vec<RosterEntry>) -> usize {
        let mut tables = self.write();
        let table = tables.members.entry(guild_id).or_default();
        let mut added = 0;
        for entry in members {
            if table.insert(entry.user.id, entry).is_none() {
                added += 1;
            }
        }
        added
    }

    pub fn remove_member(&self, guild_id: GuildId, user_id: UserId) -> bool {
        self.write()
            .members
            .get_mut(&guild_id)
            .and_then(|table| table.shift_remove(&user_id))
            .is_some()
    }

    pub fn member(&self, guild_id: GuildId, user_id: UserId) -> Option<RosterEntry> {
        self.read()
            .members
            .get(&guild_id)
            .and_then(|table| table.get(&user_id))
            .cloned()
    }

    pub fn member_count(&self, guild_id: GuildId) -> usize {
        self.read().members.get(&guild_id).map_or(0, IndexMap::len)
    }

    fn read(&self) -> RwLockReadGuard<'_, RosterTables> {
        match self.tables.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, RosterTables> {
        match self.tables.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl RosterSource for MemoryRoster {
    fn resolve_channel(&self, channel_id: ChannelId) -> Option<ChannelScope> {
        self.read()
            .channels
            .get(&channel_id)
            .map(|record| match record {
                ChannelRecord::Guild(guild_id) => ChannelScope::Guild(*guild_id),
                ChannelRecord::Direct { .. } => ChannelScope::Direct,
            })
    }

    fn members_of(&self, guild_id: GuildId) -> Vec<RosterEntry> {
        self.read()
            .members
            .get(&guild_id)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default()
    }

    fn dm_participants_of(&self, channel_id: ChannelId) -> Vec<User> {
        match self.read().channels.get(&channel_id) {
            Some(ChannelRecord::Direct { recipients }) => recipients.clone(),
            _ => Vec::new(),
        }
    }
}
