use crate::model::{ChannelId, GuildId, RosterEntry, User};
use async_trait::async_trait;

/// Where a channel's completion candidates come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelScope {
    /// A guild channel; candidates are the guild's known members
    Guild(GuildId),
    /// A direct-message channel; candidates are its recipients
    Direct,
}

/// Read-only view of the local channel and member store.
///
/// Implementations are expected to answer from memory. `resolve_channel`
/// returning `None` means the channel is not known *yet*; callers retry later.
pub trait RosterSource: Send + Sync {
    fn resolve_channel(&self, channel_id: ChannelId) -> Option<ChannelScope>;

    /// Members currently known locally for `guild_id`, in store order.
    fn members_of(&self, guild_id: GuildId) -> Vec<RosterEntry>;

    fn dm_participants_of(&self, channel_id: ChannelId) -> Vec<User>;
}

/// Asks a remote service for more members matching `query`.
///
/// Callers spawn this and never join it. Results must be written back into
/// the store behind [`RosterSource`]; failures are the implementation's to
/// log or retry.
#[async_trait]
pub trait RemoteMemberSearch: Send + Sync {
    async fn request_member_search(&self, guild_id: GuildId, query: String);
}
