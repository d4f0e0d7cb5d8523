use serde::{Deserialize, Serialize};
use std::fmt;

const CDN_BASE_URL: &str = "https://cdn.discordapp.com";
const MIN_AVATAR_SIZE: u32 = 16;
const MAX_AVATAR_SIZE: u32 = 4096;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

snowflake!(
    /// Identifier of a text channel, guild or direct.
    ChannelId
);
snowflake!(
    /// Identifier of a guild (server).
    GuildId
);
snowflake!(
    /// Identifier of a user account.
    UserId
);

/// A user account as seen by every channel it takes part in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    /// Unique handle, without the discriminator
    pub username: String,

    /// Legacy four digit discriminator; `None` or `"0"` for new-style handles
    #[serde(default)]
    pub discriminator: Option<String>,

    /// Global display name chosen by the user
    #[serde(default)]
    pub global_name: Option<String>,

    /// Avatar image hash
    #[serde(default)]
    pub avatar: Option<String>,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            discriminator: None,
            global_name: None,
            avatar: None,
        }
    }

    pub fn with_discriminator(mut self, discriminator: impl Into<String>) -> Self {
        self.discriminator = Some(discriminator.into());
        self
    }

    pub fn with_global_name(mut self, global_name: impl Into<String>) -> Self {
        self.global_name = Some(global_name.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// `username#discriminator` for legacy accounts, the bare username otherwise.
    pub fn tag(&self) -> String {
        match self.legacy_discriminator() {
            Some(discriminator) => format!("{}#{discriminator}", self.username),
            None => self.username.clone(),
        }
    }

    /// Name to show when no nickname applies.
    pub fn display_name(&self) -> &str {
        match self.global_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.username,
        }
    }

    /// PNG avatar URL at `size` pixels, rounded up to a power of two the CDN
    /// accepts. Users without an avatar get their default avatar.
    pub fn avatar_url(&self, size: u32) -> String {
        let size = size
            .clamp(MIN_AVATAR_SIZE, MAX_AVATAR_SIZE)
            .next_power_of_two();
        match self.avatar.as_deref() {
            Some(hash) => format!("{CDN_BASE_URL}/avatars/{}/{hash}.png?size={size}", self.id),
            None => format!(
                "{CDN_BASE_URL}/embed/avatars/{}.png?size={size}",
                self.default_avatar_index()
            ),
        }
    }

    fn legacy_discriminator(&self) -> Option<&str> {
        self.discriminator
            .as_deref()
            .filter(|d| !d.is_empty() && *d != "0")
    }

    fn default_avatar_index(&self) -> u64 {
        match self
            .legacy_discriminator()
            .and_then(|d| d.parse::<u64>().ok())
        {
            Some(discriminator) => discriminator % 5,
            None => (self.id.0 >> 22) % 6,
        }
    }
}

/// A member eligible for completion in one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub user: User,

    /// Guild nickname; always `None` for direct-message participants
    #[serde(default)]
    pub nickname: Option<String>,
}

impl RosterEntry {
    /// Wrap a bare user, e.g. a direct-message participant.
    pub fn from_user(user: User) -> Self {
        Self {
            user,
            nickname: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// The text the fuzzy matcher scores against: nickname, global display
    /// name and tag concatenated in that order with no separator.
    pub fn search_text(&self) -> String {
        let nickname = self.nickname.as_deref().unwrap_or_default();
        let global_name = self.user.global_name.as_deref().unwrap_or_default();
        let tag = self.user.tag();
        let mut text = String::with_capacity(nickname.len() + global_name.len() + tag.len());
        text.push_str(nickname);
        text.push_str(global_name);
        text.push_str(&tag);
        text
    }
}

/// One ranked completion produced by a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub entry: RosterEntry,

    /// Position in the result list (0 = best)
    pub rank: usize,

    /// Raw matcher score, higher is better
    pub score: u16,
}

/// Presentation-neutral text for a completion row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLabel {
    pub primary: String,
    pub secondary: Option<String>,
}

impl Candidate {
    pub fn new(entry: RosterEntry, score: u16) -> Self {
        Self {
            entry,
            rank: 0,
            score,
        }
    }

    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }

    pub fn user_id(&self) -> UserId {
        self.entry.user.id
    }

    pub fn nickname(&self) -> Option<&str> {
        self.entry.nickname.as_deref()
    }

    pub fn display_name(&self) -> &str {
        self.entry.user.display_name()
    }

    pub fn tag(&self) -> String {
        self.entry.user.tag()
    }

    pub fn avatar_url(&self, size: u32) -> String {
        self.entry.user.avatar_url(size)
    }

    /// Nickname over tag when a nickname is set, otherwise the tag alone.
    pub fn label(&self) -> CandidateLabel {
        match self.nickname().filter(|nick| !nick.is_empty()) {
            Some(nick) => CandidateLabel {
                primary: nick.to_string(),
                secondary: Some(self.tag()),
            },
            None => CandidateLabel {
                primary: self.tag(),
                secondary: None,
            },
        }
    }
}
