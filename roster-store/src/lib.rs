//! # Roster Store
//!
//! In-memory channel and member store for the member completer, plus the
//! remote member search that feeds it.
//!
//! [`MemoryRoster`] implements [`composer_member_search::RosterSource`].
//! [`RemoteMemberSearcher`] implements
//! [`composer_member_search::RemoteMemberSearch`] on top of any
//! [`MemberSearchClient`]: it throttles requests per guild, skips queries it
//! asked recently, and merges what comes back into the shared store so the
//! completer sees it on its next roster refresh.

mod config;
mod error;
mod remote;
mod store;

pub use config::{MAX_RESULT_LIMIT, RemoteSearchConfig};
pub use error::{Result, RosterStoreError};
pub use remote::{MemberSearchClient, RemoteMemberSearcher};
pub use store::{ChannelRecord, MemoryRoster};
