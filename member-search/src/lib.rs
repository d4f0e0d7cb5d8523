/*!
# Member Search

Time-bounded fuzzy search over a chat channel's member roster, used to turn a
partial `@mention` into a short ranked list of members while the user types.

## Architecture

```text
query
  └─> MemberCompleter::search
        ├─> cache fresh? ──yes──┐
        │     no                │
        ├─> resolve binding (once per completer)
        ├─> reload roster from RosterSource
        ├─> query long enough? ─> spawn RemoteMemberSearch (detached)
        └─> FuzzyRanker (nucleo-matcher) ─> top-K Candidates
```

Remote results never reach the caller of `search` directly. They land in the
roster source's own store and show up after the next cache refresh.

## Example

```rust,no_run
use composer_member_search::{ChannelId, Completer, MemberCompleter};
# use composer_member_search::{ChannelScope, GuildId, RemoteMemberSearch, RosterEntry, RosterSource, User};
# use std::sync::Arc;
# struct Store;
# impl RosterSource for Store {
#     fn resolve_channel(&self, _: ChannelId) -> Option<ChannelScope> { None }
#     fn members_of(&self, _: GuildId) -> Vec<RosterEntry> { Vec::new() }
#     fn dm_participants_of(&self, _: ChannelId) -> Vec<User> { Vec::new() }
# }
# struct Remote;
# #[async_trait::async_trait]
# impl RemoteMemberSearch for Remote {
#     async fn request_member_search(&self, _: GuildId, _: String) {}
# }

let completer = MemberCompleter::new(ChannelId(42), Arc::new(Store), Arc::new(Remote));
for candidate in completer.search("ali") {
    println!("{}. {}", candidate.rank + 1, candidate.tag());
}
```
*/

mod completer;
mod config;
mod error;
mod model;
mod ranking;
mod source;

pub use completer::{ChannelBinding, Completer, MemberCompleter};
pub use config::MemberSearchConfig;
pub use error::{MemberSearchError, Result};
pub use model::{Candidate, CandidateLabel, ChannelId, GuildId, RosterEntry, User, UserId};
pub use ranking::{FuzzyRanker, RankedMatch, SearchableRoster};
pub use source::{ChannelScope, RemoteMemberSearch, RosterSource};
