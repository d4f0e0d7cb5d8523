use super::support::{CHANNEL, GUILD, RecordingRemote, StalledRemote, StubSource, member, user};
use composer_member_search::MemberCompleter;
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::timeout;

#[tokio::test]
async fn short_queries_stay_local() {
    let (remote, mut rx) = RecordingRemote::new();
    let completer = MemberCompleter::new(
        CHANNEL,
        StubSource::guild(vec![member(1, "alice", "1")]),
        remote,
    );

    completer.search("a");
    completer.search("al");
    tokio::task::yield_now().await;

    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn long_queries_request_remote_search_for_the_guild() {
    let (remote, mut rx) = RecordingRemote::new();
    let completer = MemberCompleter::new(
        CHANNEL,
        StubSource::guild(vec![member(1, "alice", "1")]),
        remote,
    );

    assert_eq!(completer.search("ali").len(), 1);
    let request = timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
    assert_eq!(request, Some((GUILD, "ali".to_string())));

    // Cache hits still forward the query.
    completer.search("alic");
    let request = timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
    assert_eq!(request, Some((GUILD, "alic".to_string())));
}

#[tokio::test]
async fn direct_message_channels_never_request_remote_search() {
    let (remote, mut rx) = RecordingRemote::new();
    let completer = MemberCompleter::new(
        CHANNEL,
        StubSource::direct(vec![user(1, "alice", "1")]),
        remote,
    );

    assert_eq!(completer.search("alice").len(), 1);
    tokio::task::yield_now().await;
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn unresolved_channels_never_request_remote_search() {
    let (remote, mut rx) = RecordingRemote::new();
    let completer = MemberCompleter::new(CHANNEL, StubSource::unknown(), remote);

    assert!(completer.search("alice").is_empty());
    tokio::task::yield_now().await;
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn stalled_remote_search_does_not_block_results() {
    let (remote, mut rx) = StalledRemote::new();
    let completer = MemberCompleter::new(
        CHANNEL,
        StubSource::guild(vec![member(1, "alice", "1"), member(2, "bob", "2")]),
        remote,
    );

    let started = std::time::Instant::now();
    let first = completer.search("ali");
    let second = completer.search("bob");
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);

    // Both requests were dispatched and are still hanging in the background.
    let request = timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
    assert_eq!(request, Some((GUILD, "ali".to_string())));
    let request = timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
    assert_eq!(request, Some((GUILD, "bob".to_string())));
}

#[test]
fn search_without_runtime_skips_remote_and_still_ranks() {
    let (remote, mut rx) = RecordingRemote::new();
    let completer = MemberCompleter::new(
        CHANNEL,
        StubSource::guild(vec![member(1, "alice", "1")]),
        remote,
    );

    assert_eq!(completer.search("alice").len(), 1);
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}
