use fetchrx::{FetchStreamExt, State, StateStore};
use futures::future;
use futures::stream::StreamExt;

#[derive(Clone, Debug, Default, PartialEq)]
struct Tally {
    count: i32,
}

impl State for Tally {}

impl Tally {
    fn add(self, value: i32) -> Self {
        Self {
            count: self.count + value,
        }
    }
}

#[tokio::test]
async fn test_updates_apply_in_order() {
    let store = StateStore::new(Tally::default());
    store.set_state(|state| state.add(1)).expect("store alive");
    store.set_state(|state| state.add(10)).expect("store alive");
    store
        .set_state(|state| Tally {
            count: state.count * 2,
        })
        .expect("store alive");

    let state = store.await_state().await.expect("store alive");
    assert_eq!(state.count, 22);
}

#[tokio::test]
async fn test_with_state_sees_queued_updates() {
    let store = StateStore::new(Tally::default());
    let (tx, rx) = tokio::sync::oneshot::channel();
    store.set_state(|state| state.add(5)).expect("store alive");
    store
        .with_state(move |state| {
            let _ = tx.send(state.count);
        })
        .expect("store alive");

    assert_eq!(rx.await.expect("inspector ran"), 5);
}

#[tokio::test]
async fn test_get_state_returns_current_snapshot() {
    let store = StateStore::new(Tally { count: 3 });
    assert_eq!(store.get_state().count, 3);
}

#[tokio::test]
async fn test_stream_stops_when_predicate_matches() {
    let store = StateStore::new(Tally::default());
    for _ in 0..5 {
        store.set_state(|state| state.add(1)).expect("store alive");
    }

    let mut last = None;
    store
        .to_stream()
        .stop_if(|state| state.count >= 5)
        .for_each(|state| {
            last = Some(state);
            future::ready(())
        })
        .await;

    assert_eq!(last.map(|state| state.count), Some(5));
}
