use fetchrx::{FetchStore, JsonFetchState};
use std::time::Duration;
use tokio::time::sleep;

/// Polls the store until the slot settles. Panics after five seconds so a
/// hung pipeline fails the test instead of wedging it.
pub async fn wait_settled(store: &FetchStore) -> JsonFetchState {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Ok(state) = store.await_state().await {
                if state.is_settled() {
                    return state;
                }
            }
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("fetch never settled")
}
