use fetchrx::{FetchStore, JsonFetchState};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, Level};

const POSTS_URL: &str = "https://my-json-server.typicode.com/typicode/demo/posts";
const COMMENTS_URL: &str = "https://my-json-server.typicode.com/typicode/demo/comments";

async fn wait_settled(store: &FetchStore) -> JsonFetchState {
    loop {
        if let Ok(state) = store.await_state().await {
            if state.is_settled() {
                return state;
            }
        }
        sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(Level::DEBUG)
        .init();

    let store = FetchStore::new()?;

    store.set_url(POSTS_URL)?;
    // Same value again: the slot already tracks it, nothing is re-fetched.
    store.set_url(POSTS_URL)?;
    let state = wait_settled(&store).await;
    info!("posts settled with status {:?}", state.status());

    // A different value supersedes the slot. Had the first request still
    // been in flight, its late result would have been dropped.
    store.set_url(COMMENTS_URL)?;
    let state = wait_settled(&store).await;
    info!(
        "now tracking {:?} with status {:?}",
        store.url(),
        state.status()
    );
    Ok(())
}
