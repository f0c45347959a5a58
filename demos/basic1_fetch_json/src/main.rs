use fetchrx::{status_view, FetchStore, FetchStreamExt};
use futures::StreamExt;
use tracing::info;

mod tracing_setup;

const POSTS_URL: &str = "https://my-json-server.typicode.com/typicode/demo/posts";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_setup::tracing_init();

    let store = FetchStore::new()?;

    info!("fetching {}", POSTS_URL);
    store.set_url(POSTS_URL)?;

    // Observe every state up to the settled one.
    let states = store.to_stream().stop_if(|state| state.is_settled());
    futures::pin_mut!(states);
    while let Some(state) = states.next().await {
        info!(
            "loading={} loaded={} status={:?}",
            state.loading,
            state.loaded,
            state.status()
        );
    }

    let state = store.get_state();
    let children = serde_json::to_string_pretty(&state.data)?;
    println!("{}", status_view(&state, &children));
    Ok(())
}
