use fetchrx::{status_view, BodyParser, FetchOptions, FetchStore, JsonFetchState};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, Level};

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

    // Not everything is JSON: this parser splits the body into lines.
    let parser: BodyParser = Arc::new(|text: &str| {
        Ok(Value::Array(
            text.lines()
                .map(|line| Value::String(line.to_owned()))
                .collect(),
        ))
    });
    let store = FetchStore::with_options(FetchOptions::default())?.with_parser(parser);

    store.set_url("https://example.com/")?;
    let state = wait_settled(&store).await;
    let line_count = state
        .data_ref()
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    info!("fetched {} lines", line_count);

    // A 404 is not fatal: a parseable body still lands in `data`, next to
    // the http-status error.
    store.set_url("https://my-json-server.typicode.com/typicode/demo/nope")?;
    let state = wait_settled(&store).await;
    println!("{}", status_view(&state, ""));
    info!("data alongside the error: {:?}", state.data);
    Ok(())
}
