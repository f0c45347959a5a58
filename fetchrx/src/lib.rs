mod error;
mod fetch_state;
mod fetch_store;
mod reducer;
mod state_store;
mod status_view;
mod stream_ext;

pub use error::*;
pub use fetch_state::*;
pub use fetch_store::*;
pub use reducer::*;
pub use state_store::*;
pub use status_view::*;
pub use stream_ext::*;

pub trait State: Clone + Send + Sync + 'static {}
