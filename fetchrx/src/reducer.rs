use crate::{FetchError, FetchRequest, FetchState, RequestHandle};

/// State transitions of a request slot.
///
/// A closed set: every action a slot can receive is a variant here, so the
/// reducer has no fallible "unknown action" path.
#[derive(Debug, Clone)]
pub enum FetchAction<T: Clone> {
    /// Reset to the pristine snapshot.
    Init,
    /// A run has started. The status resets to pending so a stale code can
    /// never be read while the response is in flight.
    StartLoad {
        url: String,
        generation: u64,
        handle: Option<RequestHandle>,
    },
    /// The single terminal update of a run, success or failure folded in.
    EndLoad {
        generation: u64,
        status: i32,
        data: Option<T>,
        error: Option<FetchError>,
    },
    /// Reset to pristine, leaving the abort marker as the error.
    Abort,
}

/// Pure transition function: current snapshot + action, next snapshot.
pub fn reduce<T: Clone>(state: FetchState<T>, action: FetchAction<T>) -> FetchState<T> {
    match action {
        FetchAction::Init => FetchState::pristine(),
        FetchAction::StartLoad {
            url,
            generation,
            handle,
        } => FetchState {
            loading: true,
            request: Some(FetchRequest::pending(url, generation, handle)),
            ..state
        },
        FetchAction::EndLoad {
            generation,
            status,
            data,
            error,
        } => {
            if state
                .request
                .as_ref()
                .is_some_and(|request| request.generation != generation)
            {
                // A newer run owns the slot; this terminal update is stale.
                return state;
            }
            let request = match state.request {
                // Merge: the url, generation and handle set at start-load
                // time survive, only the status arrives with the terminal
                // update.
                Some(mut request) => {
                    request.status = status;
                    Some(request)
                }
                None => Some(FetchRequest {
                    url: String::new(),
                    status,
                    generation,
                    handle: None,
                }),
            };
            FetchState {
                data,
                error,
                loading: false,
                loaded: true,
                request,
            }
        }
        FetchAction::Abort => FetchState {
            error: Some(FetchError::Aborted),
            ..FetchState::pristine()
        },
    }
}
