use crate::{FetchError, State};
use tokio::task::AbortHandle;

/// Status a request carries while the response is still in flight.
pub const STATUS_PENDING: i32 = 0;
/// Transport-level failure: the request never produced a response.
pub const FAIL_FETCH: i32 = -100;
/// The configured body parser rejected the response body.
pub const FAIL_PARSE: i32 = -200;
/// Reading the response body as text failed.
pub const FAIL_PARSE_TEXT: i32 = -201;

/// Handle to the task driving a request run.
///
/// Carries no meaningful equality; two handles always compare equal so that
/// snapshots containing them can still be compared field by field.
#[derive(Debug, Clone)]
pub struct RequestHandle(AbortHandle);

impl RequestHandle {
    /// Whether the driving task has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl From<AbortHandle> for RequestHandle {
    fn from(handle: AbortHandle) -> Self {
        RequestHandle(handle)
    }
}

/// Descriptor of the current or last request of a slot.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    /// Real HTTP status once known, [`STATUS_PENDING`] in flight, or one of
    /// the negative sentinels when the failure preceded a status.
    pub status: i32,
    /// Sequence number of the run that started this request. Terminal
    /// updates from older runs are dropped by the reducer.
    pub generation: u64,
    pub handle: Option<RequestHandle>,
}

impl PartialEq for FetchRequest {
    fn eq(&self, other: &Self) -> bool {
        // The handle has no observable identity.
        self.url == other.url
            && self.status == other.status
            && self.generation == other.generation
    }
}

impl Eq for FetchRequest {}

impl FetchRequest {
    pub fn pending(url: impl Into<String>, generation: u64, handle: Option<RequestHandle>) -> Self {
        FetchRequest {
            url: url.into(),
            status: STATUS_PENDING,
            generation,
            handle,
        }
    }
}

/// Full lifecycle snapshot for one logical request slot.
///
/// Created pristine, mutated only through [`reduce`](crate::reduce), reset by
/// the `Init` and `Abort` actions. `loading` is true strictly between a
/// start-load and its terminal update; `loaded` sticks once any terminal
/// update has applied.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T: Clone> {
    pub data: Option<T>,
    pub error: Option<FetchError>,
    pub loading: bool,
    pub loaded: bool,
    pub request: Option<FetchRequest>,
}

impl<T: Clone> FetchState<T> {
    /// The initial snapshot, before any request has been issued.
    pub fn pristine() -> Self {
        FetchState {
            data: None,
            error: None,
            loading: false,
            loaded: false,
            request: None,
        }
    }

    pub fn is_pristine(&self) -> bool {
        !self.loading && !self.loaded && self.data.is_none() && self.request.is_none()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// A terminal update has applied and no newer run is in flight.
    pub fn is_settled(&self) -> bool {
        self.loaded && !self.loading
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn data_ref(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Status of the current/last request, if one was ever started.
    pub fn status(&self) -> Option<i32> {
        self.request.as_ref().map(|request| request.status)
    }
}

impl<T: Clone> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::pristine()
    }
}

impl<T: Clone + Send + Sync + 'static> State for FetchState<T> {}
