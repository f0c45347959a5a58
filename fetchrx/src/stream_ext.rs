use futures_core::stream::Stream;
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Extra combinators for the state streams produced by
/// [`StateStore::to_stream`](crate::StateStore::to_stream).
pub trait FetchStreamExt: Stream {
    /// Ends the stream once the predicate matches, including the matching
    /// item. Typical use is waiting for a request slot to settle:
    ///
    /// ```
    /// use fetchrx::{FetchState, FetchStreamExt};
    /// use futures_signals::signal::{Mutable, SignalExt};
    ///
    /// async fn example() {
    ///     let state = Mutable::new(FetchState::<i32>::pristine());
    ///     let settled = state
    ///         .signal_cloned()
    ///         .to_stream()
    ///         .stop_if(|state| state.is_settled());
    /// }
    /// ```
    fn stop_if<F>(self, test: F) -> StopIf<Self, F>
    where
        F: FnMut(&Self::Item) -> bool,
        Self: Sized,
    {
        StopIf {
            stream: self,
            test,
            stopped: false,
        }
    }
}

impl<T: ?Sized> FetchStreamExt for T where T: Stream {}

/// Stream returned by [`FetchStreamExt::stop_if`].
#[pin_project(project = StopIfProj)]
#[derive(Debug)]
#[must_use = "Streams do nothing unless polled"]
pub struct StopIf<A, F> {
    #[pin]
    stream: A,
    test: F,
    stopped: bool,
}

impl<A, F> Stream for StopIf<A, F>
where
    A: Stream,
    F: FnMut(&A::Item) -> bool,
{
    type Item = A::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let StopIfProj {
            stream,
            test,
            stopped,
        } = self.project();

        if *stopped {
            return Poll::Ready(None);
        }
        match stream.poll_next(cx) {
            Poll::Ready(Some(item)) => {
                if test(&item) {
                    *stopped = true;
                }
                Poll::Ready(Some(item))
            }
            Poll::Ready(None) => {
                *stopped = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
