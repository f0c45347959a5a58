use crate::State;
use futures_signals::signal::{Mutable, MutableSignalCloned, SignalExt, SignalStream};
use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// The store worker has shut down and no longer accepts operations.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[error("state store worker has shut down")]
pub struct StoreClosed;

type ReduceOp<S> = Box<dyn FnOnce(S) -> S + Send>;
type InspectOp<S> = Box<dyn FnOnce(S) + Send>;

/// Serialized state container.
///
/// All updates funnel through one worker task, so reducers apply strictly in
/// the order they were enqueued and observers never see a torn update.
/// Reads come either from the current snapshot ([`get_state`]) or from the
/// same queue as the writes ([`with_state`], [`await_state`]), which orders
/// them after every update enqueued before them.
///
/// [`get_state`]: StateStore::get_state
/// [`with_state`]: StateStore::with_state
/// [`await_state`]: StateStore::await_state
pub struct StateStore<S: State> {
    state: Mutable<S>,
    reduce_tx: UnboundedSender<ReduceOp<S>>,
    inspect_tx: UnboundedSender<InspectOp<S>>,
}

impl<S: State> StateStore<S> {
    /// Creates a store and spawns its worker on the current runtime.
    pub fn new(initial_state: S) -> Self {
        let state = Mutable::new(initial_state);
        let (reduce_tx, reduce_rx) = tokio::sync::mpsc::unbounded_channel::<ReduceOp<S>>();
        let (inspect_tx, inspect_rx) = tokio::sync::mpsc::unbounded_channel::<InspectOp<S>>();

        let worker_state = state.clone();
        tokio::spawn(async move {
            Self::process_queue(worker_state, reduce_rx, inspect_rx).await;
        });

        StateStore {
            state,
            reduce_tx,
            inspect_tx,
        }
    }

    async fn process_queue(
        state: Mutable<S>,
        mut reduce_rx: UnboundedReceiver<ReduceOp<S>>,
        mut inspect_rx: UnboundedReceiver<InspectOp<S>>,
    ) {
        loop {
            tokio::select! {
                biased;
                // Pending updates are applied before pending reads.
                Some(op) = reduce_rx.recv() => {
                    let next = op(state.get_cloned());
                    state.set(next);
                }
                Some(op) = inspect_rx.recv() => {
                    op(state.get_cloned());
                }
                else => break,
            }
        }
    }

    /// Enqueues a state update.
    pub fn set_state<F>(&self, reducer: F) -> Result<(), StoreClosed>
    where
        F: FnOnce(S) -> S + Send + 'static,
    {
        self.reduce_tx
            .send(Box::new(reducer))
            .map_err(|_| StoreClosed)
    }

    /// Enqueues a read of the state as of the end of the current queue.
    pub fn with_state<F>(&self, inspector: F) -> Result<(), StoreClosed>
    where
        F: FnOnce(S) + Send + 'static,
    {
        self.inspect_tx
            .send(Box::new(inspector))
            .map_err(|_| StoreClosed)
    }

    /// Current snapshot, without waiting for queued updates.
    pub fn get_state(&self) -> S {
        self.state.get_cloned()
    }

    /// Resolves with the state after every currently queued update applied.
    pub async fn await_state(&self) -> Result<S, StoreClosed> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.with_state(|state| {
            let _ = tx.send(state);
        })?;
        rx.await.map_err(|_| StoreClosed)
    }

    /// Signal of state changes, for one-way binding into a view layer.
    /// Signals are lossy: rapid intermediate states may be skipped.
    pub fn to_signal(&self) -> MutableSignalCloned<S> {
        self.state.signal_cloned()
    }

    /// The same change feed as [`to_signal`](StateStore::to_signal), as a
    /// [`Stream`](futures_core::Stream).
    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<S>> {
        self.state.signal_cloned().to_stream()
    }
}
