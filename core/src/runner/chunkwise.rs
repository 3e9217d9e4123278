//! One handler call per chunk, all chunks at once.
//!
//! The handler receives a whole chunk and does any per-element fan-out
//! itself. Concurrency is bounded by the number of chunks, `ceil(n / size)`,
//! not by `size`. A failing chunk call only loses its own slot.

use futures_util::future::join_all;

use fanout_types::{ChunkSize, ExtraArgs, FailureScope};

use super::Runner;
use crate::handler::Handler;
use crate::invoker::bind;
use crate::splitter::split;

impl Runner {
    /// Dispatch every chunk of `collection` to `handler` concurrently and
    /// concatenate the returned sequences in chunk order.
    ///
    /// With an unbounded `size` the handler is called once with the whole
    /// collection, even when it is empty.
    pub async fn chunkwise_concurrent<T, H, R>(
        &self,
        collection: &[T],
        size: ChunkSize,
        handler: &H,
        extra: &ExtraArgs,
    ) -> Vec<R>
    where
        T: Clone + Send,
        H: Handler<Vec<T>, Output = Vec<R>> + ?Sized,
        R: Send,
    {
        let chunks = split(collection, size);
        tracing::debug!(
            handler = handler.name(),
            chunks = chunks.len(),
            items = collection.len(),
            "Dispatching all chunks"
        );

        let units = chunks
            .into_iter()
            .map(|chunk| bind(chunk.index(), handler, chunk.into_vec(), extra).settle());
        let settled = join_all(units).await;

        self.keep_successes(handler.name(), settled, FailureScope::Chunk)
            .into_iter()
            .flatten()
            .collect()
    }
}
