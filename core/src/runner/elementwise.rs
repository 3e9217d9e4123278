//! Sequential chunks, concurrent elements.
//!
//! The collection is split into chunks of `size`. Chunks run strictly one
//! after another; inside a chunk every element's handler call runs at once,
//! so at most `size` calls are ever in flight. The next chunk starts only
//! after every call of the current chunk has settled.
//!
//! # Failure granularity: the whole chunk
//!
//! If any element of a chunk fails, **all** of that chunk's results are
//! dropped, including the ones that succeeded. One report is sent for the
//! chunk (carrying the first failure in chunk order and the number of
//! discarded successes) and the run moves on to the next chunk. The output
//! therefore never holds part of a chunk, but a single failing element can
//! silently cost up to `size - 1` good results. Callers who need per-element
//! isolation should use [`Runner::fully_concurrent`] or make the handler
//! infallible.

use futures_util::future::join_all;

use fanout_types::{ChunkSize, ExtraArgs, FailureScope};

use super::Runner;
use crate::handler::Handler;
use crate::invoker::{Settled, bind};
use crate::splitter::split;

impl Runner {
    /// Apply `handler` to every element, `size` elements at a time.
    ///
    /// Results come back in collection order. See the module docs for the
    /// chunk-level failure policy.
    pub async fn elementwise_bounded<T, H>(
        &self,
        collection: &[T],
        size: ChunkSize,
        handler: &H,
        extra: &ExtraArgs,
    ) -> Vec<H::Output>
    where
        T: Clone + Send,
        H: Handler<T> + ?Sized,
    {
        let chunks = split(collection, size);
        let total = chunks.len();
        let mut aggregate = Vec::with_capacity(collection.len());

        for chunk in chunks {
            let index = chunk.index();
            tracing::debug!(
                handler = handler.name(),
                chunk = index + 1,
                of = total,
                in_flight = chunk.len(),
                "Dispatching chunk"
            );

            let units = chunk
                .into_vec()
                .into_iter()
                .enumerate()
                .map(|(slot, item)| bind(slot, handler, item, extra).settle());
            let settled = join_all(units).await;

            let mut results = Vec::with_capacity(settled.len());
            let mut first_error = None;
            let mut failed = 0usize;
            for Settled { outcome, .. } in settled {
                match outcome {
                    Ok(value) => results.push(value),
                    Err(error) => {
                        failed += 1;
                        if first_error.is_none() {
                            first_error = Some(error);
                        }
                    }
                }
            }

            match first_error {
                None => aggregate.extend(results),
                Some(error) => {
                    tracing::debug!(
                        handler = handler.name(),
                        chunk = index,
                        failed,
                        discarded = results.len(),
                        "Dropping chunk"
                    );
                    self.report(handler.name(), FailureScope::Chunk(index), error, results.len());
                }
            }
        }

        aggregate
    }
}
