//! Every element at once.
//!
//! No chunking: the number of in-flight calls equals the collection length.
//! Meant for small collections or targets without a meaningful rate limit.

use futures_util::future::join_all;

use fanout_types::{ExtraArgs, FailureScope};

use super::Runner;
use crate::handler::Handler;
use crate::invoker::bind;

impl Runner {
    /// Apply `handler` to every element concurrently.
    ///
    /// Results of successful calls come back in collection order; each failed
    /// call is reported and leaves a gap.
    pub async fn fully_concurrent<T, H>(
        &self,
        collection: &[T],
        handler: &H,
        extra: &ExtraArgs,
    ) -> Vec<H::Output>
    where
        T: Clone + Send,
        H: Handler<T> + ?Sized,
    {
        tracing::debug!(
            handler = handler.name(),
            in_flight = collection.len(),
            "Dispatching all elements"
        );

        let units = collection
            .iter()
            .cloned()
            .enumerate()
            .map(|(slot, item)| bind(slot, handler, item, extra).settle());
        let settled = join_all(units).await;

        self.keep_successes(handler.name(), settled, FailureScope::Element)
    }
}
