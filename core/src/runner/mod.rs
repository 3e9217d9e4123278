//! Runners: drive handler units to completion under one of three policies.
//!
//! | Policy        | Handler gets | Dispatch                                   | A failure drops        |
//! |---------------|--------------|--------------------------------------------|------------------------|
//! | `Elementwise` | one element  | chunks in sequence, elements of a chunk together | the whole chunk  |
//! | `Chunkwise`   | one chunk    | all chunks together                        | that chunk's slot      |
//! | `Concurrent`  | one element  | all elements together                      | that element's slot    |
//!
//! No runner ever returns a handler failure to its caller. Failures go to
//! the runner's [`FailureSink`] and the result is simply shorter than the
//! input. Callers that cannot tolerate silently missing items must check the
//! sink (or fold errors into the handler's success value) rather than rely on
//! the returned sequence.
//!
//! All units of a batch are polled concurrently on the calling task; there is
//! no spawning, no timeout and no cancellation. A handler that never settles
//! blocks its batch.

mod chunkwise;
mod concurrent;
mod elementwise;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use fanout_types::{ChunkSize, ExtraArgs, FailureScope, HandlerError, HandlerName, RunPolicy};

use crate::handler::PerChunk;
use crate::invoker::Settled;
use crate::registry::{HandlerRegistry, RegistryError};
use crate::sink::{FailureReport, FailureSink, TracingSink};

/// Drives handler units and reports failures to its sink.
#[derive(Clone)]
pub struct Runner {
    sink: Arc<dyn FailureSink>,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner").finish_non_exhaustive()
    }
}

/// A dynamically dispatched run over JSON values.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub policy: RunPolicy,
    pub chunk_size: ChunkSize,
    /// Registered handler name. `None` means the caller supplied no handler.
    pub handler: Option<HandlerName>,
    pub extra: ExtraArgs,
}

impl RunRequest {
    #[must_use]
    pub fn new(policy: RunPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn chunk_size(mut self, size: ChunkSize) -> Self {
        self.chunk_size = size;
        self
    }

    /// A blank name counts as no handler.
    pub fn handler(mut self, name: impl Into<String>) -> Self {
        self.handler = HandlerName::new(name).ok();
        self
    }

    pub fn extra(mut self, extra: impl Into<ExtraArgs>) -> Self {
        self.extra = extra.into();
        self
    }
}

impl Runner {
    /// Runner that logs failures through `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    #[must_use]
    pub fn with_sink(sink: Arc<dyn FailureSink>) -> Self {
        Self { sink }
    }

    /// Run `collection` through the registered handler named in `request`.
    ///
    /// Returns `Ok(None)` without invoking anything when the request names no
    /// handler. An unknown handler name is a lookup error and also runs
    /// nothing. Handler failures never surface here; see the module docs.
    pub async fn run(
        &self,
        registry: &HandlerRegistry,
        request: &RunRequest,
        collection: &[Value],
    ) -> Result<Option<Vec<Value>>, RegistryError> {
        let Some(name) = request.handler.as_ref().map(HandlerName::as_str) else {
            tracing::warn!(policy = %request.policy, "No handler supplied, nothing to run");
            return Ok(None);
        };
        let handler = registry.lookup(name)?;
        if !request.policy.uses_chunks() && !request.chunk_size.is_unbounded() {
            tracing::debug!(policy = %request.policy, "Chunk size has no effect under this policy");
        }

        tracing::debug!(
            handler = name,
            policy = %request.policy,
            items = collection.len(),
            extra_args = request.extra.len(),
            "Starting run"
        );

        let results = match request.policy {
            RunPolicy::Elementwise => {
                self.elementwise_bounded(collection, request.chunk_size, handler, &request.extra)
                    .await
            }
            RunPolicy::Chunkwise => {
                let chunk_handler = PerChunk::new(handler);
                self.chunkwise_concurrent(
                    collection,
                    request.chunk_size,
                    &chunk_handler,
                    &request.extra,
                )
                .await
            }
            RunPolicy::Concurrent => {
                self.fully_concurrent(collection, handler, &request.extra)
                    .await
            }
        };

        tracing::debug!(
            handler = name,
            items = collection.len(),
            results = results.len(),
            "Run finished"
        );
        Ok(Some(results))
    }

    fn report(&self, handler: &str, scope: FailureScope, error: HandlerError, discarded: usize) {
        self.sink.report(FailureReport {
            handler: handler.to_string(),
            scope,
            error,
            discarded,
        });
    }

    /// Keep successful outcomes in slot order; report each failure against
    /// its own slot.
    fn keep_successes<R>(
        &self,
        handler: &str,
        settled: Vec<Settled<R>>,
        scope: fn(usize) -> FailureScope,
    ) -> Vec<R> {
        let mut results = Vec::with_capacity(settled.len());
        for Settled { slot, outcome } in settled {
            match outcome {
                Ok(value) => results.push(value),
                Err(error) => self.report(handler, scope(slot), error, 0),
            }
        }
        results
    }
}
