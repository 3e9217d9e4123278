//! Bounded-concurrency fan-out of asynchronous handlers over collections.
//!
//! A collection is split into chunks, each element (or each chunk) is bound
//! to a [`Handler`], and a [`Runner`] drives the resulting units under one of
//! three policies while keeping results in collection order. Handler failures
//! are isolated and reported to a [`FailureSink`]; they never escape a run.

pub mod builtins;
mod handler;
pub mod invoker;
mod registry;
mod runner;
mod sink;
mod splitter;

pub use builtins::register_builtins;
pub use handler::{DynHandler, FnHandler, Handler, HandlerFut, PerChunk, handler_fn};
pub use registry::{HandlerRegistry, RegistryError};
pub use runner::{RunRequest, Runner};
pub use sink::{CollectingSink, FailureReport, FailureSink, TracingSink};
pub use splitter::split;

pub use fanout_types::{
    Chunk, ChunkSize, ExtraArgs, FailureScope, HandlerError, RunPolicy, UnitOutcome, json_kind,
};
