//! Handler trait and adapters.
//!
//! A handler is the caller-supplied operation a runner applies to each
//! element (or each chunk). The runner never interprets what a handler does;
//! it only invokes it and captures the [`UnitOutcome`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::Value;

use fanout_types::{ExtraArgs, UnitOutcome};

/// Handler future type alias.
pub type HandlerFut<'a, R> = Pin<Box<dyn Future<Output = UnitOutcome<R>> + Send + 'a>>;

/// Type-erased element handler over JSON values, as stored in the registry.
pub type DynHandler = dyn Handler<Value, Output = Value>;

/// An asynchronous operation applied to one input plus the run's extra args.
///
/// `I` is a single element for the elementwise and fully concurrent runners
/// and a `Vec` of elements for the chunkwise runner.
pub trait Handler<I>: Send + Sync {
    type Output: Send;

    /// Identifying name used in failure reports.
    fn name(&self) -> &str;

    fn call<'a>(&'a self, input: I, extra: ExtraArgs) -> HandlerFut<'a, Self::Output>
    where
        I: 'a;
}

impl<I, H: Handler<I> + ?Sized> Handler<I> for &H {
    type Output = H::Output;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn call<'a>(&'a self, input: I, extra: ExtraArgs) -> HandlerFut<'a, Self::Output>
    where
        I: 'a,
    {
        (**self).call(input, extra)
    }
}

impl<I, H: Handler<I> + ?Sized> Handler<I> for Box<H> {
    type Output = H::Output;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn call<'a>(&'a self, input: I, extra: ExtraArgs) -> HandlerFut<'a, Self::Output>
    where
        I: 'a,
    {
        (**self).call(input, extra)
    }
}

impl<I, H: Handler<I> + ?Sized> Handler<I> for Arc<H> {
    type Output = H::Output;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn call<'a>(&'a self, input: I, extra: ExtraArgs) -> HandlerFut<'a, Self::Output>
    where
        I: 'a,
    {
        (**self).call(input, extra)
    }
}

/// Handler backed by a function or closure returning a future.
#[derive(Clone)]
pub struct FnHandler<F> {
    name: String,
    f: F,
}

/// Wrap `f` as a named handler.
///
/// ```ignore
/// let times_ten = handler_fn("times_ten", |x: i64, _extra| async move { Ok(x * 10) });
/// ```
#[must_use]
pub fn handler_fn<F>(name: impl Into<String>, f: F) -> FnHandler<F> {
    FnHandler {
        name: name.into(),
        f,
    }
}

impl<F> FnHandler<F> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<I, R, F, Fut> Handler<I> for FnHandler<F>
where
    F: Fn(I, ExtraArgs) -> Fut + Send + Sync,
    Fut: Future<Output = UnitOutcome<R>> + Send + 'static,
    R: Send,
{
    type Output = R;

    fn name(&self) -> &str {
        &self.name
    }

    fn call<'a>(&'a self, input: I, extra: ExtraArgs) -> HandlerFut<'a, R>
    where
        I: 'a,
    {
        Box::pin((self.f)(input, extra))
    }
}

/// Lifts an element handler into a chunk handler.
///
/// The chunk's elements are invoked concurrently; the chunk call fails with
/// the first failing element (in chunk order) and otherwise returns the
/// element results in chunk order.
pub struct PerChunk<H> {
    inner: H,
}

impl<H> PerChunk<H> {
    #[must_use]
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    #[must_use]
    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<T, H> Handler<Vec<T>> for PerChunk<H>
where
    T: Send + 'static,
    H: Handler<T>,
{
    type Output = Vec<H::Output>;

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn call<'a>(&'a self, chunk: Vec<T>, extra: ExtraArgs) -> HandlerFut<'a, Self::Output>
    where
        Vec<T>: 'a,
    {
        Box::pin(async move {
            let calls = chunk
                .into_iter()
                .map(|item| self.inner.call(item, extra.clone()));
            join_all(calls).await.into_iter().collect()
        })
    }
}
