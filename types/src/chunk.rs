//! Chunk sizing and the chunk container produced by the splitter.

use std::borrow::Cow;
use std::num::NonZeroUsize;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Requested partition size.
///
/// Any value `<= 0`, or no value at all, means "do not partition": the
/// splitter then yields the whole collection as a single chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub struct ChunkSize(Option<NonZeroUsize>);

impl ChunkSize {
    pub const UNBOUNDED: Self = Self(None);

    #[must_use]
    pub fn new(size: i64) -> Self {
        Self(usize::try_from(size).ok().and_then(NonZeroUsize::new))
    }

    #[must_use]
    pub const fn get(self) -> Option<NonZeroUsize> {
        self.0
    }

    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        self.0.is_none()
    }

    /// Number of chunks a collection of `len` items splits into.
    ///
    /// `ceil(len / size)` when bounded; always 1 when unbounded, even for an
    /// empty collection.
    #[must_use]
    pub fn chunk_count(self, len: usize) -> usize {
        match self.0 {
            Some(size) => len.div_ceil(size.get()),
            None => 1,
        }
    }
}

impl From<i64> for ChunkSize {
    fn from(size: i64) -> Self {
        Self::new(size)
    }
}

impl From<Option<i64>> for ChunkSize {
    fn from(size: Option<i64>) -> Self {
        size.map_or(Self::UNBOUNDED, Self::new)
    }
}

impl From<usize> for ChunkSize {
    fn from(size: usize) -> Self {
        Self(NonZeroUsize::new(size))
    }
}

impl From<ChunkSize> for Option<i64> {
    fn from(size: ChunkSize) -> Self {
        size.0.map(|n| i64::try_from(n.get()).unwrap_or(i64::MAX))
    }
}

/// An ordered, contiguous slice of a collection.
///
/// A chunk either borrows the caller's collection (the unpartitioned case) or
/// owns a structural clone of its items. Owned chunks never alias the
/// caller's storage, so handlers working on them cannot observe or disturb
/// the original collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a, T: Clone> {
    index: usize,
    items: Cow<'a, [T]>,
}

impl<'a, T: Clone> Chunk<'a, T> {
    #[must_use]
    pub fn borrowed(index: usize, items: &'a [T]) -> Self {
        Self {
            index,
            items: Cow::Borrowed(items),
        }
    }

    #[must_use]
    pub fn owned(index: usize, items: Vec<T>) -> Self {
        Self {
            index,
            items: Cow::Owned(items),
        }
    }

    /// Position of this chunk in split order (0-based).
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// True when this chunk is a view of the caller's collection rather
    /// than an independent copy.
    #[must_use]
    pub const fn is_borrowed(&self) -> bool {
        matches!(self.items, Cow::Borrowed(_))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Take the items out, cloning only if the chunk was borrowed.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items.into_owned()
    }
}

impl<T: Clone> Deref for Chunk<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T: Clone> AsRef<[T]> for Chunk<'_, T> {
    fn as_ref(&self) -> &[T] {
        &self.items
    }
}
