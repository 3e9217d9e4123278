//! Order-preserving partitioning of a collection into fixed-size chunks.

use fanout_types::{Chunk, ChunkSize};

/// Partition `collection` into chunks of `size` items, the last chunk holding
/// the remainder.
///
/// An unbounded size yields exactly one chunk that borrows the whole
/// collection. Otherwise every chunk owns a structural clone of its items
/// (`T::clone`), so nothing a handler does to a chunk can reach the caller's
/// storage. The clone is only as deep as `T`'s `Clone` impl: items holding
/// shared handles (`Arc`, `Rc`, interior-mutable cells) still share them.
#[must_use]
pub fn split<T: Clone>(collection: &[T], size: ChunkSize) -> Vec<Chunk<'_, T>> {
    let Some(size) = size.get() else {
        return vec![Chunk::borrowed(0, collection)];
    };

    let chunks: Vec<_> = collection
        .chunks(size.get())
        .enumerate()
        .map(|(index, items)| Chunk::owned(index, items.to_vec()))
        .collect();

    tracing::trace!(
        items = collection.len(),
        size = size.get(),
        chunks = chunks.len(),
        "Split collection"
    );
    chunks
}
