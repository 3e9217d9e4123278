//! Partitioning properties

use fanout_core::{ChunkSize, split};

#[test]
fn bounded_split_counts_and_lengths() {
    for n in 0..=23_usize {
        let items: Vec<usize> = (0..n).collect();
        for size in 1..=7_i64 {
            let chunks = split(&items, ChunkSize::new(size));
            let width = usize::try_from(size).unwrap();

            assert_eq!(chunks.len(), n.div_ceil(width), "n={n} size={size}");
            assert_eq!(chunks.iter().map(|c| c.len()).sum::<usize>(), n);
            if let Some((_last, full)) = chunks.split_last() {
                assert!(full.iter().all(|c| c.len() == width), "n={n} size={size}");
            }

            let flattened: Vec<usize> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
            assert_eq!(flattened, items);
        }
    }
}

#[test]
fn unbounded_split_is_the_collection_itself() {
    let items = vec!["a", "b", "c"];
    for size in [ChunkSize::new(0), ChunkSize::new(-3), ChunkSize::from(None::<i64>)] {
        let chunks = split(&items, size);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_borrowed());
        assert_eq!(chunks[0].as_slice(), items.as_slice());
    }
}

#[test]
fn chunk_indexes_follow_collection_order() {
    let items: Vec<u8> = (0..10).collect();
    let indexes: Vec<usize> = split(&items, ChunkSize::new(3))
        .iter()
        .map(|c| c.index())
        .collect();
    assert_eq!(indexes, vec![0, 1, 2, 3]);
}
