mod builder;
mod cursor;
mod validate;

use std::{fmt::Debug, sync::Arc};

pub use builder::BlockBuilder;
pub use cursor::BlockCursor;
pub use validate::{validate, validate_with, BlockError};

/// Hard ceiling on a block's byte length. Blocks are always strictly smaller.
pub const BLOCK_LIMIT_BYTES: usize = 4096;

/// A document identifier as stored in a posting list.
///
/// Blocks only store gaps between [`Posting::doc`] ordinals, so every posting of a run must be
/// recoverable from the first one by [`Posting::forward`].
pub trait Posting: Copy + Ord + Debug {
    /// Ordinal the gaps are measured on.
    fn doc(&self) -> u64;
    /// The posting `delta` ordinals after `self`.
    fn forward(self, delta: u32) -> Self;
}

impl Posting for u32 {
    #[inline]
    fn doc(&self) -> u64 {
        u64::from(*self)
    }

    #[inline]
    fn forward(self, delta: u32) -> Self {
        self.wrapping_add(delta)
    }
}

impl Posting for u64 {
    #[inline]
    fn doc(&self) -> u64 {
        *self
    }

    #[inline]
    fn forward(self, delta: u32) -> Self {
        self.wrapping_add(u64::from(delta))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DocId(pub u32);

impl Posting for DocId {
    #[inline]
    fn doc(&self) -> u64 {
        u64::from(self.0)
    }

    #[inline]
    fn forward(self, delta: u32) -> Self {
        DocId(self.0.wrapping_add(delta))
    }
}

impl From<u32> for DocId {
    fn from(doc: u32) -> Self {
        DocId(doc)
    }
}

/// A run of postings packed as gaps.
///
/// The first posting is kept as is, `data` starts with a zero gap standing in for it. Clones
/// share the packed bytes.
#[derive(Debug, Clone)]
pub struct Block<P> {
    first: P,
    count: u16,
    data: Arc<[u8]>,
}

impl<P: Posting> Block<P> {
    /// Reassembles a block from stored parts. Nothing is checked, run [`validate`] on blocks
    /// that did not come from a [`BlockBuilder`].
    pub fn from_parts(first: P, count: u16, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            first,
            count,
            data: data.into(),
        }
    }

    pub fn first(&self) -> P {
        self.first
    }

    /// Number of postings in the block.
    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Packed byte length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn cursor(&self) -> BlockCursor<'_, P> {
        BlockCursor::new(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_forward() {
        assert_eq!(15u32, 10u32.forward(5));
        assert_eq!(u64::from(u32::MAX) + 1, u64::from(u32::MAX).forward(1));
        assert_eq!(DocId(7), DocId(0).forward(7));
        assert_eq!(7, DocId(7).doc());
    }

    #[test]
    fn test_block_clone_shares_data() {
        let block = Block::from_parts(3u32, 1, vec![0x80]);
        let clone = block.clone();
        assert!(std::ptr::eq(block.data().as_ptr(), clone.data().as_ptr()));
        assert_eq!(1, clone.len());
        assert_eq!(3, clone.first());
        assert_eq!(1, clone.count());
    }
}
