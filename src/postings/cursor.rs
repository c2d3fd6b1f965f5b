use std::iter::FusedIterator;

use arrayvec::ArrayVec;

use crate::algorithm::{GroupCodec, GroupVarint, GROUP_LEN};

use super::{Block, Posting};

/// Forward-only decoder over one block.
///
/// Gaps are unpacked one group at a time. Each cursor owns its decode state, so any number of
/// them can read the same block.
pub struct BlockCursor<'a, P, C = GroupVarint> {
    block: &'a Block<P>,
    codec: C,
    // current group
    group: ArrayVec<u32, GROUP_LEN>,
    current: usize,
    posting: P,
    // postings produced, to match against block.count
    produced: u16,
    offset: usize,
}

impl<'a, P: Posting> BlockCursor<'a, P> {
    pub fn new(block: &'a Block<P>) -> Self {
        Self::with_codec(block, GroupVarint::new())
    }
}

impl<'a, P: Posting, C: GroupCodec> BlockCursor<'a, P, C> {
    pub fn with_codec(block: &'a Block<P>, codec: C) -> Self {
        let mut cursor = Self {
            block,
            codec,
            group: ArrayVec::new(),
            current: 0,
            posting: block.first,
            produced: 0,
            offset: 0,
        };
        // slot 0 is the zero gap in front of `first`
        cursor.load();
        cursor.current = 1;
        cursor
    }

    fn load(&mut self) {
        let data = &self.block.data[..];
        let remaining = self.block.count - self.produced;
        self.group.clear();
        if remaining as usize >= GROUP_LEN {
            let data = &data[self.offset..];
            self.group.extend(self.codec.decode_group(data));
            self.offset += self.codec.group_len(data[0]);
        } else {
            for _ in 0..remaining {
                let (delta, read) = self.codec.decode_single(&data[self.offset..]);
                self.group.push(delta);
                self.offset += read;
            }
        }
    }

    /// The posting under the cursor.
    #[inline]
    pub fn read(&self) -> P {
        self.posting
    }

    /// Steps to the next posting. Check [`BlockCursor::finished`] afterwards: the return value
    /// only says whether a step was taken, it is `false` on a finished cursor.
    pub fn advance(&mut self) -> bool {
        if self.finished() {
            return false;
        }
        self.produced += 1;
        if self.finished() {
            return true;
        }

        // end of this group -- read another
        if self.current == self.group.len() {
            self.load();
            self.current = 0;
        }

        self.posting = self.posting.forward(self.group[self.current]);
        self.current += 1;
        true
    }

    /// Whether every posting of the block has been stepped past.
    #[inline]
    pub fn finished(&self) -> bool {
        self.produced >= self.block.count
    }

    /// Postings not yet stepped past, the current one included.
    pub fn remaining(&self) -> usize {
        usize::from(self.block.count.saturating_sub(self.produced))
    }
}

impl<P: Posting, C: GroupCodec> Iterator for BlockCursor<'_, P, C> {
    type Item = P;

    fn next(&mut self) -> Option<P> {
        if self.finished() {
            return None;
        }
        let posting = self.read();
        self.advance();
        Some(posting)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl<P: Posting, C: GroupCodec> ExactSizeIterator for BlockCursor<'_, P, C> {}

impl<P: Posting, C: GroupCodec> FusedIterator for BlockCursor<'_, P, C> {}
