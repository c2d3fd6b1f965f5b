use std::sync::Arc;

use tracing::trace;
use validator::Validate;

use crate::{
    algorithm::{GroupCodec, GroupVarint, GROUP_LEN, MAX_GROUP_BYTES},
    options::{BlockOption, OptionError},
};

use super::{Block, Posting};

// packs postings into blocks, one block per `build` call
pub struct BlockBuilder<C = GroupVarint> {
    codec: C,
    limit_bytes: usize,
    scratch: [u8; MAX_GROUP_BYTES],
    output: Vec<u8>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self::with_parts(GroupVarint::new(), BlockOption::default())
    }

    pub fn with_option(option: BlockOption) -> Result<Self, OptionError> {
        Self::with_codec(GroupVarint::new(), option)
    }
}

impl<C: GroupCodec> BlockBuilder<C> {
    pub fn with_codec(codec: C, option: BlockOption) -> Result<Self, OptionError> {
        option.validate()?;
        Ok(Self::with_parts(codec, option))
    }

    fn with_parts(codec: C, option: BlockOption) -> Self {
        Self {
            codec,
            limit_bytes: option.limit_bytes,
            scratch: [0; MAX_GROUP_BYTES],
            output: Vec::with_capacity(option.limit_bytes),
        }
    }

    /// Packs the longest prefix of `postings` that fits under the byte limit.
    ///
    /// Returns the postings left over (empty once everything fit) and the block. `postings` must
    /// be non-empty and non-decreasing with every gap below 2^32, which is only checked in debug
    /// builds.
    pub fn build<'a, P: Posting>(&mut self, postings: &'a [P]) -> (&'a [P], Block<P>) {
        debug_assert!(!postings.is_empty(), "cannot build a block from no postings");
        self.output.clear();

        let first = postings[0];
        let mut prev = first;
        let mut count = 0u16;
        let mut docs = postings;

        // the first gap of a block is always zero, `first` carries the posting itself
        while let Some((group, rest)) = docs.split_first_chunk::<GROUP_LEN>() {
            let deltas = [
                delta(prev, group[0]),
                delta(group[0], group[1]),
                delta(group[1], group[2]),
                delta(group[2], group[3]),
            ];
            let written = self.codec.encode_group(&deltas, &mut self.scratch);
            if self.output.len() + written >= self.limit_bytes {
                return self.seal(docs, first, count);
            }
            self.output.extend_from_slice(&self.scratch[..written]);
            count += GROUP_LEN as u16;
            prev = group[GROUP_LEN - 1];
            docs = rest;
        }

        while let Some((&doc, rest)) = docs.split_first() {
            let written = self.codec.encode_single(delta(prev, doc), &mut self.scratch);
            if self.output.len() + written >= self.limit_bytes {
                return self.seal(docs, first, count);
            }
            self.output.extend_from_slice(&self.scratch[..written]);
            count += 1;
            prev = doc;
            docs = rest;
        }

        self.seal(docs, first, count)
    }

    fn seal<'a, P: Posting>(&self, rest: &'a [P], first: P, count: u16) -> (&'a [P], Block<P>) {
        debug_assert!(count > 0, "limit of {} bytes fits no group", self.limit_bytes);
        if !rest.is_empty() {
            trace!(
                count,
                bytes = self.output.len(),
                remaining = rest.len(),
                "block reached its byte limit"
            );
        }
        let block = Block {
            first,
            count,
            data: Arc::from(self.output.as_slice()),
        };
        (rest, block)
    }
}

#[inline]
fn delta<P: Posting>(prev: P, next: P) -> u32 {
    debug_assert!(prev <= next, "postings out of order: {prev:?} then {next:?}");
    let gap = next.doc().wrapping_sub(prev.doc());
    debug_assert!(
        gap <= u64::from(u32::MAX),
        "gap between {prev:?} and {next:?} does not fit in 32 bits"
    );
    gap as u32
}
