use thiserror::Error;
use tracing::debug;

use crate::algorithm::{CheckedGroupCodec, GroupVarint, GROUP_LEN};

use super::{Block, Posting, BLOCK_LIMIT_BYTES};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockError {
    #[error("block holds no postings")]
    Empty,
    #[error("block is {len} bytes, the limit is {limit}")]
    TooLarge { len: usize, limit: usize },
    #[error("group at byte {offset} runs past the end of the block")]
    TruncatedGroup { offset: usize },
    #[error("value at byte {offset} runs past the end of the block")]
    TruncatedValue { offset: usize },
    #[error("block starts with a gap of {delta}, expected 0")]
    LeadingGap { delta: u32 },
    #[error("posting {index} overflows the identifier")]
    Overflow { index: usize },
    #[error("{extra} bytes left after the last posting")]
    TrailingBytes { extra: usize },
}

/// Checks that `block` decodes within its own bytes, for blocks read back from untrusted storage.
///
/// Cursors never check anything, a block that passes here is safe to open.
pub fn validate<P: Posting>(block: &Block<P>) -> Result<(), BlockError> {
    validate_with(block, &GroupVarint::new(), BLOCK_LIMIT_BYTES)
}

pub fn validate_with<P: Posting, C: CheckedGroupCodec>(
    block: &Block<P>,
    codec: &C,
    limit_bytes: usize,
) -> Result<(), BlockError> {
    let result = walk(block, codec, limit_bytes);
    if let Err(e) = &result {
        debug!(error = %e, count = block.count, bytes = block.len(), "rejected block");
    }
    result
}

fn walk<P: Posting, C: CheckedGroupCodec>(
    block: &Block<P>,
    codec: &C,
    limit_bytes: usize,
) -> Result<(), BlockError> {
    let data = block.data();
    if block.count == 0 {
        return Err(BlockError::Empty);
    }
    if data.len() >= limit_bytes {
        return Err(BlockError::TooLarge {
            len: data.len(),
            limit: limit_bytes,
        });
    }

    let count = usize::from(block.count);
    let mut deltas = Vec::with_capacity(count);
    let mut offset = 0;
    for _ in 0..count / GROUP_LEN {
        let len = data
            .get(offset)
            .map(|&selector| codec.group_len(selector))
            .filter(|&len| offset + len <= data.len())
            .ok_or(BlockError::TruncatedGroup { offset })?;
        deltas.extend(codec.decode_group(&data[offset..offset + len]));
        offset += len;
    }
    for _ in 0..count % GROUP_LEN {
        let len = codec
            .checked_single_len(&data[offset..])
            .ok_or(BlockError::TruncatedValue { offset })?;
        let (delta, _) = codec.decode_single(&data[offset..offset + len]);
        deltas.push(delta);
        offset += len;
    }
    if offset != data.len() {
        return Err(BlockError::TrailingBytes {
            extra: data.len() - offset,
        });
    }

    if deltas[0] != 0 {
        return Err(BlockError::LeadingGap { delta: deltas[0] });
    }
    let mut posting = block.first;
    for (index, &delta) in deltas.iter().enumerate().skip(1) {
        let next = posting.forward(delta);
        if posting.doc().checked_add(u64::from(delta)) != Some(next.doc()) {
            return Err(BlockError::Overflow { index });
        }
        posting = next;
    }
    Ok(())
}
