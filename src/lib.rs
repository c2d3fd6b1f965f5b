#![allow(clippy::len_without_is_empty)]

pub mod algorithm;
pub mod options;
pub mod postings;
pub mod utils;


pub use options::{BlockOption, OptionError};
pub use postings::{
    validate, Block, BlockBuilder, BlockCursor, BlockError, DocId, Posting, BLOCK_LIMIT_BYTES,
};
