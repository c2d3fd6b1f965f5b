mod block_encode;

pub use block_encode::{CheckedGroupCodec, GroupCodec, GroupVarint, GROUP_LEN, MAX_GROUP_BYTES};
