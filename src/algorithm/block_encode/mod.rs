mod group_varint;

pub use group_varint::GroupVarint;

/// Number of values packed behind one selector byte.
pub const GROUP_LEN: usize = 4;

/// One selector byte plus four full-width values.
pub const MAX_GROUP_BYTES: usize = 1 + GROUP_LEN * std::mem::size_of::<u32>();

/// Byte-aligned integer primitives a block is packed with.
///
/// Output buffers are sized for the worst case, [`MAX_GROUP_BYTES`]. Decoding trusts its input:
/// `data` must start at a group or value written by the matching encode call.
pub trait GroupCodec {
    /// Packs four values behind one selector byte, returning the bytes written.
    fn encode_group(&self, values: &[u32; GROUP_LEN], out: &mut [u8; MAX_GROUP_BYTES]) -> usize;
    /// Packs one value into the front of `out`, returning the bytes written.
    fn encode_single(&self, value: u32, out: &mut [u8; MAX_GROUP_BYTES]) -> usize;
    fn decode_group(&self, data: &[u8]) -> [u32; GROUP_LEN];
    /// Returns the value and the number of bytes it took.
    fn decode_single(&self, data: &[u8]) -> (u32, usize);
    /// Total bytes, selector included, of the group starting with `selector`.
    fn group_len(&self, selector: u8) -> usize;
}

/// Codecs that can measure a single value without trusting the input.
pub trait CheckedGroupCodec: GroupCodec {
    /// Length of the single value at the front of `data`, `None` if it runs off the end.
    fn checked_single_len(&self, data: &[u8]) -> Option<usize>;
}
