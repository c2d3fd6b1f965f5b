// group varint: one selector byte, then four little-endian values of 1..=4 bytes each.
// bits 2i..2i+2 of the selector hold the byte length of value i, minus one.
// single values fall back to stop-bit vint.

use super::{CheckedGroupCodec, GroupCodec, GROUP_LEN, MAX_GROUP_BYTES};
use crate::utils::vint;

const GROUP_BYTES: [u8; 256] = group_bytes_table();

const fn group_bytes_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut selector = 0;
    while selector < 256 {
        let mut len = 1;
        let mut i = 0;
        while i < GROUP_LEN {
            len += ((selector >> (2 * i)) & 3) + 1;
            i += 1;
        }
        table[selector] = len as u8;
        selector += 1;
    }
    table
}

#[inline]
fn byte_len(v: u32) -> usize {
    (4 - v.leading_zeros() as usize / 8).max(1)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GroupVarint;

impl GroupVarint {
    pub fn new() -> Self {
        Self
    }
}

impl GroupCodec for GroupVarint {
    fn encode_group(&self, values: &[u32; GROUP_LEN], out: &mut [u8; MAX_GROUP_BYTES]) -> usize {
        let mut selector = 0u8;
        let mut written = 1;
        for (i, &v) in values.iter().enumerate() {
            let len = byte_len(v);
            out[written..written + len].copy_from_slice(&v.to_le_bytes()[..len]);
            selector |= ((len - 1) as u8) << (2 * i);
            written += len;
        }
        out[0] = selector;
        written
    }

    fn encode_single(&self, value: u32, out: &mut [u8; MAX_GROUP_BYTES]) -> usize {
        vint::encode_vint32(value, out)
    }

    #[inline]
    fn decode_group(&self, data: &[u8]) -> [u32; GROUP_LEN] {
        let selector = data[0];
        let mut offset = 1;
        let mut values = [0u32; GROUP_LEN];
        for (i, v) in values.iter_mut().enumerate() {
            let len = ((selector >> (2 * i)) & 3) as usize + 1;
            let mut bytes = [0u8; 4];
            bytes[..len].copy_from_slice(&data[offset..offset + len]);
            *v = u32::from_le_bytes(bytes);
            offset += len;
        }
        values
    }

    #[inline]
    fn decode_single(&self, data: &[u8]) -> (u32, usize) {
        vint::decode_vint32(data)
    }

    #[inline]
    fn group_len(&self, selector: u8) -> usize {
        GROUP_BYTES[selector as usize] as usize
    }
}

impl CheckedGroupCodec for GroupVarint {
    fn checked_single_len(&self, data: &[u8]) -> Option<usize> {
        vint::checked_vint32_len(data)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_group_varint_random() {
        let codec = GroupVarint::new();
        let mut buf = [0u8; MAX_GROUP_BYTES];

        for _ in 0..100000 {
            let values: [u32; GROUP_LEN] =
                std::array::from_fn(|_| rand::random::<u32>() >> (rand::random::<u32>() % 32));
            let written = codec.encode_group(&values, &mut buf);
            assert_eq!(written, codec.group_len(buf[0]));
            assert_eq!(values, codec.decode_group(&buf[..written]));
        }
    }

    #[test]
    fn test_group_varint_widths() {
        let codec = GroupVarint::new();
        let mut buf = [0u8; MAX_GROUP_BYTES];

        let written = codec.encode_group(&[0, 0, 0, 0], &mut buf);
        assert_eq!(5, written);
        assert_eq!(0, buf[0]);

        let written = codec.encode_group(&[u32::MAX; GROUP_LEN], &mut buf);
        assert_eq!(MAX_GROUP_BYTES, written);
        assert_eq!(0xff, buf[0]);

        let written = codec.encode_group(&[1, 256, 65536, 1 << 24], &mut buf);
        assert_eq!(1 + 1 + 2 + 3 + 4, written);
        assert_eq!(0b11_10_01_00, buf[0]);
        assert_eq!([1, 256, 65536, 1 << 24], codec.decode_group(&buf[..written]));
    }

    #[test]
    fn test_group_len_table() {
        let codec = GroupVarint::new();
        assert_eq!(5, codec.group_len(0x00));
        assert_eq!(17, codec.group_len(0xff));
        assert_eq!(1 + 2 + 1 + 1 + 4, codec.group_len(0b11_00_00_01));
    }

    #[test]
    fn test_single_stream() {
        let codec = GroupVarint::new();
        let mut buf = [0u8; MAX_GROUP_BYTES];
        let mut stream = Vec::new();
        let values = [0u32, 1, 127, 128, 300, 1 << 20, u32::MAX];
        for &v in &values {
            let written = codec.encode_single(v, &mut buf);
            assert_eq!(Some(written), codec.checked_single_len(&buf[..written]));
            stream.extend_from_slice(&buf[..written]);
        }
        let mut data = stream.as_slice();
        for &expected in &values {
            let (v, read) = codec.decode_single(data);
            assert_eq!(expected, v);
            data = &data[read..];
        }
        assert!(data.is_empty());
    }
}
