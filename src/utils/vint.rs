const STOP_BIT: u8 = 128;

/// Longest encoding of a `u32`.
pub const MAX_VINT32_LEN: usize = 5;

/// Writes `val` into `out`, returning the number of bytes used.
///
/// `out` must hold at least [`MAX_VINT32_LEN`] bytes.
pub fn encode_vint32(val: u32, out: &mut [u8]) -> usize {
    const START_2: u64 = 1 << 7;
    const START_3: u64 = 1 << 14;
    const START_4: u64 = 1 << 21;
    const START_5: u64 = 1 << 28;

    const MASK_1: u64 = 127;
    const MASK_2: u64 = MASK_1 << 7;
    const MASK_3: u64 = MASK_2 << 7;
    const MASK_4: u64 = MASK_3 << 7;
    const MASK_5: u64 = MASK_4 << 7;

    let val = u64::from(val);
    const STOP_BIT: u64 = 128u64;
    let (res, num_bytes) = if val < START_2 {
        (val | STOP_BIT, 1)
    } else if val < START_3 {
        (
            (val & MASK_1) | ((val & MASK_2) << 1) | (STOP_BIT << (8)),
            2,
        )
    } else if val < START_4 {
        (
            (val & MASK_1) | ((val & MASK_2) << 1) | ((val & MASK_3) << 2) | (STOP_BIT << (8 * 2)),
            3,
        )
    } else if val < START_5 {
        (
            (val & MASK_1)
                | ((val & MASK_2) << 1)
                | ((val & MASK_3) << 2)
                | ((val & MASK_4) << 3)
                | (STOP_BIT << (8 * 3)),
            4,
        )
    } else {
        (
            (val & MASK_1)
                | ((val & MASK_2) << 1)
                | ((val & MASK_3) << 2)
                | ((val & MASK_4) << 3)
                | ((val & MASK_5) << 4)
                | (STOP_BIT << (8 * 4)),
            5,
        )
    };
    out[..num_bytes].copy_from_slice(&res.to_le_bytes()[..num_bytes]);
    num_bytes
}

/// Reads one value from the front of `data`, returning it with the number of bytes consumed.
///
/// `data` must start with a value written by [`encode_vint32`].
#[inline]
pub fn decode_vint32(data: &[u8]) -> (u32, usize) {
    let vlen = vint32_len(data);
    let mut result = 0u32;
    let mut shift = 0u32;
    for &b in &data[..vlen] {
        result |= u32::from(b & 127u8) << shift;
        shift += 7;
    }
    (result, vlen)
}

/// Length of the value at the front of `data`, or `None` if no stop bit shows up in time.
pub fn checked_vint32_len(data: &[u8]) -> Option<usize> {
    data.iter()
        .take(MAX_VINT32_LEN)
        .position(|&b| b >= STOP_BIT)
        .map(|i| i + 1)
}

#[inline]
fn vint32_len(data: &[u8]) -> usize {
    for (i, &val) in data.iter().enumerate().take(MAX_VINT32_LEN) {
        if val >= STOP_BIT {
            return i + 1;
        }
    }
    panic!("Corrupted data. Invalid VInt 32");
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_vint32_1() {
        let mut buf = [0u8; MAX_VINT32_LEN];

        for _ in 0..100000 {
            let val = rand::random::<u32>();
            let len = encode_vint32(val, &mut buf);
            assert_eq!((val, len), decode_vint32(&buf[..len]));
        }
    }

    #[test]
    fn test_vint32_2() {
        let mut buf = [0u8; MAX_VINT32_LEN];
        let mut stream = Vec::new();
        let mut reference = Vec::new();

        for _ in 0..100000 {
            let val = rand::random::<u32>() >> (rand::random::<u32>() % 32);
            let len = encode_vint32(val, &mut buf);
            stream.extend_from_slice(&buf[..len]);
            reference.push(val);
        }
        let mut data = stream.as_slice();
        for &expected in &reference {
            let (val, len) = decode_vint32(data);
            assert_eq!(expected, val);
            data = &data[len..];
        }
        assert!(data.is_empty());
    }

    #[test]
    fn test_vint32_len_boundaries() {
        let mut buf = [0u8; MAX_VINT32_LEN];
        for (val, len) in [
            (0, 1),
            (127, 1),
            (128, 2),
            ((1 << 14) - 1, 2),
            (1 << 14, 3),
            (1 << 21, 4),
            (1 << 28, 5),
            (u32::MAX, 5),
        ] {
            assert_eq!(len, encode_vint32(val, &mut buf), "value {val}");
            assert_eq!(Some(len), checked_vint32_len(&buf));
        }
    }

    #[test]
    fn test_checked_vint32_len_truncated() {
        assert_eq!(None, checked_vint32_len(&[]));
        assert_eq!(None, checked_vint32_len(&[0x01, 0x02]));
        assert_eq!(None, checked_vint32_len(&[0; 6]));
    }

    #[test]
    fn test_encode_vint32_short_buffer() {
        // only the bytes actually used are touched
        let mut buf = [0xffu8; 2];
        assert_eq!(2, encode_vint32(300, &mut buf));
        assert_eq!((300, 2), decode_vint32(&buf));

        let mut buf = [0xffu8; 1];
        assert_eq!(1, encode_vint32(5, &mut buf));
        assert_eq!([0x85], buf);
    }

    #[test]
    #[should_panic]
    fn test_encode_vint32_buffer_too_short() {
        let mut buf = [0u8; 2];
        encode_vint32(1 << 21, &mut buf);
    }
}
