use byteorder::{BigEndian, ByteOrder};
use std::io::{Read, Write};

use crate::error::{Error, Result};

fn read_u8<R: Read>(r: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::truncated(1, 0),
        _ => Error::Io(e),
    })?;
    Ok(buf[0])
}

pub fn read_uint<R: Read>(r: &mut R) -> Result<u64> {
    let b0 = read_u8(r)?;
    if b0 < 0x80 {
        return Ok(b0 as u64);
    }
    let len = 256 - b0 as usize;
    if len > 8 {
        return Err(Error::MalformedDescriptor(format!(
            "varint byte count {len} exceeds 8"
        )));
    }
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf[..len]).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::truncated(len, 0),
        _ => Error::Io(e),
    })?;
    Ok(BigEndian::read_uint(&buf[..len], len))
}

pub fn read_int<R: Read>(r: &mut R) -> Result<i64> {
    let u = read_uint(r)?;
    if u & 1 == 1 {
        Ok(!(u >> 1) as i64)
    } else {
        Ok((u >> 1) as i64)
    }
}

pub fn write_uint<W: Write>(w: &mut W, v: u64) -> Result<()> {
    if v < 0x80 {
        w.write_all(&[v as u8])?;
        return Ok(());
    }
    let mut buf = [0u8; 8];
    BigEndian::write_u64(&mut buf, v);
    let first_nonzero = buf.iter().position(|&b| b != 0).unwrap_or(7);
    let bytes = &buf[first_nonzero..];
    w.write_all(&[(256 - bytes.len()) as u8])?;
    w.write_all(bytes)?;
    Ok(())
}

pub fn write_int<W: Write>(w: &mut W, v: i64) -> Result<()> {
    let u = if v < 0 {
        ((!v) as u64) << 1 | 1
    } else {
        (v as u64) << 1
    };
    write_uint(w, u)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn roundtrip_uint(v: u64) -> u64 {
        let mut buf = Vec::new();
        write_uint(&mut buf, v).unwrap();
        read_uint(&mut Cursor::new(buf)).unwrap()
    }

    fn roundtrip_int(v: i64) -> i64 {
        let mut buf = Vec::new();
        write_int(&mut buf, v).unwrap();
        read_int(&mut Cursor::new(buf)).unwrap()
    }

    #[test]
    fn single_byte_uints() {
        for v in [0u64, 1, 127] {
            let mut buf = Vec::new();
            write_uint(&mut buf, v).unwrap();
            assert_eq!(buf.len(), 1);
            assert_eq!(roundtrip_uint(v), v);
        }
    }

    #[test]
    fn multi_byte_uints_match_spec_scenarios() {
        // Unsigned 256: [05, 06, 00, FE, 01, 00] decodes to 256 (inner varint [FE, 01, 00]).
        let mut buf = Vec::new();
        write_uint(&mut buf, 256).unwrap();
        assert_eq!(buf, vec![0xFE, 0x01, 0x00]);
        assert_eq!(read_uint(&mut Cursor::new(buf)).unwrap(), 256);
    }

    #[test]
    fn no_leading_zero_bytes() {
        for v in [128u64, 256, 65536, u64::MAX] {
            let mut buf = Vec::new();
            write_uint(&mut buf, v).unwrap();
            assert_ne!(buf[1], 0, "leading zero byte for {v}");
        }
    }

    #[test]
    fn signed_scenarios() {
        // Signed -3 wire form, per the spec's worked example.
        let mut buf = Vec::new();
        write_int(&mut buf, -3).unwrap();
        assert_eq!(buf, vec![0x05]);
        assert_eq!(read_int(&mut Cursor::new(buf)).unwrap(), -3);

        for v in [-3i64, -1, 0, 1, 2, i64::MIN, i64::MAX] {
            assert_eq!(roundtrip_int(v), v);
        }
    }

    #[test]
    fn truncated_varint_errors() {
        let buf = vec![0xFEu8, 0x01]; // claims two more bytes, only one present
        let err = read_uint(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, Error::Truncated { .. }));
    }

    proptest::proptest! {
        #[test]
        fn uint_roundtrips(v: u64) {
            proptest::prop_assert_eq!(roundtrip_uint(v), v);
        }

        #[test]
        fn int_roundtrips(v: i64) {
            proptest::prop_assert_eq!(roundtrip_int(v), v);
        }

        #[test]
        fn uint_minimal_length(v: u64) {
            let mut buf = Vec::new();
            write_uint(&mut buf, v).unwrap();
            let expected_len = if v < 0x80 {
                1
            } else {
                let bytes = 8 - (v.leading_zeros() as usize / 8);
                bytes + 1
            };
            proptest::prop_assert_eq!(buf.len(), expected_len);
        }
    }
}
