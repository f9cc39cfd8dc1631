use std::io::Write;

use crate::error::{Error, Result};
use crate::primitive;
use crate::registry::{TID_BOOL, TID_BYTE_SLICE, TID_COMPLEX, TID_FLOAT, TID_INT, TID_STRING, TID_UINT};
use crate::value::Value;
use crate::varint::{write_int, write_uint};

pub struct Encoder<W: Write> {
    w: W,
}

impl<W: Write> Encoder<W> {
    pub fn new(w: W) -> Self {
        Encoder { w }
    }

    pub fn into_inner(self) -> W {
        self.w
    }

    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        primitive::write_bool(&mut self.w, v)
    }

    pub fn write_int(&mut self, v: i64) -> Result<()> {
        write_int(&mut self.w, v)
    }

    pub fn write_uint(&mut self, v: u64) -> Result<()> {
        write_uint(&mut self.w, v)
    }

    pub fn write_float(&mut self, v: f64) -> Result<()> {
        primitive::write_float(&mut self.w, v)
    }

    pub fn write_bytes(&mut self, v: &[u8]) -> Result<()> {
        primitive::write_bytes(&mut self.w, v)
    }

    pub fn write_string(&mut self, v: &str) -> Result<()> {
        primitive::write_string(&mut self.w, v)
    }

    pub fn write_complex(&mut self, re: f64, im: f64) -> Result<()> {
        primitive::write_complex(&mut self.w, re, im)
    }
}

fn encode_message(tid: i64, body: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> Result<Vec<u8>> {
    let mut segment_body = Vec::new();
    write_int(&mut segment_body, tid)?;
    segment_body.push(0);
    body(&mut segment_body)?;

    let mut out = Vec::new();
    write_uint(&mut out, segment_body.len() as u64)?;
    out.extend_from_slice(&segment_body);
    Ok(out)
}

pub fn encode_bool(v: bool) -> Result<Vec<u8>> {
    encode_message(TID_BOOL, |w| primitive::write_bool(w, v))
}

pub fn encode_int(v: i64) -> Result<Vec<u8>> {
    encode_message(TID_INT, |w| write_int(w, v))
}

pub fn encode_uint(v: u64) -> Result<Vec<u8>> {
    encode_message(TID_UINT, |w| write_uint(w, v))
}

pub fn encode_float(v: f64) -> Result<Vec<u8>> {
    encode_message(TID_FLOAT, |w| primitive::write_float(w, v))
}

pub fn encode_bytes(v: &[u8]) -> Result<Vec<u8>> {
    encode_message(TID_BYTE_SLICE, |w| primitive::write_bytes(w, v))
}

pub fn encode_string(v: &[u8]) -> Result<Vec<u8>> {
    encode_message(TID_STRING, |w| primitive::write_bytes(w, v))
}

pub fn encode_complex(re: f64, im: f64) -> Result<Vec<u8>> {
    encode_message(TID_COMPLEX, |w| primitive::write_complex(w, re, im))
}

pub fn encode(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::Bool(v) => encode_bool(*v),
        Value::Int(v) => encode_int(*v),
        Value::Uint(v) => encode_uint(*v),
        Value::Float(v) => encode_float(*v),
        Value::Bytes(v) => encode_bytes(v),
        Value::String(v) => encode_string(v),
        Value::Complex(re, im) => encode_complex(*re, *im),
        other => Err(Error::InvalidEncodeArgument(format!(
            "no standalone wire mapping for compound value {other:?}; encoding compound types is out of scope"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_true_matches_spec_scenario() {
        assert_eq!(encode_bool(true).unwrap(), vec![0x03, 0x02, 0x00, 0x01]);
    }

    #[test]
    fn signed_256_matches_spec_scenario() {
        assert_eq!(
            encode_int(256).unwrap(),
            vec![0x05, 0x04, 0x00, 0xFE, 0x02, 0x00]
        );
    }

    #[test]
    fn float_zero_matches_spec_scenario() {
        assert_eq!(encode_float(0.0).unwrap(), vec![0x03, 0x08, 0x00, 0x00]);
    }

    #[test]
    fn compound_values_are_rejected() {
        let err = encode(&Value::Slice(vec![])).unwrap_err();
        assert!(matches!(err, Error::InvalidEncodeArgument(_)));
    }

    #[test]
    fn encoded_bool_round_trips_through_decode_one() {
        let bytes = encode_bool(true).unwrap();
        let (value, rest) = crate::stream::decode_one(&bytes).unwrap();
        assert_eq!(value, Value::Bool(true));
        assert!(rest.is_empty());
    }
}
