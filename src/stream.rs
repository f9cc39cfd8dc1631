use std::io::{Cursor, Read};

use crate::error::{Error, Result};
use crate::registry::{DecoderKind, Registry};
use crate::value::Value;
use crate::varint::{read_int, read_uint};

fn read_segment(input: &[u8], pos: usize) -> Result<(&[u8], usize)> {
    let mut header = Cursor::new(&input[pos..]);
    let seg_len = read_uint(&mut header)? as usize;
    let header_len = header.position() as usize;
    let seg_start = pos + header_len;
    let seg_end = seg_start
        .checked_add(seg_len)
        .filter(|&end| end <= input.len())
        .ok_or_else(|| Error::truncated(seg_len, input.len().saturating_sub(seg_start)))?;
    Ok((&input[seg_start..seg_end], seg_end))
}

fn decode_message(registry: &mut Registry, input: &[u8]) -> Result<(Value, usize)> {
    let mut pos = 0usize;
    loop {
        let (segment, seg_end) = read_segment(input, pos)?;
        let mut cursor = Cursor::new(segment);
        let tid = read_int(&mut cursor)?;

        if tid < 0 {
            let def_id = -tid;
            let kind = registry.resolve_wire_type(&mut cursor)?;
            let consumed = cursor.position() as usize;
            if consumed != segment.len() {
                return Err(Error::SegmentLengthMismatch {
                    declared: segment.len(),
                    consumed,
                });
            }
            tracing::debug!(type_id = def_id, "registered gob type");
            registry.register(def_id, kind);
            pos = seg_end;
            continue;
        }

        if tid == 0 {
            return Err(Error::MalformedDescriptor(
                "segment tag 0 is only valid as a struct field-delta terminator".into(),
            ));
        }

        let kind = registry
            .get(tid)
            .cloned()
            .ok_or(Error::UnknownType(tid))?;
        if !matches!(kind, DecoderKind::Struct(_)) {
            // non-struct top-level values are framed as a one-field struct
            let mut skip = [0u8; 1];
            cursor
                .read_exact(&mut skip)
                .map_err(|_| Error::truncated(1, 0))?;
        }
        let value = registry.decode_value(tid, &mut cursor)?;
        let consumed = cursor.position() as usize;
        if consumed != segment.len() {
            return Err(Error::SegmentLengthMismatch {
                declared: segment.len(),
                consumed,
            });
        }
        return Ok((value, seg_end));
    }
}

pub fn decode_one(input: &[u8]) -> Result<(Value, &[u8])> {
    let mut registry = Registry::new();
    let (value, consumed) = decode_message(&mut registry, input)?;
    Ok((value, &input[consumed..]))
}

pub struct DecodeAll<'a> {
    registry: Registry,
    input: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Iterator for DecodeAll<'a> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.pos == self.input.len() {
            self.done = true;
            return None;
        }
        match decode_message(&mut self.registry, &self.input[self.pos..]) {
            Ok((value, consumed)) => {
                self.pos += consumed;
                Some(Ok(value))
            }
            Err(Error::Truncated { .. }) => {
                self.done = true;
                Some(Err(Error::TrailingBytes(self.input.len() - self.pos)))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

pub fn decode_all(input: &[u8]) -> DecodeAll<'_> {
    DecodeAll {
        registry: Registry::new(),
        input,
        pos: 0,
        done: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(tid: i64, body: &[u8]) -> Vec<u8> {
        let mut payload = Vec::new();
        crate::varint::write_int(&mut payload, tid).unwrap();
        payload.extend_from_slice(body);
        let mut out = Vec::new();
        crate::varint::write_uint(&mut out, payload.len() as u64).unwrap();
        out.extend_from_slice(&payload);
        out
    }

    #[test]
    fn decodes_a_bare_uint_message() {
        // tid=3 (uint), skip byte, value 1: matches §8 scenario ([3, 6, 0, 1]).
        let bytes = segment(3, &[0x00, 0x01]);
        let (value, rest) = decode_one(&bytes).unwrap();
        assert_eq!(value, Value::Uint(1));
        assert!(rest.is_empty());
    }

    #[test]
    fn decodes_a_bare_bool_message() {
        let bytes = segment(1, &[0x00, 0x01]);
        let (value, _) = decode_one(&bytes).unwrap();
        assert_eq!(value, Value::Bool(true));
    }

    #[test]
    fn unknown_type_id_is_rejected() {
        let bytes = segment(42, &[0x00]);
        assert!(matches!(decode_one(&bytes), Err(Error::UnknownType(42))));
    }

    #[test]
    fn decode_all_stops_cleanly_at_end_of_input() {
        let mut bytes = segment(3, &[0x00, 0x01]);
        bytes.extend(segment(3, &[0x00, 0x02]));
        let values: Result<Vec<Value>> = decode_all(&bytes).collect();
        assert_eq!(values.unwrap(), vec![Value::Uint(1), Value::Uint(2)]);
    }

    #[test]
    fn decode_all_reports_trailing_bytes() {
        let mut bytes = segment(3, &[0x00, 0x01]);
        bytes.push(0xFE); // a truncated varint header for a message that never completes
        let mut iter = decode_all(&bytes);
        assert_eq!(iter.next().unwrap().unwrap(), Value::Uint(1));
        assert!(matches!(iter.next(), Some(Err(Error::TrailingBytes(_)))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn registers_and_decodes_a_struct() {
        // Register struct_type-shaped "Point" at id 65 with two int fields,
        // then decode a value segment for it (§8 scenario 6).
        use crate::varint::{write_int, write_uint};

        let mut wire_type_body = Vec::new();
        // field 3 (StructT): delta 3, then struct_type { CommonType{Name,Id}, Field [...] }
        write_uint(&mut wire_type_body, 3).unwrap();
        {
            // CommonType: field 0 (Name) delta 1, field 1 (Id) delta 1
            write_uint(&mut wire_type_body, 1).unwrap();
            crate::primitive::write_string(&mut wire_type_body, "Point").unwrap();
            write_uint(&mut wire_type_body, 1).unwrap();
            write_int(&mut wire_type_body, 65).unwrap();
            write_uint(&mut wire_type_body, 0).unwrap(); // end CommonType

            // Field (field_type_slice): two field_type entries
            write_uint(&mut wire_type_body, 1).unwrap();
            write_uint(&mut wire_type_body, 2).unwrap(); // slice length
            // field_type{Name:"X", Id:2 (int)}
            write_uint(&mut wire_type_body, 1).unwrap();
            crate::primitive::write_string(&mut wire_type_body, "X").unwrap();
            write_uint(&mut wire_type_body, 1).unwrap();
            write_int(&mut wire_type_body, 2).unwrap();
            write_uint(&mut wire_type_body, 0).unwrap();
            // field_type{Name:"Y", Id:2 (int)}
            write_uint(&mut wire_type_body, 1).unwrap();
            crate::primitive::write_string(&mut wire_type_body, "Y").unwrap();
            write_uint(&mut wire_type_body, 1).unwrap();
            write_int(&mut wire_type_body, 2).unwrap();
            write_uint(&mut wire_type_body, 0).unwrap();
        }
        write_uint(&mut wire_type_body, 0).unwrap(); // end struct_type
        write_uint(&mut wire_type_body, 0).unwrap(); // end wire_type

        let mut registration = Vec::new();
        write_int(&mut registration, -65).unwrap();
        registration.extend_from_slice(&wire_type_body);
        let mut reg_segment = Vec::new();
        write_uint(&mut reg_segment, registration.len() as u64).unwrap();
        reg_segment.extend_from_slice(&registration);

        let mut value_body = Vec::new();
        write_uint(&mut value_body, 1).unwrap();
        write_int(&mut value_body, 17).unwrap();
        write_uint(&mut value_body, 1).unwrap();
        write_int(&mut value_body, 42).unwrap();
        write_uint(&mut value_body, 0).unwrap();
        let value_segment = segment(65, &value_body);

        let mut stream = reg_segment;
        stream.extend_from_slice(&value_segment);

        let (value, rest) = decode_one(&stream).unwrap();
        assert!(rest.is_empty());
        match value {
            Value::Struct(record) => {
                assert_eq!(record.name, "Point");
                assert_eq!(record.get("X"), Some(&Value::Int(17)));
                assert_eq!(record.get("Y"), Some(&Value::Int(42)));
            }
            other => panic!("expected struct, got {other:?}"),
        }
    }
}
