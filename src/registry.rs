use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::primitive;
use crate::types::WireType;
use crate::value::{Record, Value};
use crate::varint::{read_int, read_uint};

pub const TID_BOOL: i64 = 1;
pub const TID_INT: i64 = 2;
pub const TID_UINT: i64 = 3;
pub const TID_FLOAT: i64 = 4;
pub const TID_BYTE_SLICE: i64 = 5;
pub const TID_STRING: i64 = 6;
pub const TID_COMPLEX: i64 = 7;
#[allow(dead_code)] // interface values are out of scope
pub const TID_INTERFACE: i64 = 8;
pub const TID_WIRE_TYPE: i64 = 16;
pub const TID_ARRAY_TYPE: i64 = 17;
pub const TID_COMMON_TYPE: i64 = 18;
pub const TID_SLICE_TYPE: i64 = 19;
pub const TID_STRUCT_TYPE: i64 = 20;
pub const TID_FIELD_TYPE: i64 = 21;
pub const TID_FIELD_TYPE_SLICE: i64 = 22;
pub const TID_MAP_TYPE: i64 = 23;

#[derive(Debug, Clone)]
pub struct StructDef {
    pub name: String,
    pub fields: Vec<(String, i64)>,
}

#[derive(Debug, Clone)]
pub enum DecoderKind {
    Bool,
    Int,
    Uint,
    Float,
    ByteSlice,
    String,
    Complex,
    Struct(Rc<StructDef>),
    // element TID, declared length
    Array(i64, usize),
    // element TID
    Slice(i64),
    // key TID, element TID
    Map(i64, i64),
}

pub struct Registry {
    kinds: HashMap<i64, DecoderKind>,
}

impl Registry {
    // bootstrap entries reference each other by TID only, never direct ownership,
    // so the field_type_slice/struct_type/wire_type cycle builds in one pass
    pub fn new() -> Self {
        let mut kinds = HashMap::new();
        kinds.insert(TID_BOOL, DecoderKind::Bool);
        kinds.insert(TID_INT, DecoderKind::Int);
        kinds.insert(TID_UINT, DecoderKind::Uint);
        kinds.insert(TID_FLOAT, DecoderKind::Float);
        kinds.insert(TID_BYTE_SLICE, DecoderKind::ByteSlice);
        kinds.insert(TID_STRING, DecoderKind::String);
        kinds.insert(TID_COMPLEX, DecoderKind::Complex);

        kinds.insert(
            TID_COMMON_TYPE,
            DecoderKind::Struct(Rc::new(StructDef {
                name: "common_type".into(),
                fields: vec![("Name".into(), TID_STRING), ("Id".into(), TID_INT)],
            })),
        );
        kinds.insert(
            TID_ARRAY_TYPE,
            DecoderKind::Struct(Rc::new(StructDef {
                name: "array_type".into(),
                fields: vec![
                    ("CommonType".into(), TID_COMMON_TYPE),
                    ("Elem".into(), TID_INT),
                    ("Len".into(), TID_INT),
                ],
            })),
        );
        kinds.insert(
            TID_SLICE_TYPE,
            DecoderKind::Struct(Rc::new(StructDef {
                name: "slice_type".into(),
                fields: vec![
                    ("CommonType".into(), TID_COMMON_TYPE),
                    ("Elem".into(), TID_INT),
                ],
            })),
        );
        kinds.insert(
            TID_FIELD_TYPE,
            DecoderKind::Struct(Rc::new(StructDef {
                name: "field_type".into(),
                fields: vec![("Name".into(), TID_STRING), ("Id".into(), TID_INT)],
            })),
        );
        kinds.insert(TID_FIELD_TYPE_SLICE, DecoderKind::Slice(TID_FIELD_TYPE));
        kinds.insert(
            TID_STRUCT_TYPE,
            DecoderKind::Struct(Rc::new(StructDef {
                name: "struct_type".into(),
                fields: vec![
                    ("CommonType".into(), TID_COMMON_TYPE),
                    ("Field".into(), TID_FIELD_TYPE_SLICE),
                ],
            })),
        );
        kinds.insert(
            TID_MAP_TYPE,
            DecoderKind::Struct(Rc::new(StructDef {
                name: "map_type".into(),
                fields: vec![
                    ("CommonType".into(), TID_COMMON_TYPE),
                    ("Key".into(), TID_INT),
                    ("Elem".into(), TID_INT),
                ],
            })),
        );
        kinds.insert(
            TID_WIRE_TYPE,
            DecoderKind::Struct(Rc::new(StructDef {
                name: "wire_type".into(),
                fields: vec![
                    ("ArrayT".into(), TID_ARRAY_TYPE),
                    ("SliceT".into(), TID_SLICE_TYPE),
                    ("StructT".into(), TID_STRUCT_TYPE),
                    ("MapT".into(), TID_MAP_TYPE),
                ],
            })),
        );

        Registry { kinds }
    }

    pub fn get(&self, tid: i64) -> Option<&DecoderKind> {
        self.kinds.get(&tid)
    }

    // rebinding an already-registered TID overwrites silently, matching the reference
    pub fn register(&mut self, tid: i64, kind: DecoderKind) {
        self.kinds.insert(tid, kind);
    }

    pub fn zero_value(&self, tid: i64) -> Result<Value> {
        let kind = self.get(tid).ok_or(Error::UnknownType(tid))?;
        Ok(match kind {
            DecoderKind::Bool => Value::Bool(false),
            DecoderKind::Int => Value::Int(0),
            DecoderKind::Uint => Value::Uint(0),
            DecoderKind::Float => Value::Float(0.0),
            DecoderKind::ByteSlice => Value::Bytes(Vec::new()),
            DecoderKind::String => Value::String(Vec::new()),
            DecoderKind::Complex => Value::Complex(0.0, 0.0),
            DecoderKind::Struct(def) => {
                let mut fields = Vec::with_capacity(def.fields.len());
                for (name, ftid) in &def.fields {
                    fields.push((name.clone(), self.zero_value(*ftid)?));
                }
                Value::Struct(Record {
                    name: def.name.clone(),
                    fields,
                })
            }
            DecoderKind::Array(elem, len) => {
                let zero = self.zero_value(*elem)?;
                Value::Array(std::iter::repeat(zero).take(*len).collect())
            }
            DecoderKind::Slice(_) => Value::Slice(Vec::new()),
            DecoderKind::Map(_, _) => Value::Map(BTreeMap::new()),
        })
    }

    pub fn decode_value<R: Read>(&self, tid: i64, r: &mut R) -> Result<Value> {
        let kind = self.get(tid).ok_or(Error::UnknownType(tid))?.clone();
        self.decode_kind(&kind, r)
    }

    fn decode_kind<R: Read>(&self, kind: &DecoderKind, r: &mut R) -> Result<Value> {
        match kind {
            DecoderKind::Bool => Ok(Value::Bool(primitive::read_bool(r)?)),
            DecoderKind::Int => Ok(Value::Int(read_int(r)?)),
            DecoderKind::Uint => Ok(Value::Uint(read_uint(r)?)),
            DecoderKind::Float => Ok(Value::Float(primitive::read_float(r)?)),
            DecoderKind::ByteSlice => Ok(Value::Bytes(primitive::read_bytes(r)?)),
            DecoderKind::String => Ok(Value::String(primitive::read_string_bytes(r)?)),
            DecoderKind::Complex => {
                let (re, im) = primitive::read_complex(r)?;
                Ok(Value::Complex(re, im))
            }
            DecoderKind::Struct(def) => self.decode_struct(def, r),
            DecoderKind::Array(elem, len) => {
                let count = read_uint(r)? as usize;
                if count != *len {
                    return Err(Error::ArrayLengthMismatch {
                        declared: *len,
                        actual: count,
                    });
                }
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.decode_value(*elem, r)?);
                }
                Ok(Value::Array(items))
            }
            DecoderKind::Slice(elem) => {
                let count = read_uint(r)? as usize;
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.decode_value(*elem, r)?);
                }
                Ok(Value::Slice(items))
            }
            DecoderKind::Map(key, elem) => {
                let count = read_uint(r)? as usize;
                let mut map = BTreeMap::new();
                for _ in 0..count {
                    let k = self.decode_value(*key, r)?;
                    let v = self.decode_value(*elem, r)?;
                    map.insert(k, v);
                }
                Ok(Value::Map(map))
            }
        }
    }

    fn decode_struct<R: Read>(&self, def: &StructDef, r: &mut R) -> Result<Value> {
        let mut fields: Vec<(String, Value)> = def
            .fields
            .iter()
            .map(|(name, tid)| Ok((name.clone(), self.zero_value(*tid)?)))
            .collect::<Result<_>>()?;

        let mut field_idx: i64 = -1;
        loop {
            let delta = read_uint(r)?;
            if delta == 0 {
                break;
            }
            field_idx += delta as i64;
            let idx = usize::try_from(field_idx)
                .ok()
                .filter(|&i| i < fields.len())
                .ok_or(Error::FieldIndexOutOfRange {
                    index: field_idx,
                    len: fields.len(),
                })?;
            let tid = def.fields[idx].1;
            fields[idx].1 = self.decode_value(tid, r)?;
        }
        Ok(Value::Struct(Record {
            name: def.name.clone(),
            fields,
        }))
    }

    // does not register the result, the caller binds it to the TID the stream advertised
    pub fn resolve_wire_type<R: Read>(&self, r: &mut R) -> Result<DecoderKind> {
        let descriptor = self.decode_value(TID_WIRE_TYPE, r)?;
        let wire_type = WireType::try_from(&descriptor)?;

        let mut present = Vec::new();
        if wire_type.array != Default::default() {
            present.push("ArrayT");
        }
        if wire_type.slice != Default::default() {
            present.push("SliceT");
        }
        if wire_type.strct != Default::default() {
            present.push("StructT");
        }
        if wire_type.map != Default::default() {
            present.push("MapT");
        }

        match present.as_slice() {
            ["ArrayT"] => Ok(DecoderKind::Array(
                wire_type.array.elem,
                wire_type.array.len.max(0) as usize,
            )),
            ["SliceT"] => Ok(DecoderKind::Slice(wire_type.slice.elem)),
            ["StructT"] => {
                let fields = wire_type
                    .strct
                    .fields
                    .iter()
                    .map(|f| (f.name.clone(), f.id))
                    .collect();
                Ok(DecoderKind::Struct(Rc::new(StructDef {
                    name: wire_type.strct.common.name.clone(),
                    fields,
                })))
            }
            ["MapT"] => Ok(DecoderKind::Map(wire_type.map.key, wire_type.map.elem)),
            [] => Err(Error::MalformedDescriptor(
                "cannot handle wire type: no sub-field set".into(),
            )),
            other => Err(Error::MalformedDescriptor(format!(
                "cannot handle wire type: multiple sub-fields set ({other:?})"
            ))),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
