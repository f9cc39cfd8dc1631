use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// field order is not sorted, it's part of the wire contract: deltas are relative to it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub name: String,
    pub fields: Vec<(String, Value)>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    #[serde(with = "serde_bytes")]
    Bytes(Vec<u8>),
    // raw bytes, no charset guarantee
    #[serde(with = "serde_bytes")]
    String(Vec<u8>),
    Complex(f64, f64),
    Array(Vec<Value>),
    Slice(Vec<Value>),
    Map(BTreeMap<Value, Value>),
    Struct(Record),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v.into_bytes())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Uint(a), Uint(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Bytes(a), Bytes(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Complex(ar, ai), Complex(br, bi)) => {
                ar.to_bits() == br.to_bits() && ai.to_bits() == bi.to_bits()
            }
            (Array(a), Array(b)) => a == b,
            (Slice(a), Slice(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Struct(a), Struct(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

// ordering is by variant rank then content, only needed so Value can key a BTreeMap
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        fn rank(v: &Value) -> u8 {
            match v {
                Bool(_) => 0,
                Int(_) => 1,
                Uint(_) => 2,
                Float(_) => 3,
                Bytes(_) => 4,
                String(_) => 5,
                Complex(..) => 6,
                Array(_) => 7,
                Slice(_) => 8,
                Map(_) => 9,
                Struct(_) => 10,
            }
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Uint(a), Uint(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.to_bits().cmp(&b.to_bits()),
            (Bytes(a), Bytes(b)) => a.cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Complex(ar, ai), Complex(br, bi)) => {
                (ar.to_bits(), ai.to_bits()).cmp(&(br.to_bits(), bi.to_bits()))
            }
            (Array(a), Array(b)) => a.cmp(b),
            (Slice(a), Slice(b)) => a.cmp(b),
            (Map(a), Map(b)) => a.cmp(b),
            (Struct(a), Struct(b)) => (&a.name, &a.fields).cmp(&(&b.name, &b.fields)),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
