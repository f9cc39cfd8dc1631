use crate::error::{Error, Result};
use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonType {
    pub name: String,
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayType {
    pub common: CommonType,
    pub elem: i64,
    pub len: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliceType {
    pub common: CommonType,
    pub elem: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldType {
    pub name: String,
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructType {
    pub common: CommonType,
    pub fields: Vec<FieldType>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapType {
    pub common: CommonType,
    pub key: i64,
    pub elem: i64,
}

// presence is determined by comparing each slot against its own Default, not an Option
#[derive(Debug, Clone, Default)]
pub struct WireType {
    pub array: ArrayType,
    pub slice: SliceType,
    pub strct: StructType,
    pub map: MapType,
}

fn as_string(v: &Value) -> Result<String> {
    match v {
        Value::String(bytes) => Ok(String::from_utf8(bytes.clone())?),
        other => Err(Error::MalformedDescriptor(format!(
            "expected a string field, got {other:?}"
        ))),
    }
}

fn as_int(v: &Value) -> Result<i64> {
    match v {
        Value::Int(n) => Ok(*n),
        other => Err(Error::MalformedDescriptor(format!(
            "expected an int field, got {other:?}"
        ))),
    }
}

fn struct_field<'a>(v: &'a Value, type_name: &str) -> Result<&'a crate::value::Record> {
    match v {
        Value::Struct(record) => Ok(record),
        other => Err(Error::MalformedDescriptor(format!(
            "{type_name} descriptor is not a struct: {other:?}"
        ))),
    }
}

impl TryFrom<&Value> for CommonType {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self> {
        let record = struct_field(v, "common_type")?;
        Ok(CommonType {
            name: record.get("Name").map(as_string).transpose()?.unwrap_or_default(),
            id: record.get("Id").map(as_int).transpose()?.unwrap_or_default(),
        })
    }
}

impl TryFrom<&Value> for ArrayType {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self> {
        let record = struct_field(v, "array_type")?;
        let common = match record.get("CommonType") {
            Some(v) => CommonType::try_from(v)?,
            None => CommonType::default(),
        };
        Ok(ArrayType {
            common,
            elem: record.get("Elem").map(as_int).transpose()?.unwrap_or_default(),
            len: record.get("Len").map(as_int).transpose()?.unwrap_or_default(),
        })
    }
}

impl TryFrom<&Value> for SliceType {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self> {
        let record = struct_field(v, "slice_type")?;
        let common = match record.get("CommonType") {
            Some(v) => CommonType::try_from(v)?,
            None => CommonType::default(),
        };
        Ok(SliceType {
            common,
            elem: record.get("Elem").map(as_int).transpose()?.unwrap_or_default(),
        })
    }
}

impl TryFrom<&Value> for FieldType {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self> {
        let record = struct_field(v, "field_type")?;
        Ok(FieldType {
            name: record.get("Name").map(as_string).transpose()?.unwrap_or_default(),
            id: record.get("Id").map(as_int).transpose()?.unwrap_or_default(),
        })
    }
}

impl TryFrom<&Value> for StructType {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self> {
        let record = struct_field(v, "struct_type")?;
        let common = match record.get("CommonType") {
            Some(v) => CommonType::try_from(v)?,
            None => CommonType::default(),
        };
        let fields = match record.get("Field") {
            Some(Value::Slice(items)) => items
                .iter()
                .map(FieldType::try_from)
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(Error::MalformedDescriptor(format!(
                    "struct_type.Field is not a slice: {other:?}"
                )));
            }
            None => Vec::new(),
        };
        Ok(StructType { common, fields })
    }
}

impl TryFrom<&Value> for MapType {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self> {
        let record = struct_field(v, "map_type")?;
        let common = match record.get("CommonType") {
            Some(v) => CommonType::try_from(v)?,
            None => CommonType::default(),
        };
        Ok(MapType {
            common,
            key: record.get("Key").map(as_int).transpose()?.unwrap_or_default(),
            elem: record.get("Elem").map(as_int).transpose()?.unwrap_or_default(),
        })
    }
}

impl TryFrom<&Value> for WireType {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self> {
        let record = struct_field(v, "wire_type")?;
        let array = match record.get("ArrayT") {
            Some(v) => ArrayType::try_from(v)?,
            None => ArrayType::default(),
        };
        let slice = match record.get("SliceT") {
            Some(v) => SliceType::try_from(v)?,
            None => SliceType::default(),
        };
        let strct = match record.get("StructT") {
            Some(v) => StructType::try_from(v)?,
            None => StructType::default(),
        };
        let map = match record.get("MapT") {
            Some(v) => MapType::try_from(v)?,
            None => MapType::default(),
        };
        Ok(WireType { array, slice, strct, map })
    }
}
