//! Typed JSON view of wire values.
//!
//! Every container records its element types, so a document converts back
//! to exactly the value it came from:
//!
//! - struct: `[{"id": 1, "type": "bool", "value": true}, ...]`
//! - list/set: `{"type": "i16", "values": [1, 2]}`
//! - map: `{"ktype": "binary", "vtype": "i32", "items": [{"key": "a", "value": 1}]}`
//!
//! Binary values are strings when they hold UTF-8, byte arrays otherwise.
//! Non-finite doubles are the strings `"NaN"`, `"inf"` and `"-inf"`.

use serde_json::{json, Map as JsonMap, Number, Value};

use crate::value::{Field, Map, MapItem, Struct, ValueList, WireValue};
use crate::wire_type::{ParseWireTypeError, WireType};


#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    #[error("expected {expected}, found `{found}`")]
    Shape { expected: &'static str, found: Value },

    #[error("{value} is out of range for {ty}")]
    OutOfRange { ty: WireType, value: Value },

    #[error("missing key `{0}`")]
    MissingKey(&'static str),

    #[error(transparent)]
    TypeName(#[from] ParseWireTypeError),
}

pub type Result<T> = std::result::Result<T, JsonError>;



pub fn to_json(value: &WireValue) -> Value {
    match value {
        WireValue::Bool   (v) => Value::Bool(*v),
        WireValue::I8     (v) => Value::from(*v),
        WireValue::I16    (v) => Value::from(*v),
        WireValue::I32    (v) => Value::from(*v),
        WireValue::I64    (v) => Value::from(*v),
        WireValue::Double (v) => double_to_json(*v),
        WireValue::Binary (v) => {
            match std::str::from_utf8(v) {
                Ok(text) => Value::String(text.to_owned()),
                Err(_)   => Value::Array(v.iter().map(|byte| Value::from(*byte)).collect()),
            }
        },
        WireValue::Struct (v) => {
            Value::Array(v.fields.iter().map(|field| json!({
                "id":    field.id,
                "type":  field.value.wire_type().name(),
                "value": to_json(&field.value),
            })).collect())
        },
        WireValue::Map (v) => {
            json!({
                "ktype": v.key_type.name(),
                "vtype": v.value_type.name(),
                "items": v.items.iter().map(|item| json!({
                    "key":   to_json(&item.key),
                    "value": to_json(&item.value),
                })).collect::<Vec<_>>(),
            })
        },
        WireValue::Set (v) | WireValue::List (v) => {
            json!({
                "type":   v.value_type.name(),
                "values": v.values.iter().map(to_json).collect::<Vec<_>>(),
            })
        },
    }
}

fn double_to_json(value: f64) -> Value {
    if let Some(number) = Number::from_f64(value) {
        return Value::Number(number);
    }
    let text = if value.is_nan() { "NaN" } else if value > 0.0 { "inf" } else { "-inf" };
    Value::String(text.to_owned())
}



pub fn from_json(ty: WireType, value: &Value) -> Result<WireValue> {
    Ok(match ty {
        WireType::Bool => {
            WireValue::Bool(value.as_bool().ok_or_else(|| shape("a boolean", value))?)
        },
        WireType::I8  => WireValue::I8(integer(ty, value)?),
        WireType::I16 => WireValue::I16(integer(ty, value)?),
        WireType::I32 => WireValue::I32(integer(ty, value)?),
        WireType::I64 => WireValue::I64(integer(ty, value)?),
        WireType::Double => WireValue::Double(double_from_json(value)?),
        WireType::Binary => WireValue::Binary(binary_from_json(value)?),
        WireType::Struct => WireValue::Struct(struct_from_json(value)?),
        WireType::Map    => WireValue::Map(map_from_json(value)?),
        WireType::Set    => WireValue::Set(list_from_json(value)?),
        WireType::List   => WireValue::List(list_from_json(value)?),
    })
}

fn shape(expected: &'static str, found: &Value) -> JsonError {
    JsonError::Shape { expected, found: found.clone() }
}

fn integer<T: TryFrom<i64>>(ty: WireType, value: &Value) -> Result<T> {
    let wide = value.as_i64().ok_or_else(|| {
        if value.is_number() && !value.is_f64() {
            JsonError::OutOfRange { ty, value: value.clone() }
        }
        else {
            shape("an integer", value)
        }
    })?;
    T::try_from(wide).map_err(|_| JsonError::OutOfRange { ty, value: value.clone() })
}

fn double_from_json(value: &Value) -> Result<f64> {
    match value {
        Value::Number(number) => number.as_f64().ok_or_else(|| shape("a double", value)),
        Value::String(text) => match text.as_str() {
            "NaN"  => Ok(f64::NAN),
            "inf"  => Ok(f64::INFINITY),
            "-inf" => Ok(f64::NEG_INFINITY),
            _ => Err(shape("a double", value)),
        },
        _ => Err(shape("a double", value)),
    }
}

fn binary_from_json(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::String(text) => Ok(text.as_bytes().to_vec()),
        Value::Array(bytes) => {
            bytes.iter().map(|byte| {
                byte.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| JsonError::OutOfRange { ty: WireType::Binary, value: byte.clone() })
            }).collect()
        },
        _ => Err(shape("a string or byte array", value)),
    }
}

fn object<'v>(value: &'v Value, expected: &'static str) -> Result<&'v JsonMap<String, Value>> {
    value.as_object().ok_or_else(|| shape(expected, value))
}

fn key<'v>(object: &'v JsonMap<String, Value>, key: &'static str) -> Result<&'v Value> {
    object.get(key).ok_or(JsonError::MissingKey(key))
}

fn type_name(value: &Value) -> Result<WireType> {
    let name = value.as_str().ok_or_else(|| shape("a type name", value))?;
    Ok(name.parse()?)
}

fn array<'v>(value: &'v Value) -> Result<&'v Vec<Value>> {
    value.as_array().ok_or_else(|| shape("an array", value))
}

fn struct_from_json(value: &Value) -> Result<Struct> {
    let mut fields = vec![];
    for entry in array(value)? {
        let entry = object(entry, "a field object")?;
        let id = integer(WireType::I16, key(entry, "id")?)?;
        let ty = type_name(key(entry, "type")?)?;
        let value = from_json(ty, key(entry, "value")?)?;
        fields.push(Field { id, value });
    }
    Ok(Struct { fields })
}

fn map_from_json(value: &Value) -> Result<Map> {
    let map = object(value, "a map object")?;
    let key_type = type_name(key(map, "ktype")?)?;
    let value_type = type_name(key(map, "vtype")?)?;

    let mut items = vec![];
    for item in array(key(map, "items")?)? {
        let item = object(item, "a map item object")?;
        items.push(MapItem {
            key:   from_json(key_type, key(item, "key")?)?,
            value: from_json(value_type, key(item, "value")?)?,
        });
    }
    Ok(Map { key_type, value_type, items })
}

fn list_from_json(value: &Value) -> Result<ValueList> {
    let list = object(value, "a list object")?;
    let value_type = type_name(key(list, "type")?)?;
    let values = array(key(list, "values")?)?
        .iter()
        .map(|element| from_json(value_type, element))
        .collect::<Result<Vec<_>>>()?;
    Ok(ValueList { value_type, values })
}
