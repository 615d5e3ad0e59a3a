use std::fmt;

use crate::wire_type::WireType;


/// A value of any of the eleven wire kinds.
///
/// Container element kinds are carried as tags; the codec trusts that every
/// element's variant matches the declared tag when encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Bool    (bool),
    I8      (i8),
    Double  (f64),
    I16     (i16),
    I32     (i32),
    I64     (i64),
    Binary  (Vec<u8>),
    Struct  (Struct),
    Map     (Map),
    Set     (ValueList),
    List    (ValueList),
}

impl WireValue {
    pub fn wire_type(&self) -> WireType {
        match self {
            WireValue::Bool   (_) => WireType::Bool,
            WireValue::I8     (_) => WireType::I8,
            WireValue::Double (_) => WireType::Double,
            WireValue::I16    (_) => WireType::I16,
            WireValue::I32    (_) => WireType::I32,
            WireValue::I64    (_) => WireType::I64,
            WireValue::Binary (_) => WireType::Binary,
            WireValue::Struct (_) => WireType::Struct,
            WireValue::Map    (_) => WireType::Map,
            WireValue::Set    (_) => WireType::Set,
            WireValue::List   (_) => WireType::List,
        }
    }

    pub fn binary<B: Into<Vec<u8>>>(bytes: B) -> WireValue {
        WireValue::Binary(bytes.into())
    }

    pub fn list<I: IntoIterator<Item = WireValue>>(value_type: WireType, values: I) -> WireValue {
        WireValue::List(ValueList::new(value_type, values))
    }

    pub fn set<I: IntoIterator<Item = WireValue>>(value_type: WireType, values: I) -> WireValue {
        WireValue::Set(ValueList::new(value_type, values))
    }
}


/// A struct field. Fields keep the order they were added in.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub id: i16,
    pub value: WireValue,
}

impl Field {
    pub fn new(id: i16, value: WireValue) -> Field {
        Field { id, value }
    }
}


#[derive(Debug, Clone, Default, PartialEq)]
pub struct Struct {
    pub fields: Vec<Field>,
}

impl Struct {
    pub fn new<I: IntoIterator<Item = Field>>(fields: I) -> Struct {
        Struct { fields: fields.into_iter().collect() }
    }

    /// First field with the given id. Duplicate ids are kept by the codec.
    pub fn get(&self, id: i16) -> Option<&WireValue> {
        self.fields.iter().find(|field| field.id == id).map(|field| &field.value)
    }
}

impl From<Struct> for WireValue {
    fn from(value: Struct) -> WireValue {
        WireValue::Struct(value)
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct MapItem {
    pub key: WireValue,
    pub value: WireValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub key_type: WireType,
    pub value_type: WireType,
    pub items: Vec<MapItem>,
}

impl Map {
    pub fn new<I>(key_type: WireType, value_type: WireType, items: I) -> Map
        where I: IntoIterator<Item = (WireValue, WireValue)>
    {
        Map {
            key_type,
            value_type,
            items: items.into_iter().map(|(key, value)| MapItem { key, value }).collect(),
        }
    }
}

impl From<Map> for WireValue {
    fn from(value: Map) -> WireValue {
        WireValue::Map(value)
    }
}


/// Element sequence shared by sets and lists; the two have the same layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueList {
    pub value_type: WireType,
    pub values: Vec<WireValue>,
}

impl ValueList {
    pub fn new<I: IntoIterator<Item = WireValue>>(value_type: WireType, values: I) -> ValueList {
        ValueList { value_type, values: values.into_iter().collect() }
    }
}


macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for WireValue {
                fn from(value: $ty) -> WireValue {
                    WireValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool    => Bool,
    i8      => I8,
    f64     => Double,
    i16     => I16,
    i32     => I32,
    i64     => I64,
    Vec<u8> => Binary,
}

impl From<&[u8]> for WireValue {
    fn from(value: &[u8]) -> WireValue {
        WireValue::Binary(value.to_vec())
    }
}

impl From<&str> for WireValue {
    fn from(value: &str) -> WireValue {
        WireValue::Binary(value.as_bytes().to_vec())
    }
}



impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireValue::Bool   (v) => write!(f, "{}", v),
            WireValue::I8     (v) => write!(f, "{}i8", v),
            WireValue::Double (v) => write!(f, "{:?}", v),
            WireValue::I16    (v) => write!(f, "{}i16", v),
            WireValue::I32    (v) => write!(f, "{}i32", v),
            WireValue::I64    (v) => write!(f, "{}i64", v),
            WireValue::Binary (v) => write!(f, "b\"{}\"", v.escape_ascii()),
            WireValue::Struct (v) => write!(f, "{}", v),
            WireValue::Map    (v) => write!(f, "{}", v),
            WireValue::Set    (v) => write!(f, "set<{}>{}", v.value_type, Elements(&v.values)),
            WireValue::List   (v) => write!(f, "list<{}>{}", v.value_type, Elements(&v.values)),
        }
    }
}

impl fmt::Display for Struct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 { f.write_str(", ")?; }
            write!(f, "{}: {}", field.id, field.value)?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "map<{}, {}>{{", self.key_type, self.value_type)?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 { f.write_str(", ")?; }
            write!(f, "{}: {}", item.key, item.value)?;
        }
        f.write_str("}")
    }
}

struct Elements<'a>(&'a [WireValue]);

impl fmt::Display for Elements<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 { f.write_str(", ")?; }
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}
