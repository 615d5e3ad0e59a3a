use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};


#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Bool    = 0x02,
    I8      = 0x03,
    Double  = 0x04,
    I16     = 0x06,
    I32     = 0x08,
    I64     = 0x0A,
    Binary  = 0x0B,
    Struct  = 0x0C,
    Map     = 0x0D,
    Set     = 0x0E,
    List    = 0x0F,
}

/// Closes a struct's field list.
pub const STOP: u8 = 0x00;

pub const WIRE_TYPES: [WireType; 11] = [
    WireType::Bool,
    WireType::I8,
    WireType::Double,
    WireType::I16,
    WireType::I32,
    WireType::I64,
    WireType::Binary,
    WireType::Struct,
    WireType::Map,
    WireType::Set,
    WireType::List,
];


impl WireType {
    pub fn from_u8(tag: u8) -> Result<WireType> {
        use WireType::*;
        Ok(match tag {
            0x02 => Bool,
            0x03 => I8,
            0x04 => Double,
            0x06 => I16,
            0x08 => I32,
            0x0A => I64,
            0x0B => Binary,
            0x0C => Struct,
            0x0D => Map,
            0x0E => Set,
            0x0F => List,
            _    => return Err(Error::UnknownType(tag)),
        })
    }

    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        use WireType::*;
        match self {
            Bool   => "bool",
            I8     => "i8",
            Double => "double",
            I16    => "i16",
            I32    => "i32",
            I64    => "i64",
            Binary => "binary",
            Struct => "struct",
            Map    => "map",
            Set    => "set",
            List   => "list",
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, WireType::Struct | WireType::Map | WireType::Set | WireType::List)
    }
}

impl TryFrom<u8> for WireType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<WireType> {
        WireType::from_u8(tag)
    }
}

impl From<WireType> for u8 {
    fn from(ty: WireType) -> u8 {
        ty as u8
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}


#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown wire type name `{0}`")]
pub struct ParseWireTypeError(pub String);

impl FromStr for WireType {
    type Err = ParseWireTypeError;

    fn from_str(s: &str) -> std::result::Result<WireType, ParseWireTypeError> {
        use WireType::*;
        Ok(match s {
            "bool"            => Bool,
            "i8" | "byte"     => I8,
            "double"          => Double,
            "i16"             => I16,
            "i32"             => I32,
            "i64"             => I64,
            "binary" | "string" => Binary,
            "struct"          => Struct,
            "map"             => Map,
            "set"             => Set,
            "list"            => List,
            _ => return Err(ParseWireTypeError(s.to_owned())),
        })
    }
}
