//! Thrift Binary Protocol codec over a schema-less wire value tree.
//!
//! ```
//! use thriftwire::{WireType, WireValue, Struct, Field};
//!
//! let value = WireValue::from(Struct::new([Field::new(1, WireValue::Bool(true))]));
//! let bytes = thriftwire::to_bytes(&value).unwrap();
//! assert_eq!(bytes, [0x02, 0x00, 0x01, 0x01, 0x00]);
//! assert_eq!(thriftwire::from_bytes(WireType::Struct, &bytes).unwrap(), value);
//! ```

pub mod wire_type;
pub mod value;
pub mod error;
pub mod reader;
pub mod stream;
pub mod encoder;
pub mod decoder;
pub mod json;


pub use wire_type::*;
pub use value::*;
pub use error::{Error, Result};
pub use stream::{ByteSink, ByteSource, IoSource};
pub use encoder::{encoded_len, CANONICAL_NAN};

use tracing::debug;

use reader::Reader;
use encoder::Encoder;
use decoder::Decoder;


pub const DEFAULT_MAX_DEPTH: usize = 64;


/// A wire encoding for `WireValue` trees.
///
/// The outermost type is never on the wire, so `decode` and `skip` are told
/// what to expect.
pub trait Protocol {
    fn encode<W: ByteSink>(&self, value: &WireValue, sink: W) -> Result<()>;

    fn decode<R: ByteSource>(&self, ty: WireType, source: R) -> Result<WireValue>;

    fn skip<R: ByteSource>(&self, ty: WireType, source: R) -> Result<()>;
}


/// The Binary Protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binary {
    max_depth: usize,
}

impl Binary {
    /// `max_depth` bounds how many containers may nest while decoding.
    pub fn with_max_depth(max_depth: usize) -> Binary {
        Binary { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn to_bytes(&self, value: &WireValue) -> Result<Vec<u8>> {
        let mut buffer: Vec<u8> = Vec::with_capacity(encoded_len(value));
        self.encode(value, &mut buffer)?;
        Ok(buffer)
    }

    /// Decodes a value that must span all of `bytes`.
    pub fn from_bytes(&self, ty: WireType, bytes: &[u8]) -> Result<WireValue> {
        let mut reader = Reader::new(bytes);
        let value = self.decode(ty, &mut reader)?;
        if reader.has_some() {
            return Err(Error::TrailingData { remaining: reader.remaining() });
        }
        Ok(value)
    }
}

impl Default for Binary {
    fn default() -> Binary {
        Binary::with_max_depth(DEFAULT_MAX_DEPTH)
    }
}

impl Protocol for Binary {
    fn encode<W: ByteSink>(&self, value: &WireValue, sink: W) -> Result<()> {
        Encoder::new(sink).write_value(value)
    }

    fn decode<R: ByteSource>(&self, ty: WireType, source: R) -> Result<WireValue> {
        let mut decoder = Decoder::new(source, self.max_depth);
        decoder.read_value(ty).map_err(|e| {
            debug!(%ty, error = %e, "decode failed");
            e
        })
    }

    fn skip<R: ByteSource>(&self, ty: WireType, source: R) -> Result<()> {
        let mut decoder = Decoder::new(source, self.max_depth);
        decoder.skip(ty)
    }
}


pub fn encode<W: ByteSink>(value: &WireValue, sink: W) -> Result<()> {
    Binary::default().encode(value, sink)
}

pub fn decode<R: ByteSource>(ty: WireType, source: R) -> Result<WireValue> {
    Binary::default().decode(ty, source)
}

pub fn skip<R: ByteSource>(ty: WireType, source: R) -> Result<()> {
    Binary::default().skip(ty, source)
}

pub fn to_bytes(value: &WireValue) -> Result<Vec<u8>> {
    Binary::default().to_bytes(value)
}

pub fn from_bytes(ty: WireType, bytes: &[u8]) -> Result<WireValue> {
    Binary::default().from_bytes(ty, bytes)
}
