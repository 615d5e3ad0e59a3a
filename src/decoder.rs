use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::stream::ByteSource;
use crate::value::{Field, Map, MapItem, Struct, ValueList, WireValue};
use crate::wire_type::{WireType, STOP};


/// Upper bound on what a count read off the wire may reserve up front.
/// Containers larger than this grow as their elements actually arrive.
const PREALLOC_LIMIT: usize = 1024;


/// Reads Binary Protocol values from a source.
///
/// Every struct, map, set and list entered counts one level against
/// `max_depth`; scalars never do.
pub struct Decoder<R> {
    source: R,
    max_depth: usize,
    depth: usize,
}

impl<R: ByteSource> Decoder<R> {
    pub fn new(source: R, max_depth: usize) -> Decoder<R> {
        Decoder { source, max_depth, depth: 0 }
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    pub fn depth(&self) -> usize {
        self.depth
    }


    pub fn read_bool(&mut self) -> Result<bool> {
        let [byte] = self.source.read_array::<1>()?;
        Ok(byte != 0)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.source.read_array::<1>().map(i8::from_be_bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.source.read_array::<2>().map(i16::from_be_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.source.read_array::<4>().map(i32::from_be_bytes)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.source.read_array::<8>().map(i64::from_be_bytes)
    }

    pub fn read_double(&mut self) -> Result<f64> {
        self.source.read_array::<8>().map(f64::from_be_bytes)
    }

    pub fn read_size(&mut self) -> Result<usize> {
        let size = self.source.read_array::<4>().map(u32::from_be_bytes)?;
        Ok(size as usize)
    }

    pub fn read_binary(&mut self) -> Result<Vec<u8>> {
        let len = self.read_size()?;
        self.source.read_vec(len)
    }

    pub fn read_type(&mut self) -> Result<WireType> {
        let [tag] = self.source.read_array::<1>()?;
        WireType::from_u8(tag).map_err(|e| {
            debug!(tag, "unknown wire type tag");
            e
        })
    }


    /// Reads the next field header, or `None` at the stop byte.
    pub fn read_field_header(&mut self) -> Result<Option<(WireType, i16)>> {
        let [tag] = self.source.read_array::<1>()?;
        if tag == STOP {
            return Ok(None);
        }
        let ty = WireType::from_u8(tag).map_err(|e| {
            debug!(tag, "unknown field type tag");
            e
        })?;
        let id = self.read_i16()?;
        Ok(Some((ty, id)))
    }

    pub fn read_list_header(&mut self) -> Result<(WireType, usize)> {
        let value_type = self.read_type()?;
        let count = self.read_size()?;
        Ok((value_type, count))
    }

    pub fn read_map_header(&mut self) -> Result<(WireType, WireType, usize)> {
        let key_type = self.read_type()?;
        let value_type = self.read_type()?;
        let count = self.read_size()?;
        Ok((key_type, value_type, count))
    }


    fn enter(&mut self, ty: WireType) -> Result<()> {
        if self.depth >= self.max_depth {
            debug!(limit = self.max_depth, %ty, "nesting depth exceeded");
            return Err(Error::DepthExceeded { limit: self.max_depth });
        }
        self.depth += 1;
        trace!(depth = self.depth, %ty, "enter");
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn nested<T, F>(&mut self, ty: WireType, f: F) -> Result<T>
        where F: FnOnce(&mut Self) -> Result<T>
    {
        self.enter(ty)?;
        let result = f(self);
        self.leave();
        result
    }


    pub fn read_value(&mut self, ty: WireType) -> Result<WireValue> {
        Ok(match ty {
            WireType::Bool   => WireValue::Bool(self.read_bool()?),
            WireType::I8     => WireValue::I8(self.read_i8()?),
            WireType::Double => WireValue::Double(self.read_double()?),
            WireType::I16    => WireValue::I16(self.read_i16()?),
            WireType::I32    => WireValue::I32(self.read_i32()?),
            WireType::I64    => WireValue::I64(self.read_i64()?),
            WireType::Binary => WireValue::Binary(self.read_binary()?),
            WireType::Struct => WireValue::Struct(self.read_struct()?),
            WireType::Map    => WireValue::Map(self.read_map()?),
            WireType::Set    => WireValue::Set(self.read_list(WireType::Set)?),
            WireType::List   => WireValue::List(self.read_list(WireType::List)?),
        })
    }

    pub fn read_struct(&mut self) -> Result<Struct> {
        self.nested(WireType::Struct, |this| {
            let mut fields = vec![];
            while let Some((ty, id)) = this.read_field_header()? {
                let value = this.read_value(ty)?;
                fields.push(Field { id, value });
            }
            Ok(Struct { fields })
        })
    }

    pub fn read_map(&mut self) -> Result<Map> {
        self.nested(WireType::Map, |this| {
            let (key_type, value_type, count) = this.read_map_header()?;
            let mut items = Vec::with_capacity(count.min(PREALLOC_LIMIT));
            for _ in 0..count {
                let key = this.read_value(key_type)?;
                let value = this.read_value(value_type)?;
                items.push(MapItem { key, value });
            }
            Ok(Map { key_type, value_type, items })
        })
    }

    /// `ty` is `Set` or `List`; only used for depth accounting and logs.
    pub fn read_list(&mut self, ty: WireType) -> Result<ValueList> {
        self.nested(ty, |this| {
            let (value_type, count) = this.read_list_header()?;
            let mut values = Vec::with_capacity(count.min(PREALLOC_LIMIT));
            for _ in 0..count {
                values.push(this.read_value(value_type)?);
            }
            Ok(ValueList { value_type, values })
        })
    }


    /// Consumes one value of type `ty` without building it.
    pub fn skip(&mut self, ty: WireType) -> Result<()> {
        match ty {
            WireType::Bool | WireType::I8     => self.source.skip(1),
            WireType::I16                     => self.source.skip(2),
            WireType::I32                     => self.source.skip(4),
            WireType::I64 | WireType::Double  => self.source.skip(8),
            WireType::Binary => {
                let len = self.read_size()?;
                self.source.skip(len)
            },
            WireType::Struct => self.nested(ty, |this| {
                while let Some((field_type, _id)) = this.read_field_header()? {
                    this.skip(field_type)?;
                }
                Ok(())
            }),
            WireType::Map => self.nested(ty, |this| {
                let (key_type, value_type, count) = this.read_map_header()?;
                for _ in 0..count {
                    this.skip(key_type)?;
                    this.skip(value_type)?;
                }
                Ok(())
            }),
            WireType::Set | WireType::List => self.nested(ty, |this| {
                let (value_type, count) = this.read_list_header()?;
                for _ in 0..count {
                    this.skip(value_type)?;
                }
                Ok(())
            }),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;

    fn decoder(bytes: &[u8]) -> Decoder<Reader<'_, u8>> {
        Decoder::new(Reader::new(bytes), 64)
    }

    #[test]
    fn any_nonzero_byte_is_true() {
        for byte in [0x01u8, 0x02, 0x7F, 0xFF] {
            assert_eq!(decoder(&[byte]).read_bool().unwrap(), true);
        }
        assert_eq!(decoder(&[0x00]).read_bool().unwrap(), false);
    }

    #[test]
    fn stop_byte_ends_struct() {
        let mut d = decoder(&[0x00, 0xAA]);
        assert_eq!(d.read_struct().unwrap(), Struct::default());
        assert_eq!(d.depth(), 0);
        assert_eq!(d.into_inner().rest(), &[0xAA]);
    }

    #[test]
    fn unknown_field_tag() {
        match decoder(&[0x05, 0x00, 0x01, 0x00]).read_struct() {
            Err(Error::UnknownType(0x05)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_element_tag() {
        match decoder(&[0x01, 0x00, 0x00, 0x00, 0x00]).read_list(WireType::List) {
            Err(Error::UnknownType(0x01)) => (),
            other => panic!("unexpected {:?}", other),
        }
        match decoder(&[0x0B, 0x10, 0x00, 0x00, 0x00, 0x00]).read_map() {
            Err(Error::UnknownType(0x10)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn huge_count_does_not_preallocate() {
        // claims u32::MAX elements but carries two
        let bytes = [0x03u8, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x02];
        match decoder(&bytes).read_list(WireType::List) {
            Err(Error::Truncated { needed: 1, available: 0 }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn depth_limit_counts_containers_only() {
        // list<list<i32>> holding one empty inner list
        let bytes = [0x0Fu8, 0x00, 0x00, 0x00, 0x01, 0x08, 0x00, 0x00, 0x00, 0x00];

        let mut d = Decoder::new(Reader::new(&bytes[..]), 2);
        assert!(d.read_value(WireType::List).is_ok());

        let mut d = Decoder::new(Reader::new(&bytes[..]), 1);
        match d.read_value(WireType::List) {
            Err(Error::DepthExceeded { limit: 1 }) => (),
            other => panic!("unexpected {:?}", other),
        }

        let mut d = Decoder::new(Reader::new(&[0x00u8, 0x2A][..]), 0);
        assert_eq!(d.read_value(WireType::I16).unwrap(), WireValue::I16(42));
        assert!(matches!(d.read_value(WireType::Struct), Err(Error::DepthExceeded { limit: 0 })));
    }

    #[test]
    fn skip_consumes_exactly_one_value() {
        let bytes = [
            0x0Bu8, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, b'h', b'i',
            0x0D, 0x00, 0x02, 0x03, 0x0E, 0x00, 0x00, 0x00, 0x01, 0x07, 0x02, 0x00, 0x00, 0x00, 0x01, 0x01,
            0x00,
            0xEE,
        ];
        let mut d = decoder(&bytes);
        d.skip(WireType::Struct).unwrap();
        assert_eq!(d.into_inner().rest(), &[0xEE]);
    }
}
