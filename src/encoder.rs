use crate::error::{Error, Result};
use crate::stream::ByteSink;
use crate::value::{Field, Map, Struct, ValueList, WireValue};
use crate::wire_type::{WireType, STOP};


/// Bit pattern written for every NaN, whatever its sign or payload.
pub const CANONICAL_NAN: u64 = 0x7FF8_0000_0000_0001;

pub fn double_bits(value: f64) -> u64 {
    if value.is_nan() { CANONICAL_NAN } else { value.to_bits() }
}

fn size_prefix(len: usize) -> Result<[u8; 4]> {
    let len = u32::try_from(len).map_err(|_| Error::SizeOverflow { len })?;
    Ok(len.to_be_bytes())
}


/// Writes Binary Protocol bytes straight into a sink, depth first.
pub struct Encoder<W> {
    sink: W,
}

impl<W: ByteSink> Encoder<W> {
    pub fn new(sink: W) -> Encoder<W> {
        Encoder { sink }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }


    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.sink.write_u8(value as u8)
    }

    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.sink.write_bytes(&value.to_be_bytes())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.sink.write_bytes(&value.to_be_bytes())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.sink.write_bytes(&value.to_be_bytes())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.sink.write_bytes(&value.to_be_bytes())
    }

    pub fn write_double(&mut self, value: f64) -> Result<()> {
        self.sink.write_bytes(&double_bits(value).to_be_bytes())
    }

    pub fn write_binary(&mut self, bytes: &[u8]) -> Result<()> {
        self.sink.write_bytes(&size_prefix(bytes.len())?)?;
        if !bytes.is_empty() {
            self.sink.write_bytes(bytes)?;
        }
        Ok(())
    }


    pub fn write_field_header(&mut self, ty: WireType, id: i16) -> Result<()> {
        let id = id.to_be_bytes();
        self.sink.write_bytes(&[ty.tag(), id[0], id[1]])
    }

    pub fn write_stop(&mut self) -> Result<()> {
        self.sink.write_u8(STOP)
    }

    pub fn write_list_header(&mut self, value_type: WireType, count: usize) -> Result<()> {
        let count = size_prefix(count)?;
        self.sink.write_bytes(&[value_type.tag(), count[0], count[1], count[2], count[3]])
    }

    pub fn write_map_header(&mut self, key_type: WireType, value_type: WireType, count: usize) -> Result<()> {
        let count = size_prefix(count)?;
        self.sink.write_bytes(&[key_type.tag(), value_type.tag(), count[0], count[1], count[2], count[3]])
    }


    pub fn write_value(&mut self, value: &WireValue) -> Result<()> {
        match value {
            WireValue::Bool   (v) => self.write_bool(*v),
            WireValue::I8     (v) => self.write_i8(*v),
            WireValue::Double (v) => self.write_double(*v),
            WireValue::I16    (v) => self.write_i16(*v),
            WireValue::I32    (v) => self.write_i32(*v),
            WireValue::I64    (v) => self.write_i64(*v),
            WireValue::Binary (v) => self.write_binary(v),
            WireValue::Struct (v) => self.write_struct(v),
            WireValue::Map    (v) => self.write_map(v),
            WireValue::Set    (v) => self.write_list(v),
            WireValue::List   (v) => self.write_list(v),
        }
    }

    pub fn write_struct(&mut self, value: &Struct) -> Result<()> {
        for Field { id, value } in &value.fields {
            self.write_field_header(value.wire_type(), *id)?;
            self.write_value(value)?;
        }
        self.write_stop()
    }

    pub fn write_map(&mut self, value: &Map) -> Result<()> {
        self.write_map_header(value.key_type, value.value_type, value.items.len())?;
        for item in &value.items {
            self.write_value(&item.key)?;
            self.write_value(&item.value)?;
        }
        Ok(())
    }

    /// Sets and lists share this layout.
    pub fn write_list(&mut self, value: &ValueList) -> Result<()> {
        self.write_list_header(value.value_type, value.values.len())?;
        for element in &value.values {
            self.write_value(element)?;
        }
        Ok(())
    }
}


/// Number of bytes `Encoder::write_value` produces for `value`.
pub fn encoded_len(value: &WireValue) -> usize {
    match value {
        WireValue::Bool (_) | WireValue::I8 (_) => 1,
        WireValue::I16 (_) => 2,
        WireValue::I32 (_) => 4,
        WireValue::I64 (_) | WireValue::Double (_) => 8,
        WireValue::Binary (v) => 4 + v.len(),
        WireValue::Struct (v) => {
            v.fields.iter().map(|field| 3 + encoded_len(&field.value)).sum::<usize>() + 1
        },
        WireValue::Map (v) => {
            6 + v.items.iter().map(|item| encoded_len(&item.key) + encoded_len(&item.value)).sum::<usize>()
        },
        WireValue::Set (v) | WireValue::List (v) => {
            5 + v.values.iter().map(encoded_len).sum::<usize>()
        },
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &WireValue) -> Vec<u8> {
        let mut encoder = Encoder::new(Vec::<u8>::new());
        encoder.write_value(value).unwrap();
        encoder.into_inner()
    }

    #[test]
    fn every_nan_is_canonical() {
        let quiet = f64::NAN;
        let negative = -f64::NAN;
        let payload = f64::from_bits(0x7FF0_0000_DEAD_BEEF);
        let signalling_negative = f64::from_bits(0xFFF0_0000_0000_0001);
        for nan in [quiet, negative, payload, signalling_negative] {
            assert!(nan.is_nan());
            assert_eq!(encode(&nan.into()), [0x7F, 0xF8, 0, 0, 0, 0, 0, 0x01]);
        }
    }

    #[test]
    fn non_nan_doubles_keep_their_bits() {
        assert_eq!(encode(&(-0.0f64).into()), [0x80, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(encode(&f64::INFINITY.into()), [0x7F, 0xF0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(encode(&f64::NEG_INFINITY.into()), [0xFF, 0xF0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn minus_one_is_all_ones() {
        assert_eq!(encode(&(-1i8).into()), [0xFF]);
        assert_eq!(encode(&(-1i16).into()), [0xFF; 2]);
        assert_eq!(encode(&(-1i32).into()), [0xFF; 4]);
        assert_eq!(encode(&(-1i64).into()), [0xFF; 8]);
    }

    #[test]
    fn field_type_comes_from_the_value() {
        let value = WireValue::from(Struct::new([Field::new(-2, WireValue::I64(1))]));
        assert_eq!(encode(&value), [0x0A, 0xFF, 0xFE, 0, 0, 0, 0, 0, 0, 0, 1, 0x00]);
    }

    #[test]
    fn encoded_len_matches_output() {
        let value = WireValue::from(Struct::new([
            Field::new(1, WireValue::from("hello")),
            Field::new(2, Map::new(WireType::I32, WireType::Set, [
                (WireValue::I32(3), WireValue::set(WireType::Double, [WireValue::Double(1.5)])),
            ]).into()),
            Field::new(3, WireValue::list(WireType::Struct, [WireValue::from(Struct::default())])),
        ]));
        assert_eq!(encoded_len(&value), encode(&value).len());
    }

    #[test]
    fn sink_errors_surface() {
        struct Full;
        impl std::io::Write for Full {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::WriteZero, "full"))
            }
            fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
        }

        let mut encoder = Encoder::new(Full);
        match encoder.write_value(&WireValue::I32(5)) {
            Err(Error::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::WriteZero),
            other => panic!("unexpected {:?}", other),
        }
    }
}
