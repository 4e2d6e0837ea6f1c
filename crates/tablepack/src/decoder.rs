//! `Decoder`: MessagePack bytes to a [`Value`] tree.
//!
//! Every integer and float width collapses into [`Value::Number`]; integers
//! beyond 2^53 in magnitude lose precision. `str` and `bin` both become
//! [`Value::String`]. Maps become tables tagged [`ContainerKind::Map`] so an
//! empty map survives a round trip. The only extension understood is the
//! timestamp, which decodes to its RFC 3339 string.

use tablepack_buffers::Reader;
use tracing::{debug, trace};

use crate::constants::*;
use crate::error::DecodeError;
use crate::options::DecoderOptions;
use crate::timestamp::Timestamp;
use crate::value::{ContainerKind, Key, Table, Value};

#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecoderOptions,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decodes the first complete item in `input`. Trailing bytes are left
    /// unread.
    pub fn decode(&self, input: &[u8]) -> Result<Value, DecodeError> {
        let mut reader = Reader::new(input);
        let result = self.read_any(&mut reader, 0);
        match &result {
            Ok(value) => trace!(
                consumed = reader.x,
                len = input.len(),
                ty = %value.type_of(),
                "decoded value"
            ),
            Err(err) => debug!(error = %err, offset = reader.x, "decode failed"),
        }
        result
    }

    pub fn read_any(&self, reader: &mut Reader<'_>, depth: usize) -> Result<Value, DecodeError> {
        let offset = reader.x;
        let byte = reader.u8()?;
        match byte {
            0x00..=0x7f => Ok(Value::Number(byte as f64)),
            0xe0..=0xff => Ok(Value::Number(byte as i8 as f64)),
            0x80..=0x8f => self.read_map(reader, (byte & 0x0f) as usize, depth),
            0x90..=0x9f => self.read_arr(reader, (byte & 0x0f) as usize, depth),
            0xa0..=0xbf => read_str(reader, (byte & 0x1f) as usize),
            NIL => Ok(Value::Nil),
            FALSE => Ok(Value::Bool(false)),
            TRUE => Ok(Value::Bool(true)),
            BIN8 | STR8 => {
                let n = reader.u8()? as usize;
                read_str(reader, n)
            }
            BIN16 | STR16 => {
                let n = reader.u16()? as usize;
                read_str(reader, n)
            }
            BIN32 | STR32 => {
                let n = reader.u32()? as usize;
                read_str(reader, n)
            }
            EXT8 => {
                let n = reader.u8()? as usize;
                read_ext(reader, n)
            }
            EXT16 => {
                let n = reader.u16()? as usize;
                read_ext(reader, n)
            }
            EXT32 => {
                let n = reader.u32()? as usize;
                read_ext(reader, n)
            }
            FIXEXT1 => read_ext(reader, 1),
            FIXEXT2 => read_ext(reader, 2),
            FIXEXT4 => read_ext(reader, 4),
            FIXEXT8 => read_ext(reader, 8),
            FIXEXT16 => read_ext(reader, 16),
            FLOAT32 => Ok(Value::Number(reader.f32()? as f64)),
            FLOAT64 => Ok(Value::Number(reader.f64()?)),
            UINT8 => Ok(Value::Number(reader.u8()? as f64)),
            UINT16 => Ok(Value::Number(reader.u16()? as f64)),
            UINT32 => Ok(Value::Number(reader.u32()? as f64)),
            UINT64 => Ok(Value::Number(reader.u64()? as f64)),
            INT8 => Ok(Value::Number(reader.i8()? as f64)),
            INT16 => Ok(Value::Number(reader.i16()? as f64)),
            INT32 => Ok(Value::Number(reader.i32()? as f64)),
            INT64 => Ok(Value::Number(reader.i64()? as f64)),
            ARRAY16 => {
                let n = reader.u16()? as usize;
                self.read_arr(reader, n, depth)
            }
            ARRAY32 => {
                let n = reader.u32()? as usize;
                self.read_arr(reader, n, depth)
            }
            MAP16 => {
                let n = reader.u16()? as usize;
                self.read_map(reader, n, depth)
            }
            MAP32 => {
                let n = reader.u32()? as usize;
                self.read_map(reader, n, depth)
            }
            NEVER_USED => Err(DecodeError::InvalidByte { byte, offset }),
        }
    }

    fn enter(&self, depth: usize) -> Result<usize, DecodeError> {
        let depth = depth + 1;
        if depth > self.options.max_depth {
            return Err(DecodeError::DepthLimitExceeded(self.options.max_depth));
        }
        Ok(depth)
    }

    fn read_arr(
        &self,
        reader: &mut Reader<'_>,
        size: usize,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let depth = self.enter(depth)?;
        let table = Table::with_kind(ContainerKind::Array);
        for index in 1..=size {
            let item = self.read_any(reader, depth)?;
            table.set(index, item);
        }
        Ok(Value::Table(table))
    }

    fn read_map(
        &self,
        reader: &mut Reader<'_>,
        size: usize,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let depth = self.enter(depth)?;
        let table = Table::with_kind(ContainerKind::Map);
        for _ in 0..size {
            let key = self.read_key(reader, depth)?;
            let value = self.read_any(reader, depth)?;
            table.set(key, value);
        }
        Ok(Value::Table(table))
    }

    fn read_key(&self, reader: &mut Reader<'_>, depth: usize) -> Result<Key, DecodeError> {
        let wire_type = WireType::of(reader.peek()?);
        match self.read_any(reader, depth)? {
            Value::String(s) => Ok(Key::String(s)),
            Value::Number(n) if !n.is_nan() => Ok(Key::Number(n)),
            Value::Bool(b) => Ok(Key::Bool(b)),
            _ => Err(DecodeError::InvalidMapKey(wire_type)),
        }
    }
}

fn read_str(reader: &mut Reader<'_>, size: usize) -> Result<Value, DecodeError> {
    Ok(Value::String(reader.buf(size)?.to_vec()))
}

fn read_ext(reader: &mut Reader<'_>, size: usize) -> Result<Value, DecodeError> {
    let ext_type = reader.i8()?;
    let data = reader.buf(size)?;
    if ext_type != TIMESTAMP_EXT {
        return Err(DecodeError::UnsupportedExtension(ext_type));
    }
    let rendered = Timestamp::from_ext(data)?.to_rfc3339()?;
    Ok(Value::String(rendered.into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Result<Value, DecodeError> {
        Decoder::new().decode(bytes)
    }

    #[test]
    fn integer_family_collapses_to_number() {
        assert_eq!(decode(&[0x05]), Ok(Value::from(5)));
        assert_eq!(decode(&[0xff]), Ok(Value::from(-1)));
        assert_eq!(decode(&[0xcc, 0xff]), Ok(Value::from(255)));
        assert_eq!(decode(&[0xcd, 0x01, 0x00]), Ok(Value::from(256)));
        assert_eq!(decode(&[0xce, 0, 1, 0, 0]), Ok(Value::from(65536)));
        assert_eq!(
            decode(&[0xcf, 0, 0, 0, 1, 0, 0, 0, 0]),
            Ok(Value::from(4294967296i64))
        );
        assert_eq!(decode(&[0xd0, 0x80]), Ok(Value::from(-128)));
        assert_eq!(decode(&[0xd1, 0xff, 0x7f]), Ok(Value::from(-129)));
        assert_eq!(decode(&[0xd2, 0xff, 0xff, 0xff, 0xff]), Ok(Value::from(-1)));
        assert_eq!(
            decode(&[0xd3, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe]),
            Ok(Value::from(-2))
        );
    }

    #[test]
    fn uint64_beyond_2_53_is_lossy() {
        let bytes = [0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        assert_eq!(decode(&bytes), Ok(Value::Number(u64::MAX as f64)));
    }

    #[test]
    fn floats() {
        let mut f32_bytes = vec![0xca];
        f32_bytes.extend_from_slice(&1.5f32.to_be_bytes());
        assert_eq!(decode(&f32_bytes), Ok(Value::from(1.5)));
        let mut f64_bytes = vec![0xcb];
        f64_bytes.extend_from_slice(&(-2.25f64).to_be_bytes());
        assert_eq!(decode(&f64_bytes), Ok(Value::from(-2.25)));
    }

    #[test]
    fn bin_decodes_to_string() {
        assert_eq!(
            decode(&[0xc4, 0x02, 0x00, 0xff]),
            Ok(Value::String(vec![0x00, 0xff]))
        );
    }

    #[test]
    fn str_need_not_be_utf8() {
        assert_eq!(decode(&[0xa1, 0xff]), Ok(Value::String(vec![0xff])));
    }

    #[test]
    fn arrays_are_tagged_array() {
        let v = decode(&[0x92, 0xc0, 0x01]).unwrap();
        let t = v.as_table().unwrap();
        assert_eq!(t.kind(), Some(ContainerKind::Array));
        assert_eq!(t.get(1), Some(Value::Nil));
        assert_eq!(t.get(2), Some(Value::from(1)));
    }

    #[test]
    fn maps_are_tagged_map() {
        let v = decode(&[0x81, 0xa1, b'a', 0x01]).unwrap();
        let t = v.as_table().unwrap();
        assert_eq!(t.kind(), Some(ContainerKind::Map));
        assert_eq!(t.get("a"), Some(Value::from(1)));
    }

    #[test]
    fn map_with_numeric_and_bool_keys() {
        let v = decode(&[0x82, 0x01, 0xa1, b'x', 0xc3, 0xc2]).unwrap();
        let t = v.as_table().unwrap();
        assert_eq!(t.get(1), Some(Value::from("x")));
        assert_eq!(t.get(true), Some(Value::Bool(false)));
    }

    #[test]
    fn duplicate_map_keys_last_wins() {
        let v = decode(&[0x82, 0xa1, b'a', 0x01, 0xa1, b'a', 0x02]).unwrap();
        let t = v.as_table().unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.get("a"), Some(Value::from(2)));
    }

    #[test]
    fn invalid_map_keys() {
        assert_eq!(
            decode(&[0x81, 0xc0, 0x01]),
            Err(DecodeError::InvalidMapKey(WireType::Nil))
        );
        assert_eq!(
            decode(&[0x81, 0x90, 0x01]),
            Err(DecodeError::InvalidMapKey(WireType::Array))
        );
        let mut nan_key = vec![0x81, 0xcb];
        nan_key.extend_from_slice(&f64::NAN.to_be_bytes());
        nan_key.push(0x01);
        assert_eq!(
            decode(&nan_key),
            Err(DecodeError::InvalidMapKey(WireType::Float))
        );
    }

    #[test]
    fn reserved_byte() {
        assert_eq!(
            decode(&[0x91, 0xc1]),
            Err(DecodeError::InvalidByte {
                byte: 0xc1,
                offset: 1
            })
        );
    }

    #[test]
    fn unsupported_extension() {
        assert_eq!(
            decode(&[0xd4, 0x05, 0x00]),
            Err(DecodeError::UnsupportedExtension(5))
        );
        assert_eq!(
            decode(&[0xc7, 0x01, 0x80, 0x00]),
            Err(DecodeError::UnsupportedExtension(-128))
        );
    }

    #[test]
    fn timestamp_extension() {
        let mut bytes = vec![0xd6, 0xff];
        bytes.extend_from_slice(&1_704_067_200u32.to_be_bytes());
        assert_eq!(decode(&bytes), Ok(Value::from("2024-01-01T00:00:00Z")));
    }

    #[test]
    fn truncated_input() {
        assert_eq!(decode(&[]), Err(DecodeError::UnexpectedEof));
        assert_eq!(decode(&[0xcd, 0x01]), Err(DecodeError::UnexpectedEof));
        assert_eq!(decode(&[0x92, 0x01]), Err(DecodeError::UnexpectedEof));
        assert_eq!(decode(&[0xa5, b'a']), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn huge_length_prefix_fails_cleanly() {
        assert_eq!(
            decode(&[0xdd, 0xff, 0xff, 0xff, 0xff]),
            Err(DecodeError::UnexpectedEof)
        );
        assert_eq!(
            decode(&[0xdb, 0xff, 0xff, 0xff, 0xff, b'a']),
            Err(DecodeError::UnexpectedEof)
        );
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        assert_eq!(decode(&[0xc3, 0xc0, 0xc0]), Ok(Value::Bool(true)));
    }

    #[test]
    fn depth_limit() {
        let decoder = Decoder::with_options(DecoderOptions::default().with_max_depth(2));
        assert!(decoder.decode(&[0x91, 0x90]).is_ok());
        assert_eq!(
            decoder.decode(&[0x91, 0x91, 0x90]),
            Err(DecodeError::DepthLimitExceeded(2))
        );
    }
}
