//! `Encoder`: [`Value`] tree to MessagePack bytes.
//!
//! A single depth-first pass. Tables are classified on entry (see
//! [`crate::classify`]) and tracked in a path set so that a table reached
//! again from inside itself is rejected, while a table shared by two
//! siblings is simply written twice.

use std::collections::HashSet;

use tablepack_buffers::Writer;
use tracing::{debug, trace};

use crate::classify::{classify, Container};
use crate::constants::*;
use crate::error::EncodeError;
use crate::options::EncoderOptions;
use crate::value::{Table, Value};

pub struct Encoder {
    pub writer: Writer,
    /// Identities of the tables on the current path from the root.
    visiting: HashSet<usize>,
    options: EncoderOptions,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_options(EncoderOptions::default())
    }

    pub fn with_options(options: EncoderOptions) -> Self {
        Self {
            writer: Writer::new(),
            visiting: HashSet::new(),
            options,
        }
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encodes `value`. On error nothing written during this call survives.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.writer.reset();
        self.visiting.clear();
        match self.write_any(value, 0) {
            Ok(()) => {
                let bytes = self.writer.flush();
                trace!(len = bytes.len(), "encoded value");
                Ok(bytes)
            }
            Err(err) => {
                self.writer.discard();
                self.visiting.clear();
                debug!(error = %err, ty = %value.type_of(), "encode failed");
                Err(err)
            }
        }
    }

    pub fn write_any(&mut self, value: &Value, depth: usize) -> Result<(), EncodeError> {
        match value {
            Value::Nil => self.write_nil(),
            Value::Bool(b) => self.write_boolean(*b),
            Value::Number(n) => self.write_number(*n),
            Value::String(s) => return self.write_str(s),
            Value::Table(table) => return self.write_table(table, depth),
            Value::Handle(handle) => return Err(EncodeError::InvalidType(handle.value_type())),
        }
        Ok(())
    }

    fn write_table(&mut self, table: &Table, depth: usize) -> Result<(), EncodeError> {
        let id = table.id();
        if !self.visiting.insert(id) {
            return Err(EncodeError::Nested);
        }
        let result = self.write_container(table, depth + 1);
        self.visiting.remove(&id);
        result
    }

    fn write_container(&mut self, table: &Table, depth: usize) -> Result<(), EncodeError> {
        if depth > self.options.max_depth {
            return Err(EncodeError::DepthLimitExceeded(self.options.max_depth));
        }
        match classify(table)? {
            Container::Array(items) => {
                self.write_arr_hdr(items.len())?;
                for item in &items {
                    self.write_any(item, depth)?;
                }
            }
            Container::Object(pairs) => {
                self.write_obj_hdr(pairs.len())?;
                for (key, value) in &pairs {
                    self.write_str(key)?;
                    self.write_any(value, depth)?;
                }
            }
        }
        Ok(())
    }

    pub fn write_nil(&mut self) {
        self.writer.u8(NIL);
    }

    pub fn write_boolean(&mut self, b: bool) {
        self.writer.u8(if b { TRUE } else { FALSE });
    }

    pub fn write_number(&mut self, num: f64) {
        if self.options.compact_integers && is_safe_integer(num) {
            self.write_integer(num as i64);
        } else {
            self.write_float(num);
        }
    }

    pub fn write_float(&mut self, float: f64) {
        self.writer.u8f64(FLOAT64, float);
    }

    /// Writes `int` in the smallest integer form that holds it.
    pub fn write_integer(&mut self, int: i64) {
        let writer = &mut self.writer;
        if int >= 0 {
            if int <= 0x7f {
                writer.u8(int as u8);
            } else if int <= 0xff {
                writer.u8(UINT8);
                writer.u8(int as u8);
            } else if int <= 0xffff {
                writer.u8u16(UINT16, int as u16);
            } else if int <= 0xffff_ffff {
                writer.u8u32(UINT32, int as u32);
            } else {
                writer.u8u64(UINT64, int as u64);
            }
        } else if int >= -0x20 {
            writer.i8(int as i8);
        } else if int >= -0x80 {
            writer.u8(INT8);
            writer.i8(int as i8);
        } else if int >= -0x8000 {
            writer.u8(INT16);
            writer.i16(int as i16);
        } else if int >= i32::MIN as i64 {
            writer.u8(INT32);
            writer.i32(int as i32);
        } else {
            writer.u8(INT64);
            writer.i64(int);
        }
    }

    pub fn write_str_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        if length <= 0x1f {
            self.writer.u8(FIXSTR | length as u8);
        } else if length <= 0xff {
            self.writer.u8(STR8);
            self.writer.u8(length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(STR16, length as u16);
        } else {
            self.writer.u8u32(STR32, wide_length(length)?);
        }
        Ok(())
    }

    pub fn write_str(&mut self, s: &[u8]) -> Result<(), EncodeError> {
        self.write_str_hdr(s.len())?;
        self.writer.buf(s);
        Ok(())
    }

    pub fn write_arr_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        if length <= 0xf {
            self.writer.u8(FIXARRAY | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(ARRAY16, length as u16);
        } else {
            self.writer.u8u32(ARRAY32, wide_length(length)?);
        }
        Ok(())
    }

    pub fn write_obj_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        if length <= 0xf {
            self.writer.u8(FIXMAP | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(MAP16, length as u16);
        } else {
            self.writer.u8u32(MAP32, wide_length(length)?);
        }
        Ok(())
    }
}

/// The 32-bit length field of str32/array32/map32.
fn wide_length(length: usize) -> Result<u32, EncodeError> {
    u32::try_from(length).map_err(|_| EncodeError::LengthOverflow(length))
}

fn is_safe_integer(num: f64) -> bool {
    num.fract() == 0.0
        && num.abs() <= MAX_SAFE_INTEGER
        && !(num == 0.0 && num.is_sign_negative())
}
