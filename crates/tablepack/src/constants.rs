//! MessagePack wire markers and wire-type classification.

use std::fmt;

pub const NIL: u8 = 0xc0;
/// Reserved, never used by the format.
pub const NEVER_USED: u8 = 0xc1;
pub const FALSE: u8 = 0xc2;
pub const TRUE: u8 = 0xc3;
pub const BIN8: u8 = 0xc4;
pub const BIN16: u8 = 0xc5;
pub const BIN32: u8 = 0xc6;
pub const EXT8: u8 = 0xc7;
pub const EXT16: u8 = 0xc8;
pub const EXT32: u8 = 0xc9;
pub const FLOAT32: u8 = 0xca;
pub const FLOAT64: u8 = 0xcb;
pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;
pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;
pub const FIXEXT1: u8 = 0xd4;
pub const FIXEXT2: u8 = 0xd5;
pub const FIXEXT4: u8 = 0xd6;
pub const FIXEXT8: u8 = 0xd7;
pub const FIXEXT16: u8 = 0xd8;
pub const STR8: u8 = 0xd9;
pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;
pub const ARRAY16: u8 = 0xdc;
pub const ARRAY32: u8 = 0xdd;
pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;

pub const FIXMAP: u8 = 0x80;
pub const FIXARRAY: u8 = 0x90;
pub const FIXSTR: u8 = 0xa0;

/// Extension type reserved for timestamps.
pub const TIMESTAMP_EXT: i8 = -1;

/// 2^53 - 1: every integer up to this magnitude is exact as a double.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Wire type families, used to name the offending item in decode errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Nil,
    Bool,
    Int,
    Float,
    Str,
    Bin,
    Array,
    Map,
    Ext,
    Reserved,
}

impl WireType {
    /// Classifies an item by its leading byte.
    pub fn of(byte: u8) -> Self {
        match byte {
            0x00..=0x7f | 0xe0..=0xff => WireType::Int,
            0x80..=0x8f | MAP16 | MAP32 => WireType::Map,
            0x90..=0x9f | ARRAY16 | ARRAY32 => WireType::Array,
            0xa0..=0xbf | STR8 | STR16 | STR32 => WireType::Str,
            NIL => WireType::Nil,
            NEVER_USED => WireType::Reserved,
            FALSE | TRUE => WireType::Bool,
            BIN8 | BIN16 | BIN32 => WireType::Bin,
            EXT8 | EXT16 | EXT32 | FIXEXT1..=FIXEXT16 => WireType::Ext,
            FLOAT32 | FLOAT64 => WireType::Float,
            UINT8..=INT64 => WireType::Int,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WireType::Nil => "nil",
            WireType::Bool => "bool",
            WireType::Int => "int",
            WireType::Float => "float",
            WireType::Str => "str",
            WireType::Bin => "bin",
            WireType::Array => "array",
            WireType::Map => "map",
            WireType::Ext => "ext",
            WireType::Reserved => "reserved",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
