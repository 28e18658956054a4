//! # Calldata Codec
//!
//! Binary value encoding used by the verification contract for both call
//! arguments and return values.
//!
//! ## Wire Format
//!
//! Every value starts with an unsigned LEB128 header `(payload << 3) | type`:
//!
//! | type | meaning  | payload                                   |
//! |------|----------|-------------------------------------------|
//! | 0    | special  | null 0, false 1, true 2, address 3 (+20 bytes) |
//! | 1    | +int     | the value                                 |
//! | 2    | -int     | `-value - 1`                              |
//! | 3    | bytes    | length, then raw bytes                    |
//! | 4    | string   | length, then UTF-8 bytes                  |
//! | 5    | array    | element count, then elements              |
//! | 6    | map      | entry count, then `uleb(len) key value`   |
//!
//! Map keys are written in code-point order. A decode must consume the whole
//! buffer.

use super::errors::CalldataError;
use std::collections::BTreeMap;

const BITS_IN_TYPE: u32 = 3;
const TYPE_MASK: u128 = 0b111;

const TYPE_SPECIAL: u128 = 0;
const TYPE_PINT: u128 = 1;
const TYPE_NINT: u128 = 2;
const TYPE_BYTES: u128 = 3;
const TYPE_STR: u128 = 4;
const TYPE_ARR: u128 = 5;
const TYPE_MAP: u128 = 6;

// Special values are identified by their payload
const SPECIAL_NULL: u128 = 0;
const SPECIAL_FALSE: u128 = 1;
const SPECIAL_TRUE: u128 = 2;
const SPECIAL_ADDR: u128 = 3;

/// Address width in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Maximum array/map nesting accepted by the decoder.
pub const MAX_DEPTH: usize = 64;

/// A decoded calldata value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalldataValue {
    Null,
    Bool(bool),
    Int(i128),
    Bytes(Vec<u8>),
    Str(String),
    Address([u8; ADDRESS_LEN]),
    Array(Vec<CalldataValue>),
    Map(BTreeMap<String, CalldataValue>),
}

impl CalldataValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CalldataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CalldataValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, CalldataValue>> {
        match self {
            CalldataValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for CalldataValue {
    fn from(s: &str) -> Self {
        CalldataValue::Str(s.to_string())
    }
}

impl From<String> for CalldataValue {
    fn from(s: String) -> Self {
        CalldataValue::Str(s)
    }
}

impl From<bool> for CalldataValue {
    fn from(b: bool) -> Self {
        CalldataValue::Bool(b)
    }
}

impl From<i128> for CalldataValue {
    fn from(n: i128) -> Self {
        CalldataValue::Int(n)
    }
}

/// Build the calldata object for a method invocation: `{args, method}`.
///
/// `args` is omitted when empty.
pub fn method_call<I, V>(method: &str, args: I) -> CalldataValue
where
    I: IntoIterator<Item = V>,
    V: Into<CalldataValue>,
{
    let args: Vec<CalldataValue> = args.into_iter().map(Into::into).collect();
    let mut object = BTreeMap::new();
    if !args.is_empty() {
        object.insert("args".to_string(), CalldataValue::Array(args));
    }
    object.insert("method".to_string(), CalldataValue::from(method));
    CalldataValue::Map(object)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encode a value.
pub fn encode(value: &CalldataValue) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(&mut out, value);
    out
}

fn write_uleb(out: &mut Vec<u8>, mut value: u128) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Writes `uleb((payload << 3) | ty)` without widening past 128 bits: the
/// first byte holds the type and the low four payload bits.
fn write_header(out: &mut Vec<u8>, payload: u128, ty: u128) {
    let first = (((payload & 0x0f) << BITS_IN_TYPE) | ty) as u8;
    let rest = payload >> 4;
    if rest == 0 {
        out.push(first);
    } else {
        out.push(first | 0x80);
        write_uleb(out, rest);
    }
}

fn encode_into(out: &mut Vec<u8>, value: &CalldataValue) {
    match value {
        CalldataValue::Null => write_header(out, SPECIAL_NULL, TYPE_SPECIAL),
        CalldataValue::Bool(false) => write_header(out, SPECIAL_FALSE, TYPE_SPECIAL),
        CalldataValue::Bool(true) => write_header(out, SPECIAL_TRUE, TYPE_SPECIAL),
        CalldataValue::Int(n) if *n >= 0 => write_header(out, *n as u128, TYPE_PINT),
        // -n - 1 never overflows for negative n
        CalldataValue::Int(n) => write_header(out, (-(n + 1)) as u128, TYPE_NINT),
        CalldataValue::Bytes(bytes) => {
            write_header(out, bytes.len() as u128, TYPE_BYTES);
            out.extend_from_slice(bytes);
        }
        CalldataValue::Str(s) => {
            write_header(out, s.len() as u128, TYPE_STR);
            out.extend_from_slice(s.as_bytes());
        }
        CalldataValue::Address(addr) => {
            write_header(out, SPECIAL_ADDR, TYPE_SPECIAL);
            out.extend_from_slice(addr);
        }
        CalldataValue::Array(items) => {
            write_header(out, items.len() as u128, TYPE_ARR);
            for item in items {
                encode_into(out, item);
            }
        }
        CalldataValue::Map(entries) => {
            // BTreeMap<String, _> iterates in byte order, which is code-point order for UTF-8
            write_header(out, entries.len() as u128, TYPE_MAP);
            for (key, item) in entries {
                write_uleb(out, key.len() as u128);
                out.extend_from_slice(key.as_bytes());
                encode_into(out, item);
            }
        }
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Decode a complete buffer into one value.
pub fn decode(input: &[u8]) -> Result<CalldataValue, CalldataError> {
    let mut reader = Reader { input, pos: 0 };
    let value = reader.value(0)?;
    let remaining = input.len() - reader.pos;
    if remaining != 0 {
        return Err(CalldataError::TrailingBytes { remaining });
    }
    Ok(value)
}

struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn uleb(&mut self) -> Result<u128, CalldataError> {
        let start = self.pos;
        let mut result: u128 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = *self
                .input
                .get(self.pos)
                .ok_or(CalldataError::UnexpectedEof { offset: self.pos })?;
            self.pos += 1;

            let chunk = u128::from(byte & 0x7f);
            if shift >= 128 || (shift > 0 && chunk >> (128 - shift) != 0) {
                return Err(CalldataError::IntegerOverflow { offset: start });
            }
            result |= chunk << shift;

            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
    }

    /// Reads a value header as `(payload, type)`.
    fn header(&mut self) -> Result<(u128, u128), CalldataError> {
        let offset = self.pos;
        let first = *self
            .input
            .get(self.pos)
            .ok_or(CalldataError::UnexpectedEof { offset })?;
        self.pos += 1;

        let ty = u128::from(first) & TYPE_MASK;
        let low = (u128::from(first) >> BITS_IN_TYPE) & 0x0f;
        if first & 0x80 == 0 {
            return Ok((low, ty));
        }

        let rest = self.uleb()?;
        if rest >> 124 != 0 {
            return Err(CalldataError::IntegerOverflow { offset });
        }
        Ok(((rest << 4) | low, ty))
    }

    fn length(&mut self, len: u128) -> Result<usize, CalldataError> {
        let available = self.input.len() - self.pos;
        match usize::try_from(len) {
            Ok(len) if len <= available => Ok(len),
            _ => Err(CalldataError::UnexpectedEof {
                offset: self.input.len(),
            }),
        }
    }

    fn take(&mut self, len: u128) -> Result<&'a [u8], CalldataError> {
        let len = self.length(len)?;
        let bytes = &self.input[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn string(&mut self, len: u128) -> Result<String, CalldataError> {
        let offset = self.pos;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| CalldataError::InvalidUtf8 { offset })
    }

    /// Element counts are bounded by the remaining input, one byte minimum
    /// per element, so a hostile header cannot force a huge allocation.
    fn count(&mut self, count: u128) -> Result<usize, CalldataError> {
        self.length(count)
    }

    fn value(&mut self, depth: usize) -> Result<CalldataValue, CalldataError> {
        let offset = self.pos;
        let (payload, ty) = self.header()?;

        match ty {
            TYPE_SPECIAL => match payload {
                SPECIAL_NULL => Ok(CalldataValue::Null),
                SPECIAL_FALSE => Ok(CalldataValue::Bool(false)),
                SPECIAL_TRUE => Ok(CalldataValue::Bool(true)),
                SPECIAL_ADDR => {
                    let bytes = self.take(ADDRESS_LEN as u128)?;
                    let mut addr = [0u8; ADDRESS_LEN];
                    addr.copy_from_slice(bytes);
                    Ok(CalldataValue::Address(addr))
                }
                payload => Err(CalldataError::UnknownSpecial { payload, offset }),
            },
            TYPE_PINT => i128::try_from(payload)
                .map(CalldataValue::Int)
                .map_err(|_| CalldataError::IntegerOverflow { offset }),
            TYPE_NINT => i128::try_from(payload)
                .map(|n| CalldataValue::Int(-n - 1))
                .map_err(|_| CalldataError::IntegerOverflow { offset }),
            TYPE_BYTES => Ok(CalldataValue::Bytes(self.take(payload)?.to_vec())),
            TYPE_STR => Ok(CalldataValue::Str(self.string(payload)?)),
            TYPE_ARR => {
                if depth >= MAX_DEPTH {
                    return Err(CalldataError::NestingTooDeep { max: MAX_DEPTH });
                }
                let count = self.count(payload)?;
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.value(depth + 1)?);
                }
                Ok(CalldataValue::Array(items))
            }
            TYPE_MAP => {
                if depth >= MAX_DEPTH {
                    return Err(CalldataError::NestingTooDeep { max: MAX_DEPTH });
                }
                let count = self.count(payload)?;
                let mut entries = BTreeMap::new();
                for _ in 0..count {
                    let key_len = self.uleb()?;
                    let key = self.string(key_len)?;
                    let item = self.value(depth + 1)?;
                    if entries.contains_key(&key) {
                        return Err(CalldataError::DuplicateKey(key));
                    }
                    entries.insert(key, item);
                }
                Ok(CalldataValue::Map(entries))
            }
            _ => Err(CalldataError::UnknownType { ty: ty as u8, offset }),
        }
    }
}
