//! Minimal EOSIO ABI binary encoding for content payloads.
//!
//! Only the shapes OBT content needs are supported:
//! - `string`: varuint32 byte length, then UTF-8 bytes
//! - `string?`: presence byte (0 or 1), then the string when present
//!
//! Fields are written in declaration order with no names or tags.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{ObtError, Result};

/// Longest LEB128 encoding of a u32.
const MAX_VARUINT32_LEN: usize = 5;

/// Append-only ABI writer.
#[derive(Clone, Debug, Default)]
pub struct AbiWriter {
    buf: BytesMut,
}

impl AbiWriter {
    pub fn new() -> Self {
        Self { buf: BytesMut::with_capacity(128) }
    }

    /// LEB128, seven bits per byte, low bits first.
    pub fn put_varuint32(&mut self, mut v: u32) -> &mut Self {
        loop {
            let byte = (v & 0x7f) as u8;
            v >>= 7;
            if v == 0 {
                self.buf.put_u8(byte);
                return self;
            }
            self.buf.put_u8(byte | 0x80);
        }
    }

    pub fn put_string(&mut self, s: &str) -> Result<&mut Self> {
        let len = u32::try_from(s.len()).map_err(|_| {
            ObtError::Serialization(format!("string of {} bytes is too long", s.len()))
        })?;
        self.put_varuint32(len);
        self.buf.put_slice(s.as_bytes());
        Ok(self)
    }

    pub fn put_optional_string(&mut self, s: Option<&str>) -> Result<&mut Self> {
        match s {
            Some(s) => {
                self.buf.put_u8(1);
                self.put_string(s)
            }
            None => {
                self.buf.put_u8(0);
                Ok(self)
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

/// Cursor over ABI-encoded bytes. Every read is bounds checked.
#[derive(Clone, Debug)]
pub struct AbiReader<'a> {
    buf: &'a [u8],
}

impl<'a> AbiReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn get_u8(&mut self, what: &str) -> Result<u8> {
        if !self.buf.has_remaining() {
            return Err(ObtError::Serialization(format!("unexpected end of data reading {what}")));
        }
        Ok(self.buf.get_u8())
    }

    pub fn get_varuint32(&mut self) -> Result<u32> {
        let mut value: u64 = 0;
        for i in 0..MAX_VARUINT32_LEN {
            let byte = self.get_u8("varuint32")?;
            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return u32::try_from(value)
                    .map_err(|_| ObtError::Serialization("varuint32 overflows u32".into()));
            }
        }
        Err(ObtError::Serialization("varuint32 longer than 5 bytes".into()))
    }

    pub fn get_string(&mut self, field: &str) -> Result<String> {
        let len = self.get_varuint32()? as usize;
        if self.buf.remaining() < len {
            return Err(ObtError::Serialization(format!(
                "field {field}: length {len} exceeds remaining {} bytes",
                self.buf.remaining()
            )));
        }
        let (head, tail) = self.buf.split_at(len);
        let s = std::str::from_utf8(head)
            .map_err(|e| ObtError::Serialization(format!("field {field}: invalid utf-8: {e}")))?
            .to_owned();
        self.buf = tail;
        Ok(s)
    }

    pub fn get_optional_string(&mut self, field: &str) -> Result<Option<String>> {
        match self.get_u8(field)? {
            0 => Ok(None),
            1 => self.get_string(field).map(Some),
            flag => Err(ObtError::Serialization(format!(
                "field {field}: invalid optional flag {flag}"
            ))),
        }
    }

    /// Succeeds only if every byte was consumed.
    pub fn finish(self) -> Result<()> {
        if self.buf.has_remaining() {
            return Err(ObtError::Serialization(format!(
                "{} trailing bytes after content",
                self.buf.remaining()
            )));
        }
        Ok(())
    }
}
