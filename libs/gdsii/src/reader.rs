//! The low-level byte reader: record decoding plus a one-record lookahead
//! slot (`spec.md` §3 "GDS reader state", §4.4, §9 "lookahead of exactly
//! one record").

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::record::{decode_real8, DataType, Payload, RecordHeader, RecordKind};

/// Errors raised while decoding the byte stream itself (framing, not
/// semantic element errors, which are collected as diagnostics instead).
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("I/O error reading GDS stream: {0}")]
    Io(#[from] std::io::Error),
    #[error("record length {0} is shorter than the 4-byte header")]
    ShortRecord(u16),
    #[error("ASCII record payload was not valid UTF-8/Latin-1 text")]
    BadString,
}

/// A pull parser over a GDS byte stream with one record of lookahead.
///
/// `spec.md` §4.4: "A lookahead slot holds exactly one unread record
/// header." Element parsing routines repeatedly `peek` to decide whether
/// an optional record (e.g. `WIDTH`, `PATHTYPE`) is present before
/// consuming it.
pub struct GdsReader<R> {
    inner: R,
    lookahead: Option<(RecordHeader, Payload)>,
    /// Running count of bytes consumed, for diagnostics.
    pub bytes_read: u64,
}

impl<R: Read> GdsReader<R> {
    /// Wraps `inner` with an empty lookahead slot.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            lookahead: None,
            bytes_read: 0,
        }
    }

    fn read_header(&mut self) -> Result<Option<RecordHeader>, StreamError> {
        let mut len_buf = [0u8; 2];
        match self.inner.read_exact(&mut len_buf) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        let len = u16::from_be_bytes(len_buf);
        if len < 4 {
            return Err(StreamError::ShortRecord(len));
        }
        let rtype = self.inner.read_u8()?;
        let dtype = self.inner.read_u8()?;
        self.bytes_read += 4;
        Ok(Some(RecordHeader {
            len,
            kind: RecordKind::from_code(rtype),
            dtype: DataType::from_code(dtype),
        }))
    }

    fn read_payload(&mut self, header: &RecordHeader) -> Result<Payload, StreamError> {
        let n = header.payload_len();
        self.bytes_read += n as u64;
        match header.dtype {
            DataType::NoData => Ok(Payload::None),
            DataType::BitArray => {
                let mut buf = [0u8; 2];
                self.inner.read_exact(&mut buf)?;
                Ok(Payload::Bits(buf[0], buf[1]))
            }
            DataType::I2 => {
                let count = n / 2;
                let mut out = Vec::with_capacity(count);
                for _ in 0..count {
                    out.push(self.inner.read_i16::<BigEndian>()?);
                }
                Ok(Payload::I16(out))
            }
            DataType::I4 => {
                let count = n / 4;
                let mut out = Vec::with_capacity(count);
                for _ in 0..count {
                    out.push(self.inner.read_i32::<BigEndian>()?);
                }
                Ok(Payload::I32(out))
            }
            DataType::R8 => {
                let count = n / 8;
                let mut out = Vec::with_capacity(count);
                for _ in 0..count {
                    let bits = self.inner.read_u64::<BigEndian>()?;
                    out.push(decode_real8(bits));
                }
                Ok(Payload::F64(out))
            }
            DataType::R4 => {
                // Four-byte REAL uses the same excess-64 codec as R8, with
                // a 24-bit fraction; GDS streams in the wild essentially
                // never emit it, but we decode it rather than fail.
                let count = n / 4;
                let mut out = Vec::with_capacity(count);
                for _ in 0..count {
                    let bits = self.inner.read_u32::<BigEndian>()? as u64;
                    let widened = bits << 32;
                    out.push(decode_real8(widened));
                }
                Ok(Payload::F64(out))
            }
            DataType::Ascii => {
                let mut buf = vec![0u8; n];
                self.inner.read_exact(&mut buf)?;
                while buf.last() == Some(&0) {
                    buf.pop();
                }
                let s = String::from_utf8(buf).map_err(|_| StreamError::BadString)?;
                Ok(Payload::Str(s.into()))
            }
            DataType::Unknown(_) => {
                let mut buf = vec![0u8; n];
                self.inner.read_exact(&mut buf)?;
                Ok(Payload::None)
            }
        }
    }

    fn read_record(&mut self) -> Result<Option<(RecordHeader, Payload)>, StreamError> {
        let Some(header) = self.read_header()? else {
            return Ok(None);
        };
        let payload = self.read_payload(&header)?;
        Ok(Some((header, payload)))
    }

    /// Returns the next record without consuming it, refilling the
    /// lookahead slot from the underlying stream if it's empty.
    pub fn peek(&mut self) -> Result<Option<&(RecordHeader, Payload)>, StreamError> {
        if self.lookahead.is_none() {
            self.lookahead = self.read_record()?;
        }
        Ok(self.lookahead.as_ref())
    }

    /// Consumes and returns the next record, from the lookahead slot if
    /// full, else reading directly.
    pub fn next(&mut self) -> Result<Option<(RecordHeader, Payload)>, StreamError> {
        if let Some(rec) = self.lookahead.take() {
            return Ok(Some(rec));
        }
        self.read_record()
    }

    /// True if `peek` would return a record whose kind is `kind`.
    pub fn peek_is(&mut self, kind: RecordKind) -> Result<bool, StreamError> {
        Ok(matches!(self.peek()?, Some((h, _)) if std::mem::discriminant(&h.kind) == std::mem::discriminant(&kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn record(rtype: u8, dtype: u8, payload: &[u8]) -> Vec<u8> {
        let len = (4 + payload.len()) as u16;
        let mut out = Vec::new();
        out.extend_from_slice(&len.to_be_bytes());
        out.push(rtype);
        out.push(dtype);
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn reads_endlib_with_no_payload() {
        let bytes = record(0x04, 0x00, &[]);
        let mut r = GdsReader::new(Cursor::new(bytes));
        let (header, payload) = r.next().unwrap().unwrap();
        assert!(matches!(header.kind, RecordKind::EndLib));
        assert!(matches!(payload, Payload::None));
        assert!(r.next().unwrap().is_none());
    }

    #[test]
    fn peek_does_not_consume() {
        let bytes = record(0x0d, 0x02, &1i16.to_be_bytes());
        let mut r = GdsReader::new(Cursor::new(bytes));
        assert!(r.peek().unwrap().is_some());
        assert!(r.peek().unwrap().is_some());
        let (_, payload) = r.next().unwrap().unwrap();
        assert!(matches!(payload, Payload::I16(v) if v == vec![1]));
        assert!(r.next().unwrap().is_none());
    }

    #[test]
    fn decodes_xy_as_i32_pairs() {
        let mut payload = Vec::new();
        for v in [0i32, 0, 100, 0, 100, 200, 0, 200, 0, 0] {
            payload.extend_from_slice(&v.to_be_bytes());
        }
        let bytes = record(0x10, 0x03, &payload);
        let mut r = GdsReader::new(Cursor::new(bytes));
        let (_, payload) = r.next().unwrap().unwrap();
        match payload {
            Payload::I32(v) => assert_eq!(v, vec![0, 0, 100, 0, 100, 200, 0, 200, 0, 0]),
            _ => panic!("expected I32"),
        }
    }
}
