//! Record framing: the 4-byte header, the eight-byte REAL codec, and the
//! decoded [`Record`] enum (`spec.md` §4.4, §6.1).

use arcstr::ArcStr;

/// GDS record type codes, numbered as the stream spec assigns them
/// (`spec.md` §6.1). Only the codes this reader dispatches on are named;
/// everything else decodes to [`RecordKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Header,
    BgnLib,
    LibName,
    Units,
    EndLib,
    BgnStr,
    StrName,
    EndStr,
    Boundary,
    Path,
    Sref,
    Aref,
    Text,
    Layer,
    DataType,
    Width,
    Xy,
    EndEl,
    SName,
    ColRow,
    TextType,
    Presentation,
    String_,
    Strans,
    Mag,
    Angle,
    PathType,
    ElFlags,
    PropAttr,
    PropValue,
    Box_,
    BoxType,
    Plex,
    BgnExtn,
    EndExtn,
    Format,
    Mask,
    EndMasks,
    /// A recognized-but-ignored record: library-scope bookkeeping, or one
    /// of the deprecated/unreleased codes `spec.md` §6.1 lists only for
    /// completeness.
    Other(u8),
}

impl RecordKind {
    /// Decodes a record-type byte per the numeric codes of `spec.md` §6.1.
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => Self::Header,
            0x01 => Self::BgnLib,
            0x02 => Self::LibName,
            0x03 => Self::Units,
            0x04 => Self::EndLib,
            0x05 => Self::BgnStr,
            0x06 => Self::StrName,
            0x07 => Self::EndStr,
            0x08 => Self::Boundary,
            0x09 => Self::Path,
            0x0a => Self::Sref,
            0x0b => Self::Aref,
            0x0c => Self::Text,
            0x0d => Self::Layer,
            0x0e => Self::DataType,
            0x0f => Self::Width,
            0x10 => Self::Xy,
            0x11 => Self::EndEl,
            0x12 => Self::SName,
            0x13 => Self::ColRow,
            0x16 => Self::TextType,
            0x17 => Self::Presentation,
            0x19 => Self::String_,
            0x1a => Self::Strans,
            0x1b => Self::Mag,
            0x1c => Self::Angle,
            0x21 => Self::PathType,
            0x26 => Self::ElFlags,
            0x2b => Self::PropAttr,
            0x2c => Self::PropValue,
            0x2d => Self::Box_,
            0x2e => Self::BoxType,
            0x2f => Self::Plex,
            0x30 => Self::BgnExtn,
            0x31 => Self::EndExtn,
            0x36 => Self::Format,
            0x37 => Self::Mask,
            0x38 => Self::EndMasks,
            other => Self::Other(other),
        }
    }
}

/// GDS data-type codes (`spec.md` §6.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    NoData,
    BitArray,
    I2,
    I4,
    R4,
    R8,
    Ascii,
    Unknown(u8),
}

impl DataType {
    /// Decodes a data-type byte.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::NoData,
            1 => Self::BitArray,
            2 => Self::I2,
            3 => Self::I4,
            4 => Self::R4,
            5 => Self::R8,
            6 => Self::Ascii,
            other => Self::Unknown(other),
        }
    }
}

/// A decoded 4-byte record header: length (inclusive of the header
/// itself), type code, and data type.
#[derive(Debug, Clone, Copy)]
pub struct RecordHeader {
    /// Total record length in bytes, including this 4-byte header.
    pub len: u16,
    /// The record type.
    pub kind: RecordKind,
    /// The record's data type.
    pub dtype: DataType,
}

impl RecordHeader {
    /// Bytes of payload following the header.
    pub fn payload_len(&self) -> usize {
        self.len.saturating_sub(4) as usize
    }
}

/// A record's fully decoded payload, in the small set of shapes this
/// reader distinguishes: nothing, a run of 16-bit ints, a run of 32-bit
/// ints, a run of doubles (after the excess-64 codec), or a string.
#[derive(Debug, Clone)]
pub enum Payload {
    /// No payload (e.g. `ENDLIB`, `ENDSTR`, `BOUNDARY`).
    None,
    /// Decoded 16-bit integers (`I2`).
    I16(Vec<i16>),
    /// Decoded 32-bit integers (`I4`), used for `XY`, `WIDTH`, extensions.
    I32(Vec<i32>),
    /// Decoded doubles (`R8`), used for `UNITS`, `MAG`, `ANGLE`.
    F64(Vec<f64>),
    /// A decoded ASCII string, trailing NUL padding stripped.
    Str(ArcStr),
    /// Raw bytes for bit-array fields (`STRANS`, `PRESENTATION`,
    /// `ELFLAGS`), kept as the two bytes GDS actually stores.
    Bits(u8, u8),
}

/// Decodes GDSII's eight-byte excess-64 base-16 floating format to `f64`.
///
/// Sign bit, 7-bit excess-64 exponent, 56-bit fraction normalized so the
/// leading hex digit is non-zero (`spec.md` §4.4, §6.1).
pub fn decode_real8(bits: u64) -> f64 {
    if bits == 0 {
        return 0.0;
    }
    let sign = if bits & 0x8000_0000_0000_0000 != 0 { -1.0 } else { 1.0 };
    let exponent = ((bits >> 56) & 0x7f) as i32 - 64;
    let mantissa = (bits & 0x00ff_ffff_ffff_ffff) as f64 / 2f64.powi(56);
    sign * mantissa * 16f64.powi(exponent)
}

/// Encodes `f64` to GDSII's eight-byte excess-64 base-16 representation.
pub fn encode_real8(mut value: f64) -> u64 {
    if value == 0.0 {
        return 0;
    }
    let mut sign_bit: u64 = 0;
    if value < 0.0 {
        sign_bit = 0x8000_0000_0000_0000;
        value = -value;
    }
    let mut exponent = (0.25 * value.log2()).ceil() as i32;
    if (0.25 * value.log2()) == exponent as f64 {
        exponent += 1;
    }
    let mantissa = (value * 16f64.powi(14 - exponent)).round() as u64;
    let exp_field = ((64 + exponent) as u64) << 56;
    sign_bit | exp_field | (mantissa & 0x00ff_ffff_ffff_ffff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real8_round_trips_common_values() {
        for v in [0.0, 1.0, -1.0, 1000.0, 0.001, 1e-9, 1e-3] {
            let bits = encode_real8(v);
            let back = decode_real8(bits);
            assert!((back - v).abs() <= v.abs() * 1e-9 + 1e-15, "{v} -> {back}");
        }
    }

    #[test]
    fn record_kind_decodes_known_codes() {
        assert!(matches!(RecordKind::from_code(0x08), RecordKind::Boundary));
        assert!(matches!(RecordKind::from_code(0x2d), RecordKind::Box_));
        assert!(matches!(RecordKind::from_code(0xff), RecordKind::Other(0xff)));
    }
}
