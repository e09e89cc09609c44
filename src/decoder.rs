use std::borrow::Cow;

use crate::encoding::{windows_1252, Encoding};
use crate::error::DecodeError;

pub type Result<T> = std::result::Result<T, DecodeError>;

const REPLACEMENT: char = '\u{FFFD}';

/// Construction-time flags, mirroring the platform `TextDecoder` options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderOptions {
    pub fatal: bool,
    pub ignore_bom: bool,
}

impl DecoderOptions {
    pub fn from_values(fatal: OptionValue, ignore_bom: OptionValue) -> Result<Self> {
        Ok(DecoderOptions {
            fatal: fatal.to_flag("fatal")?,
            ignore_bom: ignore_bom.to_flag("ignoreBOM")?,
        })
    }
}

/// Loosely typed option value as handed over by an embedding host.
///
/// Hosts that surface this decoder behind a dynamically typed API coerce
/// whatever they were given into a flag: numbers by truthiness, strings by
/// `str::parse::<bool>`, objects as truthy. Values with no defined boolean
/// interpretation (NaN, non-boolean strings) fail construction.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Object,
}

impl OptionValue {
    fn to_flag(&self, name: &'static str) -> Result<bool> {
        match self {
            OptionValue::Undefined | OptionValue::Null => Ok(false),
            OptionValue::Bool(value) => Ok(*value),
            OptionValue::Number(value) if value.is_nan() => Err(DecodeError::InvalidOption(name)),
            OptionValue::Number(value) => Ok(*value != 0.0),
            OptionValue::Str(value) => value
                .parse()
                .map_err(|_| DecodeError::InvalidOption(name)),
            OptionValue::Object => Ok(true),
        }
    }
}

/// Incremental byte-to-text decoder.
///
/// A decoder is constructed once for an encoding label and a fixed error
/// policy, then fed byte chunks. [`decode_stream`](TextDecoder::decode_stream)
/// retains an incomplete trailing sequence for the next call;
/// [`decode`](TextDecoder::decode) finalizes the logical stream and resets.
pub struct TextDecoder {
    encoding: Encoding,
    fatal: bool,
    ignore_bom: bool,
    // Incomplete trailing sequence carried between streaming calls.
    // At most 3 bytes: a 4-byte UTF-8 sequence missing its last byte, or a
    // held UTF-16 lead surrogate plus an odd byte.
    pending: Vec<u8>,
    bom_seen: bool,
}

impl TextDecoder {
    /// UTF-8 decoder with default options.
    pub fn new() -> Self {
        TextDecoder {
            encoding: Encoding::Utf8,
            fatal: false,
            ignore_bom: false,
            pending: Vec::new(),
            bom_seen: false,
        }
    }

    pub fn for_label(label: &str) -> Result<Self> {
        TextDecoder::with_options(label, DecoderOptions::default())
    }

    pub fn with_options(label: &str, options: DecoderOptions) -> Result<Self> {
        let encoding = Encoding::for_label(label)
            .ok_or_else(|| DecodeError::UnsupportedEncoding(label.to_string()))?;
        Ok(TextDecoder {
            encoding,
            fatal: options.fatal,
            ignore_bom: options.ignore_bom,
            pending: Vec::new(),
            bom_seen: false,
        })
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn fatal(&self) -> bool {
        self.fatal
    }

    pub fn ignore_bom(&self) -> bool {
        self.ignore_bom
    }

    /// Decodes `input` and finalizes the logical stream: carried bytes are
    /// prepended, a trailing incomplete sequence is treated as malformed,
    /// and the streaming state is reset for the next stream.
    pub fn decode(&mut self, input: &[u8]) -> Result<String> {
        self.decode_inner(input, false)
    }

    /// Decodes `input` as a stream continuation: carried bytes are
    /// prepended and an incomplete trailing sequence is retained for the
    /// next call instead of being flushed.
    pub fn decode_stream(&mut self, input: &[u8]) -> Result<String> {
        self.decode_inner(input, true)
    }

    /// Finalizes a stream without new input.
    pub fn finish(&mut self) -> Result<String> {
        self.decode(&[])
    }

    fn decode_inner(&mut self, input: &[u8], stream: bool) -> Result<String> {
        let bytes: Cow<'_, [u8]> = if self.pending.is_empty() {
            Cow::Borrowed(input)
        } else {
            let mut joined = Vec::with_capacity(self.pending.len() + input.len());
            joined.extend_from_slice(&self.pending);
            joined.extend_from_slice(input);
            Cow::Owned(joined)
        };

        let last = !stream;
        let (mut text, retained) = match self.encoding {
            Encoding::Utf8 => self.decode_utf8(&bytes, last)?,
            Encoding::Utf16Le => self.decode_utf16le(&bytes, last)?,
            Encoding::Windows1252 => (bytes.iter().map(|&b| windows_1252(b)).collect(), 0),
        };

        // The BOM is stripped at the scalar level: the first scalar of a
        // logical stream is dropped if it is U+FEFF, and `bom_seen` flips on
        // the first scalar either way so a later U+FEFF survives. Split BOM
        // bytes are no special case since they ride in `pending`.
        let mut bom_seen = self.bom_seen;
        if !self.ignore_bom && !bom_seen {
            if let Some(first) = text.chars().next() {
                if first == '\u{FEFF}' {
                    text.remove(0);
                }
                bom_seen = true;
            }
        }

        // State commits only here, so a fatal error above leaves the
        // decoder exactly as it was before the aborted call.
        if stream {
            let keep_from = bytes.len() - retained;
            let tail = &bytes[keep_from..];
            self.pending.clear();
            self.pending.extend_from_slice(tail);
            self.bom_seen = bom_seen;
        } else {
            self.pending.clear();
            self.bom_seen = false;
        }
        Ok(text)
    }

    // UTF-8 per the Encoding Standard state machine: `needed` counts
    // outstanding continuation bytes, `lower`/`upper` restrict the next
    // continuation byte so overlongs, surrogates and values above U+10FFFF
    // are rejected at the byte level.
    fn decode_utf8(&self, bytes: &[u8], last: bool) -> Result<(String, usize)> {
        let mut out = String::with_capacity(bytes.len());
        let mut code_point: u32 = 0;
        let mut needed: u8 = 0;
        let mut lower: u8 = 0x80;
        let mut upper: u8 = 0xBF;
        let mut seq_start = 0;
        let mut i = 0;
        while i < bytes.len() {
            let byte = bytes[i];
            if needed == 0 {
                match byte {
                    0x00..=0x7F => out.push(byte as char),
                    0xC2..=0xDF => {
                        needed = 1;
                        code_point = (byte & 0x1F) as u32;
                        seq_start = i;
                    }
                    0xE0..=0xEF => {
                        if byte == 0xE0 {
                            lower = 0xA0;
                        }
                        if byte == 0xED {
                            upper = 0x9F;
                        }
                        needed = 2;
                        code_point = (byte & 0x0F) as u32;
                        seq_start = i;
                    }
                    0xF0..=0xF4 => {
                        if byte == 0xF0 {
                            lower = 0x90;
                        }
                        if byte == 0xF4 {
                            upper = 0x8F;
                        }
                        needed = 3;
                        code_point = (byte & 0x07) as u32;
                        seq_start = i;
                    }
                    _ => self.malformed(&mut out, i)?,
                }
                i += 1;
            } else if (lower..=upper).contains(&byte) {
                code_point = (code_point << 6) | (byte & 0x3F) as u32;
                lower = 0x80;
                upper = 0xBF;
                needed -= 1;
                if needed == 0 {
                    // the range restrictions above guarantee a scalar value
                    out.push(char::from_u32(code_point).unwrap_or(REPLACEMENT));
                }
                i += 1;
            } else {
                needed = 0;
                lower = 0x80;
                upper = 0xBF;
                self.malformed(&mut out, i)?;
                // the offending byte is not consumed by the error; it is
                // reprocessed as a fresh lead, so `[f0 41 42]` decodes to
                // one replacement char followed by "AB"
            }
        }
        if needed > 0 {
            if !last {
                return Ok((out, bytes.len() - seq_start));
            }
            self.malformed(&mut out, bytes.len())?;
        }
        Ok((out, 0))
    }

    // UTF-16LE: bytes pair up little-endian into code units; surrogate
    // pairs combine into supplementary-plane scalars. Lone surrogates are
    // malformed (a Rust string cannot carry them), matching the shared
    // utf-16 decoder of the Encoding Standard.
    fn decode_utf16le(&self, bytes: &[u8], last: bool) -> Result<(String, usize)> {
        let mut out = String::with_capacity(bytes.len() / 2);
        let mut lead: Option<u16> = None;
        let mut seq_start = 0;
        let mut i = 0;
        while i + 2 <= bytes.len() {
            let unit = u16::from_le_bytes([bytes[i], bytes[i + 1]]);
            match lead {
                Some(high) => {
                    if (0xDC00..=0xDFFF).contains(&unit) {
                        let scalar =
                            0x10000 + (((high as u32) - 0xD800) << 10) + ((unit as u32) - 0xDC00);
                        out.push(char::from_u32(scalar).unwrap_or(REPLACEMENT));
                        lead = None;
                        i += 2;
                    } else {
                        // lone lead surrogate; the current unit is reprocessed
                        lead = None;
                        self.malformed(&mut out, seq_start)?;
                    }
                }
                None => match unit {
                    0xD800..=0xDBFF => {
                        lead = Some(unit);
                        seq_start = i;
                        i += 2;
                    }
                    0xDC00..=0xDFFF => {
                        self.malformed(&mut out, i)?;
                        i += 2;
                    }
                    _ => {
                        out.push(char::from_u32(unit as u32).unwrap_or(REPLACEMENT));
                        i += 2;
                    }
                },
            }
        }
        // `i` now sits at the trailing odd byte, if there is one
        if !last {
            let keep_from = match lead {
                Some(_) => seq_start,
                None => i,
            };
            return Ok((out, bytes.len() - keep_from));
        }
        if lead.is_some() {
            self.malformed(&mut out, seq_start)?;
        }
        if i < bytes.len() {
            self.malformed(&mut out, i)?;
        }
        Ok((out, 0))
    }

    fn malformed(&self, out: &mut String, offset: usize) -> Result<()> {
        if self.fatal {
            return Err(DecodeError::Malformed {
                encoding: self.encoding.name(),
                offset,
            });
        }
        out.push(REPLACEMENT);
        Ok(())
    }
}

impl Default for TextDecoder {
    fn default() -> Self {
        TextDecoder::new()
    }
}
