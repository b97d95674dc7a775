//! URI-safe LZ compression for share links.
//!
//! Bit-compatible with lz-string's `compressToEncodedURIComponent` /
//! `decompressFromEncodedURIComponent`: an LZW-style dictionary over UTF-16
//! code units whose output bits are packed six to a character from a URL-safe
//! alphabet. Links produced by the web planner decode unchanged.
//!
//! Dictionary codes 0, 1 and 2 are reserved for an 8-bit literal, a 16-bit
//! literal and end of stream. Code width starts at 2 bits on the compressing
//! side and grows whenever the dictionary outgrows it.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

const ALPHABET: &[u8; 65] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-$";
const BITS_PER_CHAR: u32 = 6;
/// Mask of the highest bit of an alphabet value.
const READ_RESET: u32 = 1 << (BITS_PER_CHAR - 1);

const LITERAL_8: u32 = 0;
const LITERAL_16: u32 = 1;
const END_OF_STREAM: u32 = 2;

/// Why a payload could not be decompressed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("invalid dictionary code {code} (dictionary has {size} entries)")]
    InvalidCode { code: u32, size: u32 },

    #[error("compressed data ends without an end-of-stream marker")]
    MissingTerminator,

    #[error("decompressed data is not valid UTF-16")]
    InvalidUtf16,
}

/// Code width bookkeeping shared by both directions.
struct Width {
    bits: u32,
    enlarge_in: u32,
}

impl Width {
    fn new(bits: u32, enlarge_in: u32) -> Self {
        Self { bits, enlarge_in }
    }

    /// Count one dictionary addition, widening codes when due.
    fn tick(&mut self) {
        self.enlarge_in -= 1;
        self.widen_if_due();
    }

    fn widen_if_due(&mut self) {
        if self.enlarge_in == 0 {
            self.enlarge_in = 1 << self.bits;
            self.bits += 1;
        }
    }
}

#[derive(Default)]
struct BitWriter {
    out: String,
    value: u32,
    position: u32,
}

impl BitWriter {
    /// Append the low `bits` bits of `value`, least significant first.
    fn write(&mut self, mut value: u32, bits: u32) {
        for _ in 0..bits {
            self.value = (self.value << 1) | (value & 1);
            if self.position == BITS_PER_CHAR - 1 {
                self.emit();
            } else {
                self.position += 1;
            }
            value >>= 1;
        }
    }

    fn emit(&mut self) {
        self.out.push(char::from(ALPHABET[self.value as usize]));
        self.value = 0;
        self.position = 0;
    }

    /// Pad the pending bits with zeros up to a whole character.
    fn finish(mut self) -> String {
        loop {
            self.value <<= 1;
            if self.position == BITS_PER_CHAR - 1 {
                self.emit();
                return self.out;
            }
            self.position += 1;
        }
    }
}

/// The phrase being extended by the compressor.
#[derive(Clone, Copy)]
struct Phrase {
    code: u32,
    /// Set when the phrase is a single code unit
    unit: Option<u16>,
}

/// Compress `input` into URI-safe text.
///
/// The empty string compresses to the empty string.
pub fn compress(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut writer = BitWriter::default();
    let mut width = Width::new(2, 2);
    let mut next_code = 3u32;
    let mut units: HashMap<u16, u32> = HashMap::new();
    let mut phrases: HashMap<(u32, u16), u32> = HashMap::new();
    // Units that have a code but have not been written as a literal yet.
    let mut pending: HashSet<u16> = HashSet::new();
    let mut current: Option<Phrase> = None;

    for unit in input.encode_utf16() {
        let unit_code = match units.get(&unit) {
            Some(&code) => code,
            None => {
                let code = next_code;
                next_code += 1;
                units.insert(unit, code);
                pending.insert(unit);
                code
            }
        };
        let single = Phrase {
            code: unit_code,
            unit: Some(unit),
        };

        let Some(phrase) = current else {
            current = Some(single);
            continue;
        };

        if let Some(&code) = phrases.get(&(phrase.code, unit)) {
            current = Some(Phrase { code, unit: None });
        } else {
            write_phrase(&mut writer, &mut width, &mut pending, phrase);
            phrases.insert((phrase.code, unit), next_code);
            next_code += 1;
            current = Some(single);
        }
    }

    if let Some(phrase) = current {
        write_phrase(&mut writer, &mut width, &mut pending, phrase);
    }
    writer.write(END_OF_STREAM, width.bits);
    writer.finish()
}

fn write_phrase(
    writer: &mut BitWriter,
    width: &mut Width,
    pending: &mut HashSet<u16>,
    phrase: Phrase,
) {
    match phrase.unit.filter(|unit| pending.contains(unit)) {
        Some(unit) => {
            pending.remove(&unit);
            if unit < 256 {
                writer.write(LITERAL_8, width.bits);
                writer.write(u32::from(unit), 8);
            } else {
                writer.write(LITERAL_16, width.bits);
                writer.write(u32::from(unit), 16);
            }
            // The literal's own dictionary slot.
            width.tick();
        }
        None => writer.write(phrase.code, width.bits),
    }
    width.tick();
}

struct BitReader<'a> {
    values: &'a [u32],
    value: u32,
    mask: u32,
    next: usize,
}

impl<'a> BitReader<'a> {
    fn new(values: &'a [u32]) -> Self {
        Self {
            values,
            value: values.first().copied().unwrap_or(0),
            mask: READ_RESET,
            next: 1,
        }
    }

    /// Read `bits` bits, least significant first. Past the end of input
    /// every bit reads as zero.
    fn read(&mut self, bits: u32) -> u32 {
        let mut out = 0;
        for i in 0..bits {
            let set = self.value & self.mask != 0;
            self.mask >>= 1;
            if self.mask == 0 {
                self.mask = READ_RESET;
                self.value = self.values.get(self.next).copied().unwrap_or(0);
                self.next += 1;
            }
            if set {
                out |= 1 << i;
            }
        }
        out
    }

    fn exhausted(&self) -> bool {
        self.next > self.values.len()
    }
}

fn alphabet_value(ch: char) -> Option<u32> {
    let byte = u8::try_from(ch).ok()?;
    ALPHABET
        .iter()
        .position(|&b| b == byte)
        .map(|idx| idx as u32)
}

/// Decompress text produced by [`compress`].
///
/// Spaces are read as `+`, undoing form-style query decoding.
///
/// # Returns
/// `Ok(None)` for empty input (no data), otherwise the decoded string.
///
/// # Errors
/// A [`CodecError`] describing the first problem found. Malformed input
/// never panics.
pub fn decompress(input: &str) -> Result<Option<String>, CodecError> {
    if input.is_empty() {
        return Ok(None);
    }

    let values = input
        .chars()
        .enumerate()
        .map(|(position, ch)| {
            let ch = if ch == ' ' { '+' } else { ch };
            alphabet_value(ch).ok_or(CodecError::InvalidCharacter {
                character: ch,
                position,
            })
        })
        .collect::<Result<Vec<u32>, CodecError>>()?;

    let mut reader = BitReader::new(&values);
    // Slots 0-2 stand in for the reserved codes.
    let mut dictionary: Vec<Vec<u16>> = vec![Vec::new(); 3];
    let mut width = Width::new(3, 4);

    let first = match reader.read(2) {
        LITERAL_8 => reader.read(8),
        LITERAL_16 => reader.read(16),
        END_OF_STREAM => return Ok(Some(String::new())),
        code => return Err(CodecError::InvalidCode { code, size: 3 }),
    };
    let mut previous = vec![first as u16];
    dictionary.push(previous.clone());
    let mut output = previous.clone();

    loop {
        if reader.exhausted() {
            return Err(CodecError::MissingTerminator);
        }

        let mut code = reader.read(width.bits);
        match code {
            LITERAL_8 | LITERAL_16 => {
                let bits = if code == LITERAL_8 { 8 } else { 16 };
                let unit = reader.read(bits) as u16;
                dictionary.push(vec![unit]);
                code = dictionary.len() as u32 - 1;
                width.enlarge_in -= 1;
            }
            END_OF_STREAM => {
                return String::from_utf16(&output)
                    .map(Some)
                    .map_err(|_| CodecError::InvalidUtf16);
            }
            _ => {}
        }
        width.widen_if_due();

        let size = dictionary.len() as u32;
        let entry = if code < size {
            dictionary[code as usize].clone()
        } else if code == size {
            let mut entry = previous.clone();
            entry.push(previous[0]);
            entry
        } else {
            return Err(CodecError::InvalidCode { code, size });
        };

        output.extend_from_slice(&entry);
        let mut added = previous;
        added.push(entry[0]);
        dictionary.push(added);
        width.tick();
        previous = entry;
    }
}
