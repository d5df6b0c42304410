//! LZSS codec used by the compressed campaign sections.
//!
//! The bit stream follows the classic 12/4 LZSS layout: each token starts with
//! a flag bit, `1` for a literal byte (8 bits) and `0` for a back reference
//! (12-bit window position, 4-bit length). Position 0 is the end-of-stream
//! marker, so the window is filled starting at position 1. Bits are packed
//! most significant first.

use thiserror::Error;

const INDEX_BIT_COUNT: u32 = 12;
const LENGTH_BIT_COUNT: u32 = 4;
const WINDOW_SIZE: usize = 1 << INDEX_BIT_COUNT;
const WINDOW_MASK: usize = WINDOW_SIZE - 1;
const BREAK_EVEN: usize = ((1 + INDEX_BIT_COUNT + LENGTH_BIT_COUNT) / 9) as usize;
const MIN_MATCH: usize = BREAK_EVEN + 1;
const MAX_MATCH: usize = (1 << LENGTH_BIT_COUNT) + BREAK_EVEN;
const MAX_DISTANCE: usize = WINDOW_SIZE - MAX_MATCH;
const END_OF_STREAM: usize = 0;
const MAX_CHAIN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressionError {
    #[error("decompressed {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("compressed stream ended after producing {produced} bytes")]
    UnexpectedEnd { produced: usize },
}

/// Byte codec for compressed sections.
pub trait Codec {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError>;
    fn decompress(&self, input: &[u8], expected_len: usize)
    -> Result<Vec<u8>, CompressionError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Lzss;

impl Lzss {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for Lzss {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        Ok(lzss_compress(input))
    }

    fn decompress(
        &self,
        input: &[u8],
        expected_len: usize,
    ) -> Result<Vec<u8>, CompressionError> {
        lzss_expand(input, expected_len)
    }
}

struct BitWriter {
    out: Vec<u8>,
    rack: u8,
    mask: u8,
}

impl BitWriter {
    fn with_capacity(n: usize) -> Self {
        Self {
            out: Vec::with_capacity(n),
            rack: 0,
            mask: 0x80,
        }
    }

    fn put_bit(&mut self, bit: bool) {
        if bit {
            self.rack |= self.mask;
        }
        self.mask >>= 1;
        if self.mask == 0 {
            self.out.push(self.rack);
            self.rack = 0;
            self.mask = 0x80;
        }
    }

    fn put_bits(&mut self, value: usize, count: u32) {
        for shift in (0..count).rev() {
            self.put_bit((value >> shift) & 1 == 1);
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.mask != 0x80 {
            self.out.push(self.rack);
        }
        self.out
    }
}

struct BitReader<'a> {
    input: &'a [u8],
    pos: usize,
    mask: u8,
}

impl<'a> BitReader<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            mask: 0x80,
        }
    }

    fn bit(&mut self) -> Option<bool> {
        let byte = *self.input.get(self.pos)?;
        let bit = byte & self.mask != 0;
        self.mask >>= 1;
        if self.mask == 0 {
            self.mask = 0x80;
            self.pos += 1;
        }
        Some(bit)
    }

    fn bits(&mut self, count: u32) -> Option<usize> {
        let mut value = 0usize;
        for _ in 0..count {
            value = (value << 1) | usize::from(self.bit()?);
        }
        Some(value)
    }
}

fn window_pos(index: usize) -> usize {
    (index + 1) & WINDOW_MASK
}

fn lzss_compress(input: &[u8]) -> Vec<u8> {
    let mut bits = BitWriter::with_capacity(input.len() / 2 + 4);
    let mut head = vec![usize::MAX; 1 << 16];
    let mut prev = vec![usize::MAX; input.len()];

    let key = |i: usize| (usize::from(input[i]) << 8) | usize::from(input[i + 1]);
    let insert = |i: usize, head: &mut Vec<usize>, prev: &mut Vec<usize>| {
        if i + 1 < input.len() {
            let k = key(i);
            prev[i] = head[k];
            head[k] = i;
        }
    };

    let mut i = 0;
    while i < input.len() {
        let limit = MAX_MATCH.min(input.len() - i);
        let mut best_len = 0;
        let mut best_src = 0;

        if limit >= MIN_MATCH {
            let mut candidate = head[key(i)];
            let mut steps = 0;
            while candidate != usize::MAX && steps < MAX_CHAIN {
                if i - candidate > MAX_DISTANCE {
                    break;
                }
                // Window slot 0 doubles as the end marker and is never referenced.
                if window_pos(candidate) != END_OF_STREAM {
                    let len = input[candidate..]
                        .iter()
                        .zip(&input[i..i + limit])
                        .take_while(|(a, b)| a == b)
                        .count();
                    if len > best_len {
                        best_len = len;
                        best_src = candidate;
                        if len == limit {
                            break;
                        }
                    }
                }
                candidate = prev[candidate];
                steps += 1;
            }
        }

        if best_len >= MIN_MATCH {
            bits.put_bit(false);
            bits.put_bits(window_pos(best_src), INDEX_BIT_COUNT);
            bits.put_bits(best_len - MIN_MATCH, LENGTH_BIT_COUNT);
            for j in i..i + best_len {
                insert(j, &mut head, &mut prev);
            }
            i += best_len;
        } else {
            bits.put_bit(true);
            bits.put_bits(usize::from(input[i]), 8);
            insert(i, &mut head, &mut prev);
            i += 1;
        }
    }

    bits.put_bit(false);
    bits.put_bits(END_OF_STREAM, INDEX_BIT_COUNT);
    bits.finish()
}

fn lzss_expand(input: &[u8], expected_len: usize) -> Result<Vec<u8>, CompressionError> {
    let mut window = [0u8; WINDOW_SIZE];
    let mut current = 1usize;
    let mut out = Vec::with_capacity(expected_len);
    let mut bits = BitReader::new(input);

    let truncated = |produced: usize| CompressionError::UnexpectedEnd { produced };

    while out.len() < expected_len {
        let Some(literal) = bits.bit() else {
            return Err(truncated(out.len()));
        };
        if literal {
            let c = bits.bits(8).ok_or_else(|| truncated(out.len()))? as u8;
            out.push(c);
            window[current] = c;
            current = (current + 1) & WINDOW_MASK;
            continue;
        }

        let position = bits
            .bits(INDEX_BIT_COUNT)
            .ok_or_else(|| truncated(out.len()))?;
        if position == END_OF_STREAM {
            break;
        }
        let length = bits
            .bits(LENGTH_BIT_COUNT)
            .ok_or_else(|| truncated(out.len()))?
            + MIN_MATCH;
        for k in 0..length {
            let c = window[(position + k) & WINDOW_MASK];
            out.push(c);
            window[current] = c;
            current = (current + 1) & WINDOW_MASK;
        }
        if out.len() > expected_len {
            return Err(CompressionError::LengthMismatch {
                expected: expected_len,
                actual: out.len(),
            });
        }
    }

    if out.len() != expected_len {
        return Err(CompressionError::LengthMismatch {
            expected: expected_len,
            actual: out.len(),
        });
    }
    Ok(out)
}
