use std::io;

use crate::identity::Identity;

/// Little-endian emit helpers for section buffers.
pub trait PutLe {
    fn put_u8(&mut self, v: u8);
    fn put_i8(&mut self, v: i8);
    fn put_i16(&mut self, v: i16);
    fn put_u16(&mut self, v: u16);
    fn put_i32(&mut self, v: i32);
    fn put_u32(&mut self, v: u32);
    fn put_f32(&mut self, v: f32);
    fn put_identity(&mut self, v: Identity);
    fn put_bytes(&mut self, v: &[u8]);
    fn put_zeros(&mut self, n: usize);
    /// Writes exactly `n` bytes: the string's bytes followed by NUL padding.
    fn put_fixed_string(&mut self, s: &str, n: usize);
}

impl PutLe for Vec<u8> {
    fn put_u8(&mut self, v: u8) {
        self.push(v);
    }

    fn put_i8(&mut self, v: i8) {
        self.push(v as u8);
    }

    fn put_i16(&mut self, v: i16) {
        self.extend_from_slice(&v.to_le_bytes());
    }

    fn put_u16(&mut self, v: u16) {
        self.extend_from_slice(&v.to_le_bytes());
    }

    fn put_i32(&mut self, v: i32) {
        self.extend_from_slice(&v.to_le_bytes());
    }

    fn put_u32(&mut self, v: u32) {
        self.extend_from_slice(&v.to_le_bytes());
    }

    fn put_f32(&mut self, v: f32) {
        self.extend_from_slice(&v.to_le_bytes());
    }

    fn put_identity(&mut self, v: Identity) {
        self.put_u32(v.id);
        self.put_u32(v.creator);
    }

    fn put_bytes(&mut self, v: &[u8]) {
        self.extend_from_slice(v);
    }

    fn put_zeros(&mut self, n: usize) {
        self.resize(self.len() + n, 0);
    }

    fn put_fixed_string(&mut self, s: &str, n: usize) {
        let start = self.len();
        // Chars above 0xff cannot come from a decoded buffer.
        self.extend(
            s.chars()
                .take(n)
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?')),
        );
        self.resize(start + n, 0);
    }
}

pub fn count_u8(n: usize, what: &str) -> io::Result<u8> {
    u8::try_from(n).map_err(|_| count_overflow(n, what, "u8"))
}

pub fn count_u16(n: usize, what: &str) -> io::Result<u16> {
    u16::try_from(n).map_err(|_| count_overflow(n, what, "u16"))
}

pub fn count_i16(n: usize, what: &str) -> io::Result<i16> {
    i16::try_from(n).map_err(|_| count_overflow(n, what, "i16"))
}

pub fn count_i32(n: usize, what: &str) -> io::Result<i32> {
    i32::try_from(n).map_err(|_| count_overflow(n, what, "i32"))
}

pub fn count_u32(n: usize, what: &str) -> io::Result<u32> {
    u32::try_from(n).map_err(|_| count_overflow(n, what, "u32"))
}

fn count_overflow(n: usize, what: &str, width: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{what} count {n} does not fit in {width}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_string_is_padded_to_capacity() {
        let mut out = Vec::new();
        out.put_fixed_string("Korea", 8);
        assert_eq!(out, b"Korea\0\0\0");
    }

    #[test]
    fn fixed_string_never_exceeds_capacity() {
        let mut out = Vec::new();
        out.put_fixed_string("Balkans", 4);
        assert_eq!(out, b"Balk");
    }

    #[test]
    fn count_overflow_is_rejected() {
        assert_eq!(count_u8(255, "links").expect("fits"), 255);
        let err = count_u8(256, "links").expect_err("should overflow");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
