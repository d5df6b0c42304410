use std::io::{self, Read, Seek, SeekFrom};

use crate::identity::Identity;

pub struct LittleEndianReader<R> {
    inner: R,
}

impl<R: Read + Seek> LittleEndianReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_i8(&mut self) -> io::Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_i16(&mut self) -> io::Result<i16> {
        let mut buf = [0u8; 2];
        self.inner.read_exact(&mut buf)?;
        Ok(i16::from_le_bytes(buf))
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.inner.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn read_i32(&mut self) -> io::Result<i32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    pub fn read_u32(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    pub fn read_f32(&mut self) -> io::Result<f32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(f32::from_le_bytes(buf))
    }

    pub fn read_identity(&mut self) -> io::Result<Identity> {
        let id = self.read_u32()?;
        let creator = self.read_u32()?;
        Ok(Identity::new(id, creator))
    }

    pub fn read_u8_array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut result = [0u8; N];
        self.inner.read_exact(&mut result)?;
        Ok(result)
    }

    pub fn read_i16_array<const N: usize>(&mut self) -> io::Result<[i16; N]> {
        let mut result = [0i16; N];
        for item in &mut result {
            *item = self.read_i16()?;
        }
        Ok(result)
    }

    pub fn read_u16_array<const N: usize>(&mut self) -> io::Result<[u16; N]> {
        let mut result = [0u16; N];
        for item in &mut result {
            *item = self.read_u16()?;
        }
        Ok(result)
    }

    pub fn read_i32_array<const N: usize>(&mut self) -> io::Result<[i32; N]> {
        let mut result = [0i32; N];
        for item in &mut result {
            *item = self.read_i32()?;
        }
        Ok(result)
    }

    pub fn read_u32_array<const N: usize>(&mut self) -> io::Result<[u32; N]> {
        let mut result = [0u32; N];
        for item in &mut result {
            *item = self.read_u32()?;
        }
        Ok(result)
    }

    pub fn read_f32_array<const N: usize>(&mut self) -> io::Result<[f32; N]> {
        let mut result = [0f32; N];
        for item in &mut result {
            *item = self.read_f32()?;
        }
        Ok(result)
    }

    /// Reads `n` bytes and decodes them up to the first NUL. Every byte maps
    /// to the char with the same code point so any value survives re-encoding.
    pub fn read_fixed_string(&mut self, n: usize) -> io::Result<String> {
        let bytes = self.read_bytes(n)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(n);
        Ok(bytes[..end].iter().map(|&b| char::from(b)).collect())
    }

    pub fn read_bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reads a count-prefixed list, the count already having been decoded.
    pub fn read_vec<T>(
        &mut self,
        n: usize,
        mut parse: impl FnMut(&mut Self) -> io::Result<T>,
    ) -> io::Result<Vec<T>> {
        let mut result = Vec::with_capacity(n.min(4096));
        for _ in 0..n {
            result.push(parse(self)?);
        }
        Ok(result)
    }

    pub fn skip(&mut self, n: u64) -> io::Result<()> {
        let target = self.position()? + n;
        if target > self.len()? {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("cannot skip {n} bytes past end of stream"),
            ));
        }
        self.inner.seek(SeekFrom::Start(target))?;
        Ok(())
    }

    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    pub fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    pub fn len(&mut self) -> io::Result<u64> {
        let cur = self.position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(cur))?;
        Ok(end)
    }

    pub fn is_empty(&mut self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn remaining(&mut self) -> io::Result<u64> {
        let cur = self.position()?;
        Ok(self.len()?.saturating_sub(cur))
    }
}
