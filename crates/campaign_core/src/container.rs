use std::io::{self, Cursor};

use serde::Serialize;

use crate::layout::{ByteRange, FileLayout, Region, RegionKind};
use crate::reader::LittleEndianReader;
use crate::writer::{PutLe, count_u8, count_u32};

const HEADER_LEN: usize = 4;
const ENTRY_FIXED_LEN: u64 = 1 + 4 + 4;

/// One named byte range inside the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionDescriptor {
    pub name: String,
    pub offset: u32,
    pub size: u32,
}

impl SectionDescriptor {
    pub fn range(&self) -> ByteRange {
        let start = self.offset as usize;
        ByteRange {
            start,
            end: start + self.size as usize,
        }
    }

    /// Case-insensitive substring match against the stored name.
    pub fn matches(&self, token: &str) -> bool {
        self.name
            .to_ascii_lowercase()
            .contains(&token.to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    offset: u32,
    entries: Vec<SectionDescriptor>,
}

impl Directory {
    pub fn parse(bytes: &[u8]) -> io::Result<Self> {
        let mut r = LittleEndianReader::new(Cursor::new(bytes));
        let offset = r.read_u32()?;
        if offset as usize > bytes.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "directory offset {} beyond container length {}",
                    offset,
                    bytes.len()
                ),
            ));
        }
        r.seek_to(u64::from(offset))?;

        let count = r.read_u32()?;
        if u64::from(count) * ENTRY_FIXED_LEN > r.remaining()? {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("directory claims {count} entries but only {} bytes remain", r.remaining()?),
            ));
        }

        let entries = r.read_vec(count as usize, |r| {
            let name_len = r.read_u8()?;
            let name = r.read_fixed_string(name_len as usize)?;
            let offset = r.read_u32()?;
            let size = r.read_u32()?;
            Ok(SectionDescriptor { name, offset, size })
        })?;

        for entry in &entries {
            if entry.range().end > bytes.len() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "section {} range {}..{} beyond container length {}",
                        entry.name,
                        entry.range().start,
                        entry.range().end,
                        bytes.len()
                    ),
                ));
            }
        }

        Ok(Self { offset, entries })
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn entries(&self) -> &[SectionDescriptor] {
        &self.entries
    }

    pub fn find(&self, token: &str) -> Option<&SectionDescriptor> {
        self.entries.iter().find(|e| e.matches(token))
    }

    /// Bytes of the directory itself: count plus entries.
    pub fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        out.put_u32(count_u32(self.entries.len(), "directory entry")?);
        for entry in &self.entries {
            let name_len = entry.name.chars().count();
            out.put_u8(count_u8(name_len, "section name byte")?);
            out.put_fixed_string(&entry.name, name_len);
            out.put_u32(entry.offset);
            out.put_u32(entry.size);
        }
        Ok(())
    }

    /// Maps the container into contiguous regions: header, section bodies in
    /// offset order, unclaimed gaps, the directory, and any trailing bytes.
    pub fn layout(&self, file_len: usize) -> io::Result<FileLayout> {
        let mut dir_bytes = Vec::new();
        self.emit_to_vec(&mut dir_bytes)?;

        let mut claimed: Vec<Region> = self
            .entries
            .iter()
            .map(|e| Region {
                kind: RegionKind::Section(e.name.clone()),
                range: e.range(),
            })
            .collect();
        claimed.push(Region {
            kind: RegionKind::Directory,
            range: ByteRange {
                start: self.offset as usize,
                end: self.offset as usize + dir_bytes.len(),
            },
        });
        FileLayout::tile(file_len, HEADER_LEN, claimed)
    }
}

/// Writes a container: directory offset, section bodies in insertion order,
/// then the directory.
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    sections: Vec<(String, Vec<u8>)>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.push(name, bytes);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.sections.push((name.into(), bytes));
    }

    pub fn build(self) -> io::Result<Vec<u8>> {
        let body_len: usize = self.sections.iter().map(|(_, b)| b.len()).sum();
        let mut out = Vec::with_capacity(HEADER_LEN + body_len + 16 * self.sections.len());
        out.put_u32(0);

        let mut entries = Vec::with_capacity(self.sections.len());
        for (name, bytes) in self.sections {
            let offset = u32::try_from(out.len()).map_err(|_| too_large())?;
            let size = u32::try_from(bytes.len()).map_err(|_| too_large())?;
            out.extend_from_slice(&bytes);
            entries.push(SectionDescriptor { name, offset, size });
        }

        let offset = u32::try_from(out.len()).map_err(|_| too_large())?;
        out[..HEADER_LEN].copy_from_slice(&offset.to_le_bytes());
        Directory { offset, entries }.emit_to_vec(&mut out)?;
        Ok(out)
    }
}

fn too_large() -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        "container exceeds 4 GiB addressable by the directory",
    )
}
