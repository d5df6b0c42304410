//! Byte map of a container: which range belongs to the header, each section
//! body, the directory, or nothing at all.

use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, bytes: &'a [u8]) -> Option<&'a [u8]> {
        bytes.get(self.start..self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionKind {
    /// The leading `u32` directory offset.
    Header,
    /// A section body, by directory name.
    Section(String),
    Directory,
    /// Bytes between claimed regions.
    Gap,
    /// Bytes after the last claimed region.
    Tail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub kind: RegionKind,
    pub range: ByteRange,
}

/// Contiguous, ordered regions covering every byte of a container.
#[derive(Debug, Clone)]
pub struct FileLayout {
    pub file_len: usize,
    pub regions: Vec<Region>,
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

impl FileLayout {
    /// Orders `claimed` by offset behind a header of `header_len` bytes and
    /// fills the holes with `Gap` and `Tail` regions. Overlapping claims are
    /// rejected.
    pub fn tile(file_len: usize, header_len: usize, mut claimed: Vec<Region>) -> io::Result<Self> {
        claimed.sort_by_key(|r| (r.range.start, r.range.end));

        let header_end = header_len.min(file_len);
        let mut regions = vec![Region {
            kind: RegionKind::Header,
            range: ByteRange {
                start: 0,
                end: header_end,
            },
        }];
        let mut cursor = header_end;
        for region in claimed {
            if region.range.start < cursor {
                return Err(invalid(format!(
                    "{:?} at {} overlaps data ending at {cursor}",
                    region.kind, region.range.start
                )));
            }
            if region.range.start > cursor {
                regions.push(Region {
                    kind: RegionKind::Gap,
                    range: ByteRange {
                        start: cursor,
                        end: region.range.start,
                    },
                });
            }
            cursor = region.range.end;
            regions.push(region);
        }
        if cursor < file_len {
            regions.push(Region {
                kind: RegionKind::Tail,
                range: ByteRange {
                    start: cursor,
                    end: file_len,
                },
            });
        }

        Ok(Self { file_len, regions })
    }

    /// Checks that the regions start at 0, abut each other and end at
    /// `file_len`.
    pub fn validate(&self) -> io::Result<()> {
        if self.regions.is_empty() {
            return Err(invalid("layout has no regions".to_string()));
        }
        let end = self.regions.iter().try_fold(0usize, |expected, region| {
            if region.range.start != expected || region.range.end < region.range.start {
                return Err(invalid(format!(
                    "{:?} spans {}..{}, expected it to start at {expected}",
                    region.kind, region.range.start, region.range.end
                )));
            }
            Ok(region.range.end)
        })?;
        if end != self.file_len {
            return Err(invalid(format!(
                "layout ends at {end}, container is {} bytes",
                self.file_len
            )));
        }
        Ok(())
    }

    pub fn section(&self, name: &str) -> Option<&Region> {
        self.regions
            .iter()
            .find(|r| matches!(&r.kind, RegionKind::Section(n) if n == name))
    }

    /// Bytes no header, section or directory accounts for.
    pub fn unclaimed_len(&self) -> usize {
        self.regions
            .iter()
            .filter(|r| matches!(r.kind, RegionKind::Gap | RegionKind::Tail))
            .map(|r| r.range.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(name: &str, start: usize, end: usize) -> Region {
        Region {
            kind: RegionKind::Section(name.to_string()),
            range: ByteRange { start, end },
        }
    }

    #[test]
    fn tile_fills_gaps_and_tail() {
        let layout = FileLayout::tile(
            30,
            4,
            vec![section("b.evt", 12, 20), section("a.ver", 4, 8)],
        )
        .expect("tile");
        layout.validate().expect("valid");

        let kinds: Vec<&RegionKind> = layout.regions.iter().map(|r| &r.kind).collect();
        assert_eq!(
            kinds,
            [
                &RegionKind::Header,
                &RegionKind::Section("a.ver".to_string()),
                &RegionKind::Gap,
                &RegionKind::Section("b.evt".to_string()),
                &RegionKind::Tail,
            ]
        );
        assert_eq!(layout.unclaimed_len(), 4 + 10);
        assert_eq!(
            layout.section("b.evt").map(|r| r.range),
            Some(ByteRange { start: 12, end: 20 })
        );
    }

    #[test]
    fn tile_rejects_overlap() {
        let err = FileLayout::tile(20, 4, vec![section("a", 4, 12), section("b", 10, 14)])
            .expect_err("overlap");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn validate_requires_full_coverage() {
        let layout = FileLayout {
            file_len: 10,
            regions: vec![section("a", 0, 6)],
        };
        assert!(layout.validate().is_err());

        let layout = FileLayout {
            file_len: 10,
            regions: vec![section("a", 0, 6), section("b", 7, 10)],
        };
        assert!(layout.validate().is_err());
    }
}
