use std::io::{self, Cursor, Read, Seek};

use crate::compression::Codec;
use crate::error::CampaignError;
use crate::reader::LittleEndianReader;
use crate::writer::{PutLe, count_i16, count_i32};

/// Field order of the header in front of a compressed payload. The three
/// orders are all in use and are kept distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameHeader {
    /// `i32 compressed_len, i32 uncompressed_len` (CMP).
    Lengths,
    /// `i32 compressed_len, i16 count, i32 uncompressed_len` (OBD, UNI).
    CountBetweenLengths,
    /// `i16 count, i32 uncompressed_len, i32 compressed_len` (OBJ).
    CountFirst,
}

impl FrameHeader {
    /// Header size in bytes.
    pub fn size(&self) -> usize {
        match self {
            Self::Lengths => 8,
            Self::CountBetweenLengths | Self::CountFirst => 10,
        }
    }

    pub fn has_count(&self) -> bool {
        !matches!(self, Self::Lengths)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFields {
    pub compressed_len: i32,
    pub uncompressed_len: i32,
    /// Record count, for headers that carry one.
    pub count: i16,
}

/// An unwrapped compressed section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unframed {
    pub fields: FrameFields,
    pub body: Vec<u8>,
}

pub fn read_frame_fields(
    section: &str,
    bytes: &[u8],
    header: FrameHeader,
) -> Result<FrameFields, CampaignError> {
    let mut r = LittleEndianReader::new(Cursor::new(bytes));
    parse_frame_fields(&mut r, header).map_err(|e| CampaignError::malformed(section, e))
}

fn parse_frame_fields<R: Read + Seek>(
    r: &mut LittleEndianReader<R>,
    header: FrameHeader,
) -> io::Result<FrameFields> {
    match header {
        FrameHeader::Lengths => {
            let compressed_len = r.read_i32()?;
            let uncompressed_len = r.read_i32()?;
            Ok(FrameFields {
                compressed_len,
                uncompressed_len,
                count: 0,
            })
        }
        FrameHeader::CountBetweenLengths => {
            let compressed_len = r.read_i32()?;
            let count = r.read_i16()?;
            let uncompressed_len = r.read_i32()?;
            Ok(FrameFields {
                compressed_len,
                uncompressed_len,
                count,
            })
        }
        FrameHeader::CountFirst => {
            let count = r.read_i16()?;
            let uncompressed_len = r.read_i32()?;
            let compressed_len = r.read_i32()?;
            Ok(FrameFields {
                compressed_len,
                uncompressed_len,
                count,
            })
        }
    }
}

/// Unwraps a compressed section. Returns `None` when the header marks the
/// section as empty, without touching the codec.
pub fn unframe(
    section: &str,
    bytes: &[u8],
    header: FrameHeader,
    codec: &dyn Codec,
) -> Result<Option<Unframed>, CampaignError> {
    let fields = read_frame_fields(section, bytes, header)?;
    if fields.uncompressed_len == 0 {
        tracing::debug!(section, "compressed section is empty");
        return Ok(None);
    }
    let expected = usize::try_from(fields.uncompressed_len).map_err(|_| {
        CampaignError::malformed(
            section,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("negative uncompressed length {}", fields.uncompressed_len),
            ),
        )
    })?;

    let payload = &bytes[header.size()..];
    if fields.compressed_len as usize != payload.len() {
        tracing::debug!(
            section,
            declared = fields.compressed_len,
            actual = payload.len(),
            "compressed length field disagrees with payload size"
        );
    }

    let body = codec
        .decompress(payload, expected)
        .map_err(|source| CampaignError::DecompressionFailed {
            section: section.to_string(),
            source,
        })?;
    Ok(Some(Unframed { fields, body }))
}

/// Compresses `body` and writes it behind a header of the given shape.
pub fn frame(
    section: &str,
    body: &[u8],
    count: usize,
    header: FrameHeader,
    codec: &dyn Codec,
) -> Result<Vec<u8>, CampaignError> {
    let packed = codec
        .compress(body)
        .map_err(|source| CampaignError::DecompressionFailed {
            section: section.to_string(),
            source,
        })?;
    let widths = || -> io::Result<(i32, i32, i16)> {
        Ok((
            count_i32(packed.len(), "compressed byte")?,
            count_i32(body.len(), "uncompressed byte")?,
            count_i16(count, "record")?,
        ))
    };
    let (compressed_len, uncompressed_len, count) =
        widths().map_err(|e| CampaignError::malformed(section, e))?;

    let mut out = Vec::with_capacity(header.size() + packed.len());
    match header {
        FrameHeader::Lengths => {
            out.put_i32(compressed_len);
            out.put_i32(uncompressed_len);
        }
        FrameHeader::CountBetweenLengths => {
            out.put_i32(compressed_len);
            out.put_i16(count);
            out.put_i32(uncompressed_len);
        }
        FrameHeader::CountFirst => {
            out.put_i16(count);
            out.put_i32(uncompressed_len);
            out.put_i32(compressed_len);
        }
    }
    out.extend_from_slice(&packed);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::{CompressionError, Lzss};

    struct Refusing;

    impl Codec for Refusing {
        fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
            Ok(input.to_vec())
        }

        fn decompress(&self, _: &[u8], _: usize) -> Result<Vec<u8>, CompressionError> {
            panic!("codec must not run for empty sections");
        }
    }

    #[test]
    fn header_orders_differ_per_shape() {
        let body = b"objective".to_vec();
        let obj = frame("OBJ", &body, 3, FrameHeader::CountFirst, &Lzss).expect("frame");
        assert_eq!(&obj[..2], &3i16.to_le_bytes());
        assert_eq!(&obj[2..6], &9i32.to_le_bytes());

        let uni = frame("UNI", &body, 3, FrameHeader::CountBetweenLengths, &Lzss).expect("frame");
        assert_eq!(&uni[4..6], &3i16.to_le_bytes());
        assert_eq!(&uni[6..10], &9i32.to_le_bytes());
        assert_eq!(
            i32::from_le_bytes([uni[0], uni[1], uni[2], uni[3]]) as usize,
            uni.len() - 10
        );

        let cmp = frame("CMP", &body, 0, FrameHeader::Lengths, &Lzss).expect("frame");
        assert_eq!(&cmp[4..8], &9i32.to_le_bytes());
    }

    #[test]
    fn unframe_inverts_frame_for_every_shape() {
        let body: Vec<u8> = (0..300u32).map(|i| (i % 7) as u8).collect();
        for header in [
            FrameHeader::Lengths,
            FrameHeader::CountBetweenLengths,
            FrameHeader::CountFirst,
        ] {
            let framed = frame("TST", &body, 12, header, &Lzss).expect("frame");
            let unframed = unframe("TST", &framed, header, &Lzss)
                .expect("unframe")
                .expect("section present");
            assert_eq!(unframed.body, body);
            assert_eq!(unframed.fields.uncompressed_len, 300);
            assert_eq!(
                framed.len() - header.size(),
                unframed.fields.compressed_len as usize
            );
            if header.has_count() {
                assert_eq!(unframed.fields.count, 12);
            }
        }
    }

    #[test]
    fn zero_uncompressed_length_is_absent() {
        let mut bytes = Vec::new();
        bytes.put_i32(0);
        bytes.put_i16(0);
        bytes.put_i32(0);
        let result = unframe("OBD", &bytes, FrameHeader::CountBetweenLengths, &Refusing)
            .expect("absent section is not an error");
        assert!(result.is_none());
    }

    #[test]
    fn bad_payload_reports_decompression_failure() {
        let mut bytes = Vec::new();
        bytes.put_i32(1);
        bytes.put_i32(64);
        bytes.push(0xff);
        let err = unframe("CMP", &bytes, FrameHeader::Lengths, &Lzss).expect_err("bad payload");
        assert!(matches!(err, CampaignError::DecompressionFailed { ref section, .. } if section == "CMP"));
    }

    #[test]
    fn short_header_is_malformed() {
        let err = unframe("UNI", &[0, 0, 0], FrameHeader::CountBetweenLengths, &Lzss)
            .expect_err("short header");
        assert_eq!(err.section(), Some("UNI"));
    }
}
