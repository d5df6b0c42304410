use std::io;

use crate::class_table::ClassTable;
use crate::compression::Codec;
use crate::error::{CampaignError, UnsupportedVariant};
use crate::framing::{FrameHeader, frame, unframe};
use crate::units::{Flight, Squadron, UnitRecord, UnitShape, UnitVariant, dispatch};
use crate::version::Version;

use super::{SectionReader, decode_body, encode_body};

const HEADER: FrameHeader = FrameHeader::CountBetweenLengths;

/// Units in roster order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitRoster {
    pub units: Vec<UnitRecord>,
    /// The first entry whose class has no record shape. Its body length is
    /// unknown, so that entry and everything after it are left undecoded.
    pub stopped_at: Option<UnsupportedVariant>,
}

impl UnitRoster {
    /// Decodes the roster, dispatching every positive type code through
    /// `class_table`.
    ///
    /// Non-positive type codes are skipped without counting towards the
    /// header count, so the loop is bounded by `max_scan` type-code reads
    /// (default: half the decompressed length, one read per two bytes).
    ///
    /// An entry the class table cannot route ends the decode with a warning;
    /// the units before it are kept and the rest of the body is skipped.
    pub fn decode(
        section: &str,
        bytes: &[u8],
        version: Version,
        codec: &dyn Codec,
        class_table: &dyn ClassTable,
        max_scan: Option<usize>,
    ) -> Result<Option<Self>, CampaignError> {
        let Some(unframed) = unframe(section, bytes, HEADER, codec)? else {
            return Ok(None);
        };
        let count = unframed.fields.count.max(0) as usize;
        let max_scan = max_scan.unwrap_or(unframed.body.len() / 2);
        let roster = decode_body(section, version, &unframed.body, |r| {
            parse_roster(r, count, max_scan, class_table)
        })?;
        tracing::debug!(section, %version, units = roster.units.len(), "unit roster decoded");
        Ok(Some(roster))
    }

    pub fn encode(
        &self,
        section: &str,
        codec: &dyn Codec,
        class_table: &dyn ClassTable,
    ) -> Result<Vec<u8>, CampaignError> {
        if let Some(stopped) = &self.stopped_at {
            return Err(CampaignError::malformed(
                section,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("roster was only decoded up to {stopped}; encoding it would lose units"),
                ),
            ));
        }
        let body = encode_body(section, |out| {
            for unit in &self.units {
                unit.emit_to_vec(out, class_table)?;
            }
            Ok(())
        })?;
        frame(section, &body, self.units.len(), HEADER, codec)
    }

    /// True when every entry in the stored roster was decoded.
    pub fn is_complete(&self) -> bool {
        self.stopped_at.is_none()
    }

    pub fn count_by_shape(&self, shape: UnitShape) -> usize {
        self.units
            .iter()
            .filter(|u| u.variant.shape() == shape)
            .count()
    }

    pub fn flights(&self) -> impl Iterator<Item = &Flight> {
        self.units.iter().filter_map(|u| match &u.variant {
            UnitVariant::Flight(flight) => Some(flight.as_ref()),
            _ => None,
        })
    }

    pub fn squadrons(&self) -> impl Iterator<Item = &Squadron> {
        self.units.iter().filter_map(|u| match &u.variant {
            UnitVariant::Squadron(squadron) => Some(squadron.as_ref()),
            _ => None,
        })
    }
}

fn parse_roster(
    r: &mut SectionReader<'_>,
    count: usize,
    max_scan: usize,
    class_table: &dyn ClassTable,
) -> io::Result<UnitRoster> {
    let mut units = Vec::with_capacity(count.min(max_scan));
    let mut decoded = 0usize;
    let mut scanned = 0usize;
    while decoded < count {
        if scanned == max_scan {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("roster scan stopped after {max_scan} type codes with {decoded} of {count} units"),
            ));
        }
        scanned += 1;

        let type_code = r.read_i16()?;
        if type_code <= 0 {
            continue;
        }
        let shape = match dispatch(type_code, class_table) {
            Ok(shape) => shape,
            Err(unsupported) => {
                let skipped = r.remaining()?;
                tracing::warn!(
                    type_code,
                    index = unsupported.index,
                    entry = ?unsupported.entry,
                    kept = decoded,
                    declared = count,
                    skipped_bytes = skipped,
                    "unit entry dropped, roster decode stopped"
                );
                r.skip(skipped)?;
                return Ok(UnitRoster {
                    units,
                    stopped_at: Some(unsupported),
                });
            }
        };
        let variant = UnitVariant::parse(shape, r)?;
        units.push(UnitRecord { type_code, variant });
        decoded += 1;
    }
    Ok(UnitRoster {
        units,
        stopped_at: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_table::{ClassEntry, Domain, TYPE_CODE_BASE, UnitClassTable, kind};
    use crate::compression::Lzss;
    use crate::units::tests::sample_unit;
    use crate::units::{Brigade, GroundUnit, TaskForce};
    use crate::writer::PutLe;

    fn table() -> UnitClassTable {
        UnitClassTable::new()
            .with(0, ClassEntry::new(Domain::Land, kind::BRIGADE))
            .with(1, ClassEntry::new(Domain::Undersea, kind::WOLFPACK))
            .with(2, ClassEntry::new(Domain::Air, 9))
    }

    fn roster() -> UnitRoster {
        UnitRoster {
            units: vec![
                UnitRecord {
                    type_code: TYPE_CODE_BASE,
                    variant: UnitVariant::Brigade(Brigade {
                        ground: GroundUnit::new(sample_unit(10)),
                        elements: vec![sample_unit(11).base.id],
                    }),
                },
                UnitRecord {
                    type_code: TYPE_CODE_BASE + 1,
                    variant: UnitVariant::TaskForce(TaskForce {
                        unit: sample_unit(12),
                        orders: 1,
                        supply: 50,
                    }),
                },
            ],
            stopped_at: None,
        }
    }

    #[test]
    fn roster_round_trip() {
        let uni = roster();
        let bytes = uni.encode("UNI", &Lzss, &table()).expect("encode");
        assert_eq!(&bytes[4..6], &2i16.to_le_bytes());
        let decoded = UnitRoster::decode("UNI", &bytes, Version(79), &Lzss, &table(), None)
            .expect("decode")
            .expect("present");
        assert_eq!(decoded, uni);
        assert_eq!(decoded.count_by_shape(UnitShape::TaskForce), 1);
    }

    #[test]
    fn non_positive_type_codes_are_skipped() {
        let uni = roster();
        let mut body = Vec::new();
        body.put_i16(0);
        body.put_i16(-4);
        for unit in &uni.units {
            unit.emit_to_vec(&mut body, &table()).expect("emit");
        }
        let bytes = frame("UNI", &body, 2, HEADER, &Lzss).expect("frame");
        let decoded = UnitRoster::decode("UNI", &bytes, Version::LATEST, &Lzss, &table(), None)
            .expect("decode")
            .expect("present");
        assert_eq!(decoded, uni);
    }

    #[test]
    fn unmapped_class_stops_the_roster_and_keeps_earlier_units() {
        let uni = roster();
        let mut body = Vec::new();
        uni.units[0].emit_to_vec(&mut body, &table()).expect("emit");
        // Index 2 is an air class with no record shape.
        body.put_i16(TYPE_CODE_BASE + 2);
        body.extend_from_slice(&[7; 40]);
        uni.units[1].emit_to_vec(&mut body, &table()).expect("emit");
        let bytes = frame("UNI", &body, 3, HEADER, &Lzss).expect("frame");

        let decoded = UnitRoster::decode("UNI", &bytes, Version::LATEST, &Lzss, &table(), None)
            .expect("decode")
            .expect("present");
        assert_eq!(decoded.units, uni.units[..1]);
        let stopped = decoded.stopped_at.expect("stopped");
        assert_eq!(stopped.type_code, TYPE_CODE_BASE + 2);
        assert_eq!(stopped.index, 2);
        assert!(!decoded.is_complete());
        assert!(decoded.encode("UNI", &Lzss, &table()).is_err());
    }

    #[test]
    fn empty_class_table_decodes_no_units_without_error() {
        let bytes = roster().encode("UNI", &Lzss, &table()).expect("encode");
        let decoded = UnitRoster::decode(
            "UNI",
            &bytes,
            Version::LATEST,
            &Lzss,
            &UnitClassTable::new(),
            None,
        )
        .expect("decode")
        .expect("present");
        assert!(decoded.units.is_empty());
        assert_eq!(decoded.stopped_at.map(|s| s.entry), Some(None));
    }

    #[test]
    fn scan_cap_stops_a_roster_of_zeros() {
        let body = vec![0u8; 64];
        let bytes = frame("UNI", &body, 1, HEADER, &Lzss).expect("frame");
        let err = UnitRoster::decode("UNI", &bytes, Version::LATEST, &Lzss, &table(), Some(8))
            .expect_err("cap reached");
        assert!(matches!(err, CampaignError::Malformed { ref section, .. } if section == "UNI"));
    }

    #[test]
    fn roster_of_zeros_without_cap_runs_out_of_data() {
        let body = vec![0u8; 64];
        let bytes = frame("UNI", &body, 1, HEADER, &Lzss).expect("frame");
        assert!(
            UnitRoster::decode("UNI", &bytes, Version::LATEST, &Lzss, &table(), None).is_err()
        );
    }

    #[test]
    fn encode_refuses_a_type_code_for_another_shape() {
        let mut uni = roster();
        uni.units[0].type_code = TYPE_CODE_BASE + 1;
        assert!(uni.encode("UNI", &Lzss, &table()).is_err());
    }
}
