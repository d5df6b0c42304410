use std::io::{self, Read, Seek};

use crate::reader::LittleEndianReader;
use crate::writer::{PutLe, count_i16};

/// A news event shown in the campaign event lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventNode {
    pub x: i16,
    pub y: i16,
    pub time: u32,
    pub flags: u8,
    pub team: u8,
    pub text: String,
}

impl EventNode {
    pub fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        let x = r.read_i16()?;
        let y = r.read_i16()?;
        let time = r.read_u32()?;
        let flags = r.read_u8()?;
        let team = r.read_u8()?;
        r.skip(2)?;
        // In-memory text and UI pointers, meaningless on disk.
        r.skip(8)?;
        let text_size = r.read_i16()?;
        let text_size = usize::try_from(text_size).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("negative event text size {text_size}"),
            )
        })?;
        let text = r.read_fixed_string(text_size)?;
        Ok(Self {
            x,
            y,
            time,
            flags,
            team,
            text,
        })
    }

    pub fn emit_to_vec(&self, out: &mut Vec<u8>) -> io::Result<()> {
        out.put_i16(self.x);
        out.put_i16(self.y);
        out.put_u32(self.time);
        out.put_u8(self.flags);
        out.put_u8(self.team);
        out.put_zeros(2);
        out.put_zeros(8);
        if self.text.is_empty() {
            out.put_i16(0);
        } else {
            let len = self.text.chars().count() + 1;
            out.put_i16(count_i16(len, "event text byte")?);
            out.put_fixed_string(&self.text, len);
        }
        Ok(())
    }
}

pub fn parse_event_list<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> io::Result<Vec<EventNode>> {
    let count = r.read_i16()?;
    r.read_vec(count.max(0) as usize, EventNode::parse)
}

pub fn emit_event_list(events: &[EventNode], out: &mut Vec<u8>) -> io::Result<()> {
    out.put_i16(count_i16(events.len(), "event")?);
    for event in events {
        event.emit_to_vec(out)?;
    }
    Ok(())
}
