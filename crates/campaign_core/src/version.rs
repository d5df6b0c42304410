use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};

/// Campaign layout version taken from the VER section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(pub i32);

impl Version {
    /// Used when a container carries no VER section.
    pub const LATEST: Version = Version(i32::MAX);

    pub fn parse(bytes: &[u8]) -> io::Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        text.trim()
            .parse::<i32>()
            .map(Version)
            .map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("invalid version text {text:?}: {e}"),
                )
            })
    }

    pub fn emit_to_vec(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.0.to_string().as_bytes());
    }

    pub fn is_latest(&self) -> bool {
        *self == Self::LATEST
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::LATEST
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_latest() {
            f.write_str("latest")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
