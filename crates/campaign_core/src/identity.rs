use std::fmt;

use serde::{Deserialize, Serialize};

/// Composite key naming a campaign entity: the entity number plus the
/// session that created it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: u32,
    pub creator: u32,
}

impl Identity {
    pub const ZERO: Identity = Identity { id: 0, creator: 0 };

    pub const fn new(id: u32, creator: u32) -> Self {
        Self { id, creator }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.creator, self.id)
    }
}
