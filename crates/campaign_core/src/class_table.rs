use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit kind codes as stored in class table entries. Each domain numbers its
/// kinds independently.
pub mod kind {
    pub const FLIGHT: i32 = 1;
    pub const SQUADRON: i32 = 2;
    pub const PACKAGE: i32 = 3;

    pub const BRIGADE: i32 = 1;
    pub const BATTALION: i32 = 2;

    pub const TASKFORCE: i32 = 1;

    pub const WOLFPACK: i32 = 1;
}

/// Type codes stored in the unit roster are offset from the class index.
pub const TYPE_CODE_BASE: i16 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Abstract,
    Air,
    Land,
    Sea,
    Space,
    Underground,
    Undersea,
    Unknown(u8),
}

impl Domain {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Abstract,
            1 => Self::Air,
            2 => Self::Land,
            3 => Self::Sea,
            4 => Self::Space,
            5 => Self::Underground,
            6 => Self::Undersea,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(&self) -> u8 {
        match *self {
            Self::Abstract => 0,
            Self::Air => 1,
            Self::Land => 2,
            Self::Sea => 3,
            Self::Space => 4,
            Self::Underground => 5,
            Self::Undersea => 6,
            Self::Unknown(other) => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Abstract => "Abstract",
            Self::Air => "Air",
            Self::Land => "Land",
            Self::Sea => "Sea",
            Self::Space => "Space",
            Self::Underground => "Underground",
            Self::Undersea => "Undersea",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unknown(v) => write!(f, "Unknown ({})", v),
            _ => f.write_str(self.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassEntry {
    pub domain: Domain,
    pub kind: i32,
}

impl ClassEntry {
    pub const fn new(domain: Domain, kind: i32) -> Self {
        Self { domain, kind }
    }
}

/// Classification of unit type codes, owned by the caller.
pub trait ClassTable {
    fn lookup(&self, index: usize) -> Option<ClassEntry>;
}

impl<F> ClassTable for F
where
    F: Fn(usize) -> Option<ClassEntry>,
{
    fn lookup(&self, index: usize) -> Option<ClassEntry> {
        self(index)
    }
}

/// Dense class table keyed by class index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "ClassTableFile")]
pub struct UnitClassTable {
    entries: Vec<Option<ClassEntry>>,
}

impl UnitClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize, entry: ClassEntry) {
        if self.entries.len() <= index {
            self.entries.resize(index + 1, None);
        }
        self.entries[index] = Some(entry);
    }

    pub fn with(mut self, index: usize, entry: ClassEntry) -> Self {
        self.insert(index, entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ClassTable for UnitClassTable {
    fn lookup(&self, index: usize) -> Option<ClassEntry> {
        self.entries.get(index).copied().flatten()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassTableFile {
    entries: Vec<ClassTableRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassTableRecord {
    index: usize,
    domain: Domain,
    kind: KindSpec,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KindSpec {
    Raw(i32),
    Named(KindName),
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum KindName {
    Flight,
    Squadron,
    Package,
    Brigade,
    Battalion,
    #[serde(alias = "task_force")]
    Taskforce,
    Wolfpack,
}

impl KindSpec {
    fn raw(&self) -> i32 {
        match self {
            Self::Raw(raw) => *raw,
            Self::Named(KindName::Flight) => kind::FLIGHT,
            Self::Named(KindName::Squadron) => kind::SQUADRON,
            Self::Named(KindName::Package) => kind::PACKAGE,
            Self::Named(KindName::Brigade) => kind::BRIGADE,
            Self::Named(KindName::Battalion) => kind::BATTALION,
            Self::Named(KindName::Taskforce) => kind::TASKFORCE,
            Self::Named(KindName::Wolfpack) => kind::WOLFPACK,
        }
    }
}

impl From<ClassTableFile> for UnitClassTable {
    fn from(file: ClassTableFile) -> Self {
        let mut table = UnitClassTable::new();
        for record in file.entries {
            table.insert(record.index, ClassEntry::new(record.domain, record.kind.raw()));
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_table_lookup() {
        let table = UnitClassTable::new().with(5, ClassEntry::new(Domain::Sea, kind::TASKFORCE));
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.lookup(5),
            Some(ClassEntry::new(Domain::Sea, kind::TASKFORCE))
        );
        assert_eq!(table.lookup(4), None);
        assert_eq!(table.lookup(500), None);
    }

    #[test]
    fn closures_act_as_class_tables() {
        let table = |index: usize| (index == 0).then_some(ClassEntry::new(Domain::Air, kind::FLIGHT));
        assert!(table.lookup(0).is_some());
        assert!(table.lookup(1).is_none());
    }

    #[test]
    fn domain_raw_values_round_trip() {
        for raw in 0..=8u8 {
            assert_eq!(Domain::from_raw(raw).raw(), raw);
        }
        assert_eq!(Domain::from_raw(9).to_string(), "Unknown (9)");
    }
}
