use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Commodity sub-type as published in the gazette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Commodity {
    #[serde(rename = "L")]
    Lumps,
    #[serde(rename = "F")]
    Fines,
    #[serde(rename = "C")]
    Concentrates,
    #[serde(rename = "B")]
    Bauxite,
    #[serde(rename = "M")]
    Manganese,
}

impl Commodity {
    pub const ALL: [Commodity; 5] = [
        Commodity::Lumps,
        Commodity::Fines,
        Commodity::Concentrates,
        Commodity::Bauxite,
        Commodity::Manganese,
    ];

    /// Single-letter canonical code.
    pub fn code(self) -> char {
        match self {
            Commodity::Lumps => 'L',
            Commodity::Fines => 'F',
            Commodity::Concentrates => 'C',
            Commodity::Bauxite => 'B',
            Commodity::Manganese => 'M',
        }
    }

    pub fn from_code(c: char) -> Option<Commodity> {
        Commodity::ALL
            .into_iter()
            .find(|k| k.code() == c.to_ascii_uppercase())
    }

    /// Full descriptive label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Commodity::Lumps => "Iron Ore (Lumps)",
            Commodity::Fines => "Iron Ore (Fines)",
            Commodity::Concentrates => "Concentrates",
            Commodity::Bauxite => "Bauxite",
            Commodity::Manganese => "Manganese",
        }
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Iron-content grade bucket, ordered by ascending Fe percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Grade {
    pub const ALL: [Grade; 6] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::E, Grade::F];

    /// Bucket an iron-content percentage.
    ///
    /// Boundaries: <55, [55,58), [58,60), [60,62), [62,65), >=65.
    pub fn from_fe_percent(pct: u64) -> Grade {
        match pct {
            0..=54 => Grade::A,
            55..=57 => Grade::B,
            58..=59 => Grade::C,
            60..=61 => Grade::D,
            62..=64 => Grade::E,
            _ => Grade::F,
        }
    }

    pub fn code(self) -> char {
        match self {
            Grade::A => 'A',
            Grade::B => 'B',
            Grade::C => 'C',
            Grade::D => 'D',
            Grade::E => 'E',
            Grade::F => 'F',
        }
    }

    pub fn from_code(c: char) -> Option<Grade> {
        Grade::ALL
            .into_iter()
            .find(|g| g.code() == c.to_ascii_uppercase())
    }

    /// Lower and upper (exclusive) Fe percentage bounds. `None` means open-ended.
    pub fn bounds(self) -> (Option<u64>, Option<u64>) {
        match self {
            Grade::A => (None, Some(55)),
            Grade::B => (Some(55), Some(58)),
            Grade::C => (Some(58), Some(60)),
            Grade::D => (Some(60), Some(62)),
            Grade::E => (Some(62), Some(65)),
            Grade::F => (Some(65), None),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::A => "Below 55% Fe",
            Grade::B => "55% to below 58% Fe",
            Grade::C => "58% to below 60% Fe",
            Grade::D => "60% to below 62% Fe",
            Grade::E => "62% to below 65% Fe",
            Grade::F => "65% Fe and above",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Reference prices keyed by commodity and grade.
///
/// A cell is either a parsed price or absent. The first value recorded for a
/// cell wins; later matches for the same cell are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable(BTreeMap<Commodity, BTreeMap<Grade, Decimal>>);

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a price unless the cell is already set. Returns true if recorded.
    pub fn insert_if_absent(&mut self, commodity: Commodity, grade: Grade, price: Decimal) -> bool {
        let grades = self.0.entry(commodity).or_default();
        if grades.contains_key(&grade) {
            return false;
        }
        grades.insert(grade, price);
        true
    }

    pub fn get(&self, commodity: Commodity, grade: Grade) -> Option<Decimal> {
        self.0.get(&commodity)?.get(&grade).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|g| g.is_empty())
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.0.values().map(|g| g.len()).sum()
    }

    /// Iterate populated cells in commodity, then grade order.
    pub fn cells(&self) -> impl Iterator<Item = (Commodity, Grade, Decimal)> + '_ {
        self.0
            .iter()
            .flat_map(|(c, grades)| grades.iter().map(move |(g, p)| (*c, *g, *p)))
    }
}

/// A named input column value, kept verbatim for the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub header: String,
    pub value: String,
}

/// One row of the mineral dispatch record set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineralRecord {
    /// 1-based row number in the source sheet.
    pub row_number: usize,
    /// All columns of the row, in source order.
    pub fields: Vec<Field>,
    pub quantity: String,
    pub commodity: String,
    pub grade: String,
}

/// Canonical codes derived from a record's free text. `None` means unresolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub commodity: Option<Commodity>,
    pub grade: Option<Grade>,
}
