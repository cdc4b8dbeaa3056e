//! Price table extraction from an isolated jurisdiction section.
//!
//! The section is scanned line by line with a single piece of state: the
//! commodity sub-type whose block is currently open. Grade rows are
//! recognised by the Fe percentage boundaries they mention, and the price is
//! the first number after the grade phrase, on the same line or wrapped onto
//! the next one.

use crate::model::{Commodity, Grade, PriceTable};
use crate::parsing::values::{is_bare_number, parse_amount, NA_MARKER, NUMBER};
use crate::parsing::{ParsedPrices, SkippedLine};
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

static FOREIGN_COMMODITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:bauxite|manganese|chromite)\b").expect("valid foreign commodity regex")
});

static SUBTYPES: LazyLock<[(Commodity, Regex); 3]> = LazyLock::new(|| {
    [
        (
            Commodity::Lumps,
            Regex::new(r"(?i)\blumps?\b").expect("valid lumps regex"),
        ),
        (
            Commodity::Fines,
            Regex::new(r"(?i)\bfines?\b").expect("valid fines regex"),
        ),
        (
            Commodity::Concentrates,
            Regex::new(r"(?i)\bconc(?:entrates?)?\b").expect("valid concentrates regex"),
        ),
    ]
});

static BELOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)below|less\s+than|<|upto|up\s+to").expect("valid regex"));

static ABOVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)above|over|more|>|\+").expect("valid regex"));

/// Fe percentages that delimit grade buckets.
const BOUNDARIES: [u64; 5] = [55, 58, 60, 62, 65];

/// Context change signalled by a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContextChange {
    /// A target sub-type block opens.
    Open(Commodity),
    /// A block for an unrelated commodity opens; grade rows are ignored until
    /// the next target sub-type.
    Close,
}

/// Parse a section's lines into a price table.
///
/// Pure: identical input always yields an identical result.
pub fn parse_price_table(lines: &[String]) -> ParsedPrices {
    let mut parsed = ParsedPrices {
        section_lines: lines.len(),
        ..Default::default()
    };
    let mut current: Option<Commodity> = None;

    for (i, line) in lines.iter().enumerate() {
        match detect_context(line) {
            Some(ContextChange::Open(c)) => {
                if current != Some(c) {
                    log::debug!("commodity context -> {:?} at '{}'", c, line.trim());
                }
                current = Some(c);
            }
            Some(ContextChange::Close) => {
                if current.is_some() {
                    log::debug!("commodity context cleared at '{}'", line.trim());
                }
                current = None;
            }
            None => {}
        }

        let Some(commodity) = current else {
            continue;
        };
        let Some((grade, phrase_end)) = match_grade(line) else {
            continue;
        };

        let next = lines.get(i + 1).map(|s| s.as_str());
        match find_price(&line[phrase_end..], next) {
            Some(Cell::Price(price)) => record(&mut parsed, commodity, grade, price, false, line),
            Some(Cell::NotAvailable) => {
                record(&mut parsed, commodity, grade, Decimal::ZERO, true, line)
            }
            None => {
                log::debug!("grade row without price: '{}'", line.trim());
                parsed.skipped_lines.push(SkippedLine {
                    line_text: line.trim().to_string(),
                    reason: format!("{:?}/{:?} grade row has no price", commodity, grade),
                });
            }
        }
    }

    parsed
}

fn record(
    parsed: &mut ParsedPrices,
    commodity: Commodity,
    grade: Grade,
    price: Decimal,
    not_available: bool,
    line: &str,
) {
    if parsed.table.insert_if_absent(commodity, grade, price) {
        log::debug!("price {:?}/{:?} = {}", commodity, grade, price);
        if not_available {
            parsed.na_cells.push((commodity, grade));
        }
    } else {
        parsed.skipped_lines.push(SkippedLine {
            line_text: line.trim().to_string(),
            reason: format!("{:?}/{:?} already set, later match ignored", commodity, grade),
        });
    }
}

fn detect_context(line: &str) -> Option<ContextChange> {
    if FOREIGN_COMMODITY.is_match(line) {
        return Some(ContextChange::Close);
    }
    SUBTYPES
        .iter()
        .filter_map(|(c, re)| re.find(line).map(|m| (m.start(), *c)))
        .min_by_key(|(start, _)| *start)
        .map(|(_, c)| ContextChange::Open(c))
}

/// An integer Fe boundary mentioned on a line, with its byte range.
#[derive(Debug, Clone, Copy)]
struct BoundaryToken {
    value: u64,
    start: usize,
    end: usize,
}

fn boundary_tokens(line: &str) -> Vec<BoundaryToken> {
    NUMBER
        .find_iter(line)
        .filter_map(|m| {
            // "58.00" is still the 58 boundary
            let (whole, fraction) = m.as_str().split_once('.').unwrap_or((m.as_str(), ""));
            if !fraction.bytes().all(|b| b == b'0') {
                return None;
            }
            let value: u64 = whole.parse().ok()?;
            BOUNDARIES.contains(&value).then_some(BoundaryToken {
                value,
                start: m.start(),
                end: m.end(),
            })
        })
        .collect()
}

/// Recognise a grade row. Returns the grade and the byte offset where the
/// grade phrase ends.
///
/// Two-number ranges are tested before the open-ended buckets so that
/// "55% to below 58%" is not read as "below 55".
fn match_grade(line: &str) -> Option<(Grade, usize)> {
    let tokens = boundary_tokens(line);
    let first = *tokens.first()?;
    let prefix = &line[..first.start];

    if let Some(second) = tokens.get(1) {
        let between = &line[first.end..second.start];
        if !BELOW.is_match(prefix) && !ABOVE.is_match(between) {
            if let Some(grade) = range_grade(first.value, second.value) {
                return Some((grade, second.end));
            }
        }
    }

    if first.value == 55 && BELOW.is_match(prefix) {
        return Some((Grade::A, first.end));
    }
    if first.value == 55 && BELOW.is_match(&line[first.end..]) && tokens.len() == 1 {
        // "55% and below"
        let end = BELOW
            .find(&line[first.end..])
            .map(|m| first.end + m.end())
            .unwrap_or(first.end);
        return Some((Grade::A, end));
    }

    if first.value == 65 {
        if ABOVE.is_match(prefix) {
            return Some((Grade::F, first.end));
        }
        if let Some(m) = ABOVE.find(&line[first.end..]) {
            return Some((Grade::F, first.end + m.end()));
        }
    }

    None
}

fn range_grade(a: u64, b: u64) -> Option<Grade> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    Grade::ALL
        .into_iter()
        .find(|g| g.bounds() == (Some(lo), Some(hi)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Price(Decimal),
    NotAvailable,
}

/// Find the price following a grade phrase.
///
/// The first price-shaped number or NA marker in `rest` decides. Failing
/// that, a wrapped continuation line is consulted, unless it is a grade row
/// of its own.
fn find_price(rest: &str, next_line: Option<&str>) -> Option<Cell> {
    if let Some(cell) = first_cell(rest) {
        return Some(cell);
    }

    let next = next_line?.trim();
    if match_grade(next).is_some() {
        return None;
    }
    if is_bare_number(next) {
        return parse_amount(next).ok().map(Cell::Price);
    }
    if NA_MARKER.is_match(next) && NUMBER.find(next).is_none() {
        return Some(Cell::NotAvailable);
    }
    None
}

fn first_cell(rest: &str) -> Option<Cell> {
    let number = NUMBER
        .find_iter(rest)
        .find(|m| !rest[m.end()..].trim_start().starts_with('%'));
    let na = NA_MARKER.find(rest);

    match (number, na) {
        (Some(n), Some(a)) if a.start() < n.start() => Some(Cell::NotAvailable),
        (Some(n), _) => parse_amount(n.as_str()).ok().map(Cell::Price),
        (None, Some(_)) => Some(Cell::NotAvailable),
        (None, None) => None,
    }
}
