//! Map free-text commodity and grade descriptions onto canonical codes.
//!
//! Both mappings are priority-ordered rule lists: the first rule that
//! returns a code wins. Rules see the trimmed text; commodity rules see it
//! lowercased.

use crate::model::{Classification, Commodity, Grade, MineralRecord};
use regex::Regex;
use std::sync::LazyLock;

/// An ASCII number with an optional fraction, e.g. "62" or "55.0".
static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("valid percent regex"));

/// A named commodity classification rule.
pub struct CommodityRule {
    pub name: &'static str,
    pub apply: fn(&str) -> Option<Commodity>,
}

/// A named grade classification rule.
pub struct GradeRule {
    pub name: &'static str,
    pub apply: fn(&str) -> Option<Grade>,
}

pub const COMMODITY_RULES: &[CommodityRule] = &[
    CommodityRule {
        name: "bauxite",
        apply: rule_bauxite,
    },
    CommodityRule {
        name: "manganese",
        apply: rule_manganese,
    },
    CommodityRule {
        name: "canonical code",
        apply: rule_commodity_code,
    },
    CommodityRule {
        name: "lumps",
        apply: rule_lumps,
    },
    CommodityRule {
        name: "fines",
        apply: rule_fines,
    },
    CommodityRule {
        name: "concentrates",
        apply: rule_concentrates,
    },
];

pub const GRADE_RULES: &[GradeRule] = &[
    GradeRule {
        name: "canonical code",
        apply: rule_grade_code,
    },
    GradeRule {
        name: "below 55",
        apply: rule_below_55,
    },
    GradeRule {
        name: "65 and above",
        apply: rule_65_and_above,
    },
    GradeRule {
        name: "first integer",
        apply: rule_first_integer,
    },
];

fn rule_bauxite(s: &str) -> Option<Commodity> {
    s.contains("bauxite").then_some(Commodity::Bauxite)
}

fn rule_manganese(s: &str) -> Option<Commodity> {
    s.contains("manganese").then_some(Commodity::Manganese)
}

fn rule_commodity_code(s: &str) -> Option<Commodity> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Commodity::from_code(c),
        _ => None,
    }
}

fn rule_lumps(s: &str) -> Option<Commodity> {
    s.contains("lump").then_some(Commodity::Lumps)
}

fn rule_fines(s: &str) -> Option<Commodity> {
    s.contains("fine").then_some(Commodity::Fines)
}

fn rule_concentrates(s: &str) -> Option<Commodity> {
    s.contains("conc").then_some(Commodity::Concentrates)
}

fn rule_grade_code(s: &str) -> Option<Grade> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Grade::from_code(c),
        _ => None,
    }
}

/// "Below 55% Fe" or "55% and below". A second number after the 55 makes it
/// a range ("55% to below 58%"), which falls through to numeric bucketing.
fn rule_below_55(s: &str) -> Option<Grade> {
    let lower = s.to_lowercase();
    let below = lower.find("below")?;
    let mut numbers = PERCENT.find_iter(&lower);
    let first = numbers.next()?;
    if whole_part(first.as_str()) != "55" {
        return None;
    }
    (below < first.start() || numbers.next().is_none()).then_some(Grade::A)
}

fn rule_65_and_above(s: &str) -> Option<Grade> {
    let lower = s.to_lowercase();
    (lower.contains("65") && lower.contains("above")).then_some(Grade::F)
}

fn rule_first_integer(s: &str) -> Option<Grade> {
    let digits = whole_part(PERCENT.find(s)?.as_str());
    // ASCII digits only: a failed parse means too long for u64
    let pct = digits.parse::<u64>().unwrap_or(u64::MAX);
    Some(Grade::from_fe_percent(pct))
}

fn whole_part(number: &str) -> &str {
    number.split('.').next().unwrap_or(number)
}

/// Classify a raw commodity description, returning the rule that matched.
pub fn classify_commodity_with_rule(raw: &str) -> Option<(&'static str, Commodity)> {
    let s = raw.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }
    COMMODITY_RULES
        .iter()
        .find_map(|rule| (rule.apply)(&s).map(|c| (rule.name, c)))
}

/// Classify a raw grade description, returning the rule that matched.
pub fn classify_grade_with_rule(raw: &str) -> Option<(&'static str, Grade)> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    GRADE_RULES
        .iter()
        .find_map(|rule| (rule.apply)(s).map(|g| (rule.name, g)))
}

pub fn classify_commodity(raw: &str) -> Option<Commodity> {
    classify_commodity_with_rule(raw).map(|(_, c)| c)
}

pub fn classify_grade(raw: &str) -> Option<Grade> {
    classify_grade_with_rule(raw).map(|(_, g)| g)
}

/// Classify a record's commodity and grade text.
pub fn classify(record: &MineralRecord) -> Classification {
    Classification {
        commodity: classify_commodity(&record.commodity),
        grade: classify_grade(&record.grade),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commodity_examples() {
        assert_eq!(classify_commodity("Lumps"), Some(Commodity::Lumps));
        assert_eq!(classify_commodity("Fine Ore"), Some(Commodity::Fines));
        assert_eq!(classify_commodity("Concentrate"), Some(Commodity::Concentrates));
        assert_eq!(classify_commodity("Bauxite Ore"), Some(Commodity::Bauxite));
        assert_eq!(classify_commodity("xyz"), None);
    }

    #[test]
    fn test_commodity_canonical_codes() {
        assert_eq!(classify_commodity("l"), Some(Commodity::Lumps));
        assert_eq!(classify_commodity(" F "), Some(Commodity::Fines));
        assert_eq!(classify_commodity("C"), Some(Commodity::Concentrates));
        assert_eq!(classify_commodity("Z"), None);
    }

    #[test]
    fn test_commodity_full_names_beat_subtypes() {
        assert_eq!(
            classify_commodity("Manganese ore fines"),
            Some(Commodity::Manganese)
        );
        assert_eq!(
            classify_commodity_with_rule("Bauxite lumps"),
            Some(("bauxite", Commodity::Bauxite))
        );
    }

    #[test]
    fn test_commodity_empty_and_unrelated() {
        assert_eq!(classify_commodity(""), None);
        assert_eq!(classify_commodity("granite"), None);
    }

    #[test]
    fn test_grade_boundaries_numeric() {
        let cases = [
            ("54", Grade::A),
            ("55", Grade::B),
            ("57", Grade::B),
            ("58", Grade::C),
            ("59", Grade::C),
            ("60", Grade::D),
            ("61", Grade::D),
            ("62", Grade::E),
            ("64", Grade::E),
            ("65", Grade::F),
        ];
        for (raw, grade) in cases {
            assert_eq!(classify_grade(raw), Some(grade), "{raw}");
        }
    }

    #[test]
    fn test_grade_codes_pass_through() {
        assert_eq!(classify_grade("D"), Some(Grade::D));
        assert_eq!(
            classify_grade_with_rule("e"),
            Some(("canonical code", Grade::E))
        );
    }

    #[test]
    fn test_grade_phrases() {
        assert_eq!(classify_grade("Below 55% Fe"), Some(Grade::A));
        assert_eq!(classify_grade("55% to below 58% Fe"), Some(Grade::B));
        assert_eq!(classify_grade("65% Fe and above"), Some(Grade::F));
        assert_eq!(classify_grade("Fe 62.5%"), Some(Grade::E));
        assert_eq!(classify_grade("60-62"), Some(Grade::D));
    }

    #[test]
    fn test_grade_trailing_below_55() {
        assert_eq!(classify_grade("55% and below"), Some(Grade::A));
        assert_eq!(classify_grade("Fe 55 & below"), Some(Grade::A));
        assert_eq!(classify_grade("Below 55.0% Fe"), Some(Grade::A));
        assert_eq!(classify_grade("55 to below 58"), Some(Grade::B));
    }

    #[test]
    fn test_grade_non_ascii_digits_unresolved() {
        assert_eq!(classify_grade("６２"), None);
        assert_eq!(classify_grade("६२"), None);
    }

    #[test]
    fn test_grade_unresolved() {
        assert_eq!(classify_grade("high"), None);
        assert_eq!(classify_grade(""), None);
    }

    #[test]
    fn test_grade_huge_integer() {
        assert_eq!(classify_grade("99999999999999999999999"), Some(Grade::F));
    }

    #[test]
    fn test_classify_record() {
        let record = MineralRecord {
            row_number: 1,
            fields: vec![],
            quantity: "100".into(),
            commodity: "Fines".into(),
            grade: "62".into(),
        };
        let c = classify(&record);
        assert_eq!(c.commodity, Some(Commodity::Fines));
        assert_eq!(c.grade, Some(Grade::E));
    }
}
