use regex::Regex;

/// Isolate the lines belonging to one jurisdiction.
///
/// The span starts right after the first occurrence of `jurisdiction`
/// (whole-word, case-insensitive; plain substring only if no whole-word
/// occurrence exists) and ends at the first whole-word occurrence of any
/// other name in `known`. Without such a boundary the span is cut after
/// `window_chars` characters. An absent jurisdiction yields an empty span.
pub fn locate_section(
    lines: &[String],
    jurisdiction: &str,
    known: &[String],
    window_chars: usize,
) -> Vec<String> {
    let Some((line_idx, match_end)) = find_start(lines, jurisdiction) else {
        log::warn!("jurisdiction '{}' not found in gazette text", jurisdiction);
        return Vec::new();
    };

    let head = lines[line_idx][match_end..].trim();
    let pieces = std::iter::once(head).chain(lines[line_idx + 1..].iter().map(|l| l.trim()));

    let boundary = boundary_regex(jurisdiction, known);
    let mut span: Vec<String> = Vec::new();
    let mut bounded = false;

    for piece in pieces {
        if let Some(m) = boundary.as_ref().and_then(|re| re.find(piece)) {
            let before = piece[..m.start()].trim();
            if !before.is_empty() {
                span.push(before.to_string());
            }
            log::debug!("section for '{}' ends at '{}'", jurisdiction, m.as_str());
            bounded = true;
            break;
        }
        if !piece.is_empty() {
            span.push(piece.to_string());
        }
    }

    if !bounded {
        log::debug!(
            "no jurisdiction follows '{}', applying {}-character window",
            jurisdiction,
            window_chars
        );
        span = apply_window(span, window_chars);
    }

    log::info!("section for '{}': {} line(s)", jurisdiction, span.len());
    span
}

/// Locate the first occurrence of `name`, returning (line index, byte offset
/// just past the match).
fn find_start(lines: &[String], name: &str) -> Option<(usize, usize)> {
    let pattern = name_pattern(name)?;
    let strict = Regex::new(&format!(r"(?i)\b{pattern}\b")).ok()?;
    let loose = Regex::new(&format!(r"(?i){pattern}")).ok()?;

    [strict, loose].iter().find_map(|re| {
        lines
            .iter()
            .enumerate()
            .find_map(|(i, line)| re.find(line).map(|m| (i, m.end())))
    })
}

fn boundary_regex(jurisdiction: &str, known: &[String]) -> Option<Regex> {
    let others: Vec<String> = known
        .iter()
        .filter(|k| !k.trim().eq_ignore_ascii_case(jurisdiction.trim()))
        .filter_map(|k| name_pattern(k))
        .collect();
    if others.is_empty() {
        return None;
    }
    Regex::new(&format!(r"(?i)\b(?:{})\b", others.join("|"))).ok()
}

/// Escape a jurisdiction name, letting its internal spaces match any run of
/// whitespace.
fn name_pattern(name: &str) -> Option<String> {
    let words: Vec<String> = name.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(r"\s+"))
    }
}

fn apply_window(span: Vec<String>, window_chars: usize) -> Vec<String> {
    let mut remaining = window_chars;
    let mut out = Vec::new();

    for line in span {
        if remaining == 0 {
            break;
        }
        let len = line.chars().count();
        if len <= remaining {
            remaining -= len;
            // the line break counts toward the window
            remaining = remaining.saturating_sub(1);
            out.push(line);
        } else {
            out.push(line.chars().take(remaining).collect());
            break;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn known() -> Vec<String> {
        lines(&["Chhattisgarh", "Goa", "Jharkhand", "Karnataka", "Tamil Nadu"])
    }

    #[test]
    fn test_section_bounded_by_next_jurisdiction() {
        let text = lines(&[
            "Chhattisgarh",
            "Lumps 60-62 4,000",
            "Goa",
            "Lumps",
            "Below 55% Fe 1,500",
            "Jharkhand",
            "Lumps 60-62 3,900",
        ]);
        let span = locate_section(&text, "Goa", &known(), 4000);
        assert_eq!(span, lines(&["Lumps", "Below 55% Fe 1,500"]));
    }

    #[test]
    fn test_section_starts_mid_line_and_ends_mid_line() {
        let text = lines(&["State: Goa Fines", "62-65 650 Karnataka Fines 62-65 700"]);
        let span = locate_section(&text, "goa", &known(), 4000);
        assert_eq!(span, lines(&["Fines", "62-65 650"]));
    }

    #[test]
    fn test_whole_word_preferred_over_substring() {
        let text = lines(&["Goan Mining Association", "Goa", "Fines"]);
        let span = locate_section(&text, "Goa", &known(), 4000);
        assert_eq!(span, lines(&["Fines"]));
    }

    #[test]
    fn test_substring_fallback() {
        let text = lines(&["GOASTATE", "Fines 62-65 650"]);
        let span = locate_section(&text, "Goa", &known(), 4000);
        assert_eq!(span, lines(&["STATE", "Fines 62-65 650"]));
    }

    #[test]
    fn test_multi_word_boundary_tolerates_spacing() {
        let text = lines(&["Goa", "Lumps", "Tamil   Nadu", "Lumps"]);
        let span = locate_section(&text, "Goa", &known(), 4000);
        assert_eq!(span, lines(&["Lumps"]));
    }

    #[test]
    fn test_missing_jurisdiction_yields_empty_span() {
        let text = lines(&["Karnataka", "Lumps 60-62 4,000"]);
        assert!(locate_section(&text, "Goa", &known(), 4000).is_empty());
    }

    #[test]
    fn test_window_applies_without_boundary() {
        let text = lines(&["Goa", "aaaa", "bbbb", "cccc"]);
        let span = locate_section(&text, "Goa", &[], 7);
        assert_eq!(span, lines(&["aaaa", "bb"]));
    }

    #[test]
    fn test_window_ignored_when_bounded() {
        let text = lines(&["Goa", "aaaa", "bbbb", "Karnataka"]);
        let span = locate_section(&text, "Goa", &known(), 3);
        assert_eq!(span, lines(&["aaaa", "bbbb"]));
    }
}
