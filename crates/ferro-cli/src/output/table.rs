use ferro_core::assess::outcome::Assessment;
use ferro_core::model::{Commodity, Grade};
use ferro_core::output::money;
use ferro_core::parsing::ParsedPrices;

pub fn print_assessment(assessment: &Assessment) {
    println!(
        "=== {} (prices from {}) ===\n",
        assessment.jurisdiction, assessment.price_source
    );

    if assessment.records.is_empty() {
        println!("  No records.\n");
        return;
    }

    let ore_width = assessment
        .records
        .iter()
        .map(|r| r.commodity_label.len())
        .max()
        .unwrap_or(10)
        .max("Ore".len());
    let grade_width = assessment
        .records
        .iter()
        .map(|r| r.grade_label.len())
        .max()
        .unwrap_or(10)
        .max("Grade".len());

    println!(
        "  {:>5}  {:<ow$}  {:<gw$}  {:>12}  {:>10}  {:>14}  {:>12}  {:>12}  Status",
        "Row",
        "Ore",
        "Grade",
        "Quantity",
        "Rate",
        "Base value",
        "Royalty",
        "DMF",
        ow = ore_width,
        gw = grade_width
    );
    println!(
        "  {}",
        "-".repeat(5 + ore_width + grade_width + 12 + 10 + 14 + 12 + 12 + 8 * 2 + 8)
    );

    for r in &assessment.records {
        let marker = if r.levy.status.is_success() { "" } else { "  <-" };
        println!(
            "  {:>5}  {:<ow$}  {:<gw$}  {:>12}  {:>10}  {:>14}  {:>12}  {:>12}  {}{}",
            r.record.row_number,
            r.commodity_label,
            r.grade_label,
            r.quantity.to_string(),
            money(r.levy.price),
            money(r.levy.base_value),
            money(r.levy.royalty),
            money(r.levy.development_fee),
            r.levy.status,
            marker,
            ow = ore_width,
            gw = grade_width
        );
    }
    println!();

    println!("  Total royalty:          {}", money(assessment.total_royalty()));
    println!(
        "  Total development fee:  {}",
        money(assessment.total_development_fee())
    );

    let flagged = assessment.flagged().count();
    if flagged > 0 {
        println!("  Records needing review: {flagged}");
    }
    println!();
}

/// Render an extracted price table as a commodity by grade grid.
pub fn format_prices(parsed: &ParsedPrices, jurisdiction: &str) -> String {
    let mut out = String::new();

    if !parsed.section_found() {
        out.push_str(&format!(
            "Jurisdiction '{jurisdiction}' not found in gazette; no prices extracted.\n"
        ));
        return out;
    }

    out.push_str(&format!(
        "=== {} ({} section line(s), {} price(s)) ===\n\n",
        jurisdiction,
        parsed.section_lines,
        parsed.table.len()
    ));

    let commodities: Vec<Commodity> = Commodity::ALL
        .into_iter()
        .filter(|c| Grade::ALL.iter().any(|g| parsed.table.get(*c, *g).is_some()))
        .collect();

    if commodities.is_empty() {
        out.push_str("  No price rows recognised.\n");
    } else {
        let label_width = Grade::ALL
            .iter()
            .map(|g| g.label().len())
            .max()
            .unwrap_or(20);

        out.push_str(&format!("  {:<w$}", "Grade", w = label_width));
        for c in &commodities {
            out.push_str(&format!("  {:>18}", c.label()));
        }
        out.push('\n');
        out.push_str(&format!(
            "  {}\n",
            "-".repeat(label_width + commodities.len() * 20)
        ));

        for grade in Grade::ALL {
            out.push_str(&format!("  {:<w$}", grade.label(), w = label_width));
            for c in &commodities {
                let cell = match parsed.table.get(*c, grade) {
                    Some(price) if parsed.na_cells.contains(&(*c, grade)) => {
                        format!("{} (NA)", money(price))
                    }
                    Some(price) => money(price),
                    None => "-".into(),
                };
                out.push_str(&format!("  {:>18}", cell));
            }
            out.push('\n');
        }
    }

    if !parsed.skipped_lines.is_empty() {
        out.push_str(&format!(
            "\n  {} line(s) skipped:\n",
            parsed.skipped_lines.len()
        ));
        for s in &parsed.skipped_lines {
            out.push_str(&format!("    '{}': {}\n", s.line_text, s.reason));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferro_core::parsing::prices::parse_price_table;

    #[test]
    fn test_format_prices_grid() {
        let lines: Vec<String> = ["Lumps", "60% to below 62% Fe 3,200", "Fines", "Below 55% Fe NA"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let parsed = parse_price_table(&lines);
        let text = format_prices(&parsed, "Goa");

        assert!(text.contains("=== Goa (4 section line(s), 2 price(s)) ==="));
        assert!(text.contains("Iron Ore (Lumps)"));
        assert!(text.contains("3200.00"));
        assert!(text.contains("0.00 (NA)"));
    }

    #[test]
    fn test_format_prices_missing_section() {
        let text = format_prices(&ParsedPrices::default(), "Goa");
        assert!(text.contains("not found"));
    }
}
