use std::io::Write;

use rust_decimal::Decimal;

use crate::assess::outcome::{AssessedRecord, Assessment};
use crate::error::FerroError;

/// Columns appended after the input record's own columns.
pub const ASSESSMENT_COLUMNS: [&str; 7] = [
    "Standardized Ore",
    "Standardized Grade",
    "IBM Rate",
    "Base Value",
    "Royalty Payable",
    "DMF Payable",
    "Calculation Status",
];

/// Write the assessment as CSV: every input column verbatim, then the
/// assessment columns. Amounts are rounded to two decimal places.
pub fn write_csv<W: Write>(assessment: &Assessment, writer: W) -> Result<(), FerroError> {
    let mut out = ::csv::Writer::from_writer(writer);

    let header: Vec<&str> = assessment
        .headers
        .iter()
        .map(String::as_str)
        .chain(ASSESSMENT_COLUMNS)
        .collect();
    out.write_record(&header)?;

    for assessed in &assessment.records {
        out.write_record(csv_row(assessed, assessment.headers.len()))?;
    }
    out.flush()?;
    Ok(())
}

fn csv_row(assessed: &AssessedRecord, width: usize) -> Vec<String> {
    let mut row: Vec<String> = assessed
        .record
        .fields
        .iter()
        .map(|f| f.value.clone())
        .collect();
    row.resize(width, String::new());

    let levy = &assessed.levy;
    row.extend([
        assessed.commodity_label.clone(),
        assessed.grade_label.clone(),
        money(levy.price),
        money(levy.base_value),
        money(levy.royalty),
        money(levy.development_fee),
        levy.status.message().to_string(),
    ]);
    row
}

/// Format an amount with exactly two decimal places.
pub fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Pretty JSON rendering of any serializable result.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, FerroError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assess::engine::{assess_records, LevyRates};
    use crate::model::{Commodity, Field, Grade, MineralRecord, PriceTable};
    use rust_decimal_macros::dec;

    fn assessment() -> Assessment {
        let headers = vec![
            "Challan".to_string(),
            "Type of Ore".to_string(),
            "Grade".to_string(),
            "Quantity".to_string(),
        ];
        let rows = [("CH-1", "Fines", "62", "100"), ("CH-2", "Sand", "62", "3")];
        let records: Vec<MineralRecord> = rows
            .iter()
            .enumerate()
            .map(|(i, (ch, ore, grade, qty))| MineralRecord {
                row_number: i + 1,
                fields: headers
                    .iter()
                    .zip([ch, ore, grade, qty])
                    .map(|(h, v)| Field {
                        header: h.clone(),
                        value: v.to_string(),
                    })
                    .collect(),
                quantity: qty.to_string(),
                commodity: ore.to_string(),
                grade: grade.to_string(),
            })
            .collect();

        let mut table = PriceTable::new();
        table.insert_if_absent(Commodity::Fines, Grade::E, dec!(650));
        let assessed = assess_records(&records, &table, &LevyRates::default());

        Assessment {
            jurisdiction: "Goa".into(),
            price_source: "gazette-parser".into(),
            price_table: table,
            headers,
            records: assessed,
        }
    }

    #[test]
    fn test_csv_layout() {
        let mut buf = Vec::new();
        write_csv(&assessment(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Challan,Type of Ore,Grade,Quantity,Standardized Ore,Standardized Grade,\
             IBM Rate,Base Value,Royalty Payable,DMF Payable,Calculation Status"
        );
        assert_eq!(
            lines[1],
            "CH-1,Fines,62,100,Iron Ore (Fines),62% to below 65% Fe,\
             650.00,65000.00,9750.00,2925.00,Success"
        );
        assert_eq!(
            lines[2],
            "CH-2,Sand,62,3,Unknown,62% to below 65% Fe,0.00,0.00,0.00,0.00,Error: Invalid Ore Type"
        );
    }

    #[test]
    fn test_money_rounds_to_two_places() {
        assert_eq!(money(dec!(1.005)), "1.00");
        assert_eq!(money(dec!(2925.0000)), "2925.00");
        assert_eq!(money(dec!(650)), "650.00");
        assert_eq!(money(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_json_contains_status() {
        let json = to_json(&assessment()).unwrap();
        assert!(json.contains("\"invalid_commodity\""));
        assert!(json.contains("\"jurisdiction\": \"Goa\""));
    }
}
