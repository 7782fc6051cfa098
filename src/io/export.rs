//! CSV export for per-year simulation records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::YearRecord;

/// Column header for CSV record export.
const HEADER: &str = "year,fleet_size,recycling_efficiency,\
                       virgin_lithium_required,virgin_cobalt_required,\
                       recycled_lithium_pool,recycled_cobalt_pool,\
                       recycled_lithium_used,recycled_cobalt_used,\
                       lithium_recovered,cobalt_recovered,\
                       batteries_produced,batteries_recycled,batteries_discarded";

/// Exports year records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per year. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[YearRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes year records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[YearRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in records {
        wtr.write_record(&[
            r.year.to_string(),
            r.fleet_size.to_string(),
            format!("{:.6}", r.recycling_efficiency),
            format!("{:.4}", r.virgin_lithium_required),
            format!("{:.4}", r.virgin_cobalt_required),
            format!("{:.4}", r.recycled_lithium_pool),
            format!("{:.4}", r.recycled_cobalt_pool),
            format!("{:.4}", r.recycled_lithium_used),
            format!("{:.4}", r.recycled_cobalt_used),
            format!("{:.4}", r.lithium_recovered),
            format!("{:.4}", r.cobalt_recovered),
            r.batteries_produced.to_string(),
            r.batteries_recycled.to_string(),
            r.batteries_discarded.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(year: i32) -> YearRecord {
        YearRecord {
            year,
            fleet_size: 1000,
            recycling_efficiency: 0.6,
            virgin_lithium_required: 25.0,
            virgin_cobalt_required: 60.0,
            recycled_lithium_pool: 1.5,
            recycled_cobalt_pool: 3.6,
            recycled_lithium_used: 0.0,
            recycled_cobalt_used: 0.0,
            lithium_recovered: 1.5,
            cobalt_recovered: 3.6,
            batteries_produced: 10,
            batteries_recycled: 1,
            batteries_discarded: 9,
        }
    }

    #[test]
    fn header_lists_every_column() {
        let mut buf = Vec::new();
        write_csv(&[make_record(2024)], &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let first_line = output.as_deref().unwrap_or("").lines().next().unwrap_or("");
        assert!(first_line.starts_with("year,fleet_size,recycling_efficiency,"));
        assert_eq!(first_line.split(',').count(), 14);
    }

    #[test]
    fn row_count_matches_year_count() {
        let records: Vec<YearRecord> = (2024..2031).map(make_record).collect();
        let mut buf = Vec::new();
        write_csv(&records, &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        // 1 header + 7 data rows
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn rows_parse_back() {
        let records: Vec<YearRecord> = (2024..2027).map(make_record).collect();
        let mut buf = Vec::new();
        write_csv(&records, &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let mut years = Vec::new();
        for record in rdr.records() {
            let rec = record.ok();
            assert!(rec.is_some(), "every row should parse");
            let rec = rec.unwrap_or_default();
            years.push(rec[0].parse::<i32>().unwrap_or_default());
            for i in 2..11 {
                let val: Result<f64, _> = rec[i].parse();
                assert!(val.is_ok(), "column {i} should parse as f64");
            }
        }
        assert_eq!(years, vec![2024, 2025, 2026]);
    }
}
