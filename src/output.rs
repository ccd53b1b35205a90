use crate::error::Result;
use crate::types::PriceTable;
use serde::Serialize;
use std::path::Path;
use tabled::builder::Builder;
use tabled::{settings::Style, Table, Tabled};

/// Write serde-serializable rows as a CSV file with a header row.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a price table: a `Year` column followed by one column per item.
pub fn write_price_table(path: &Path, table: &PriceTable) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(table.header())?;
    for row in &table.rows {
        wtr.write_record(row.record())?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Print the first `max_rows` rows as a Markdown table.
pub fn preview_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

/// Markdown preview for a price table, whose columns are data-driven and
/// therefore built row by row instead of derived.
pub fn preview_price_table(table: &PriceTable, max_rows: usize) {
    if table.rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(table.header());
    for row in table.rows.iter().take(max_rows) {
        builder.push_record(row.record());
    }
    let table_str = builder.build().with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChangeRecord, PriceRow};
    use std::fs;
    use tempfile::TempDir;

    fn sample_table() -> PriceTable {
        PriceTable {
            items: vec!["Salmon".to_string(), "Saury".to_string()],
            rows: vec![
                PriceRow {
                    year: 2022,
                    prices: vec![91.0, 10.0],
                },
                PriceRow {
                    year: 2023,
                    prices: vec![100.0, 11.0],
                },
            ],
        }
    }

    #[test]
    fn change_records_serialize_with_canonical_headers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CleanedFishPrice.csv");
        let rows = vec![
            ChangeRecord {
                area: "Ku-area of Tokyo".to_string(),
                item: "Salmon".to_string(),
                year: 2024,
                change_pct: Some(-3.1),
            },
            ChangeRecord {
                area: "Ku-area of Tokyo".to_string(),
                item: "Salmon".to_string(),
                year: 2023,
                change_pct: None,
            },
        ];

        write_csv(&path, &rows).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "Area,Items,Time,Change(%)\nKu-area of Tokyo,Salmon,2024,-3.1\nKu-area of Tokyo,Salmon,2023,\n"
        );
    }

    #[test]
    fn price_table_writes_year_then_items() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("EstimatedFishPricesByYear.csv");

        write_price_table(&path, &sample_table()).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "Year,Salmon,Saury\n2022,91.0,10.0\n2023,100.0,11.0\n"
        );
    }

    #[test]
    fn previews_do_not_panic() {
        preview_rows::<crate::types::MedianRow>(&[], 5);
        preview_price_table(&sample_table(), 1);
    }
}
