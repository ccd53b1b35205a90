use crate::error::{PriceError, Result};
use crate::types::MedianRow;
use crate::util::{format_price, median};
use csv::StringRecord;
use std::path::Path;

/// Column appended (or refreshed) by [`add_median_column`].
pub const MEDIAN_COLUMN: &str = "Median";

/// Append the per-year `Median` column to a year-by-item price table,
/// rewriting the file in place.
///
/// The median is computed over the price columns only: every column except
/// the leading `Year` and a `Median` left behind by an earlier run, which
/// is replaced rather than folded into the new value. All other cells pass
/// through byte-for-byte, so running the transform twice leaves the file
/// unchanged. Returns the per-year medians for console preview.
pub fn add_median_column(path: &Path) -> Result<Vec<MedianRow>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let headers = rdr.headers()?.clone();

    match headers.get(0) {
        Some("Year") => {}
        other => {
            return Err(PriceError::InputFormat(format!(
                "expected a leading \"Year\" column in {}, found {:?}",
                path.display(),
                other.unwrap_or("")
            )))
        }
    }

    let price_columns: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(index, name)| *index != 0 && *name != MEDIAN_COLUMN)
        .map(|(index, _)| index)
        .collect();
    let kept_columns: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| *name != MEDIAN_COLUMN)
        .map(|(index, _)| index)
        .collect();

    let mut rows: Vec<StringRecord> = Vec::new();
    for result in rdr.records() {
        rows.push(result?);
    }
    drop(rdr);

    let mut medians: Vec<f64> = Vec::with_capacity(rows.len());
    for record in &rows {
        let year = record.get(0).unwrap_or("");
        let mut prices = Vec::with_capacity(price_columns.len());
        for &index in &price_columns {
            let cell = record.get(index).unwrap_or("");
            let value: f64 = cell.trim().parse().map_err(|_| {
                PriceError::InputFormat(format!(
                    "unreadable price {:?} in column {:?} for year {}",
                    cell,
                    headers.get(index).unwrap_or(""),
                    year
                ))
            })?;
            prices.push(value);
        }
        medians.push(median(&prices).round());
    }

    let mut wtr = csv::Writer::from_path(path)?;
    let mut out_header: Vec<&str> = kept_columns
        .iter()
        .map(|&index| headers.get(index).unwrap_or(""))
        .collect();
    out_header.push(MEDIAN_COLUMN);
    wtr.write_record(&out_header)?;

    let mut preview = Vec::with_capacity(rows.len());
    for (record, row_median) in rows.iter().zip(&medians) {
        let rendered = format_price(*row_median);
        let mut out: Vec<String> = kept_columns
            .iter()
            .map(|&index| record.get(index).unwrap_or("").to_string())
            .collect();
        out.push(rendered.clone());
        wtr.write_record(&out)?;
        preview.push(MedianRow {
            year: record.get(0).unwrap_or("").to_string(),
            median: rendered,
        });
    }
    wtr.flush()?;
    Ok(preview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn table(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("EstimatedFishPricesByYear.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn median_over_the_price_columns() {
        let dir = TempDir::new().unwrap();
        let path = table(
            &dir,
            "Year,A,B,C,D\n2000,10.0,20.0,30.0,40.0\n2001,5.0,7.0,9.0,11.0\n",
        );

        let rows = add_median_column(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, "2000");
        assert_eq!(rows[0].median, "25.0");
        assert_eq!(rows[1].median, "8.0");

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "Year,A,B,C,D,Median\n2000,10.0,20.0,30.0,40.0,25.0\n2001,5.0,7.0,9.0,11.0,8.0\n"
        );
    }

    #[test]
    fn existing_median_column_is_excluded_and_replaced() {
        let dir = TempDir::new().unwrap();
        // A stale Median that would skew the result if it were counted.
        let path = table(&dir, "Year,A,B,Median\n2000,10.0,20.0,999.0\n");

        let rows = add_median_column(&path).unwrap();
        assert_eq!(rows[0].median, "15.0");

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Year,A,B,Median\n2000,10.0,20.0,15.0\n");
    }

    #[test]
    fn running_twice_is_byte_stable() {
        let dir = TempDir::new().unwrap();
        let path = table(&dir, "Year,A,B,C\n1999,91.0,12.0,33.0\n2000,90.0,14.0,30.0\n");

        add_median_column(&path).unwrap();
        let once = fs::read_to_string(&path).unwrap();
        add_median_column(&path).unwrap();
        let twice = fs::read_to_string(&path).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn rejects_tables_without_a_year_column() {
        let dir = TempDir::new().unwrap();
        let path = table(&dir, "Jahr,A,B\n2000,1.0,2.0\n");

        let err = add_median_column(&path).unwrap_err();
        assert!(matches!(err, PriceError::InputFormat(_)));
    }

    #[test]
    fn rejects_unreadable_price_cells() {
        let dir = TempDir::new().unwrap();
        let path = table(&dir, "Year,A,B\n2000,1.0,expensive\n");

        let err = add_median_column(&path).unwrap_err();
        match err {
            PriceError::InputFormat(msg) => {
                assert!(msg.contains("expensive"));
                assert!(msg.contains("2000"));
            }
            other => panic!("expected InputFormat, got {:?}", other),
        }
    }
}
