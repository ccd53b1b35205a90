use crate::error::{PriceError, Result};
use crate::types::{ChangeRecord, RawPriceRow};
use crate::util::{parse_change_pct, parse_year};
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Preamble lines before the header row in the raw export.
pub const PREAMBLE_LINES: usize = 10;

/// Header names of the four columns carried into the cleaned table.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "Area(2020-base)",
    "Items(2020-base)",
    "Time",
    "Change from the previous period (year, fiscal year, or month)[%]",
];

/// Counters describing one cleaning run.
#[derive(Debug, Clone)]
pub struct CleanReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
    pub unparsed_changes: usize,
    pub distinct_areas: usize,
    pub distinct_items: usize,
}

/// Load the raw statistics export and produce the cleaned change table.
///
/// The first [`PREAMBLE_LINES`] lines are skipped; the line after them must
/// be a header row containing all of [`REQUIRED_COLUMNS`]. Rows with a
/// missing value in any of the four columns are dropped before coercion.
/// Area and item are trimmed, the year must parse as an integer, and the
/// change value is coerced to a number where possible and kept as missing
/// where not. Row order is preserved.
pub fn clean_export(path: &Path) -> Result<(Vec<ChangeRecord>, CleanReport)> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut skipped = String::new();
    for _ in 0..PREAMBLE_LINES {
        skipped.clear();
        if reader.read_line(&mut skipped)? == 0 {
            return Err(PriceError::InputFormat(format!(
                "{} ends inside the {}-line preamble",
                path.display(),
                PREAMBLE_LINES
            )));
        }
    }

    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(PriceError::InputFormat(format!(
                "missing column {:?} in {}",
                required,
                path.display()
            )));
        }
    }

    let mut records: Vec<ChangeRecord> = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_dropped = 0usize;
    let mut unparsed_changes = 0usize;

    for result in rdr.deserialize::<RawPriceRow>() {
        rows_read += 1;
        let row = result?;

        // A blank cell in any of the four columns drops the whole row.
        let (area, item, time, change) = match (
            non_blank(row.area.as_deref()),
            non_blank(row.items.as_deref()),
            non_blank(row.time.as_deref()),
            non_blank(row.change.as_deref()),
        ) {
            (Some(a), Some(i), Some(t), Some(c)) => (a, i, t, c),
            _ => {
                rows_dropped += 1;
                continue;
            }
        };

        let year = parse_year(time).ok_or_else(|| {
            PriceError::InputFormat(format!(
                "unreadable year {:?} in {}",
                time,
                path.display()
            ))
        })?;

        let change_pct = parse_change_pct(change);
        if change_pct.is_none() {
            unparsed_changes += 1;
        }

        records.push(ChangeRecord {
            area: area.trim().to_string(),
            item: item.trim().to_string(),
            year,
            change_pct,
        });
    }

    let mut areas: HashSet<&str> = HashSet::new();
    let mut items: HashSet<&str> = HashSet::new();
    for record in &records {
        areas.insert(record.area.as_str());
        items.insert(record.item.as_str());
    }

    let report = CleanReport {
        rows_read,
        rows_kept: records.len(),
        rows_dropped,
        unparsed_changes,
        distinct_areas: areas.len(),
        distinct_items: items.len(),
    };
    Ok((records, report))
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    match s {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}
