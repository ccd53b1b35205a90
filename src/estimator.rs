use crate::error::{PriceError, Result};
use crate::types::{BasePrice, ChangeRecord, EstimateSummary, PriceRow, PriceTable};
use crate::util::{median, parse_price};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;

/// Earliest and latest estimated year, inclusive. The base price table is
/// anchored one year after [`LAST_YEAR`].
pub const FIRST_YEAR: i32 = 1979;
pub const LAST_YEAR: i32 = 2023;

/// The 15 fish kinds tracked by the published table, in column order.
pub const TRACKED_FISH: [&str; 15] = [
    "Tuna fish",
    "Horse mackerel",
    "Sardines",
    "Bonito",
    "Salmon",
    "Mackerel",
    "Saury",
    "Sea bream",
    "Yellowtail",
    "Cuttlefish",
    "Octopus",
    "Prawns",
    "Short-necked clams",
    "Oysters",
    "Scallops",
];

/// Retail survey area whose change records feed the estimates.
pub const MARKET_AREA: &str = "Ku-area of Tokyo";

/// Read the cleaned change table back from disk.
pub fn load_changes(path: &Path) -> Result<Vec<ChangeRecord>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for result in rdr.deserialize::<ChangeRecord>() {
        records.push(result?);
    }
    Ok(records)
}

/// Read the base price table: two columns `(fish, price)` with the first
/// line skipped and prices parsed as integers.
pub fn load_base_prices(path: &Path) -> Result<Vec<BasePrice>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut prices = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let item = record.get(0).map(str::trim).unwrap_or_default();
        let raw_price = record.get(1).unwrap_or("");
        let price = parse_price(raw_price).ok_or_else(|| {
            PriceError::InputFormat(format!(
                "unreadable price {:?} for {:?} in {}",
                raw_price,
                item,
                path.display()
            ))
        })?;
        prices.push(BasePrice {
            item: item.to_string(),
            price,
        });
    }
    Ok(prices)
}

/// Back-compute estimated prices for `items`, walking years backward.
///
/// Only change records for `area` and a listed item are consulted; the
/// first record wins when `(item, year)` repeats. For a year `y` the growth
/// factor is `1 + change(item, y + 1) / 100`, i.e. the published change one
/// year after the year being estimated. [`LAST_YEAR`] divides the base
/// price by its factor; every earlier year divides the previously computed
/// price. Items are independent of each other, but within one item the
/// recurrence is inherently sequential, so the fold threads the previous
/// price explicitly.
///
/// The returned table is unrounded; callers round a finished table with
/// [`PriceTable::rounded`]. A consulted change cell that is absent or
/// missing fails with [`PriceError::MissingChange`]; an absent base price
/// fails with [`PriceError::MissingBasePrice`].
pub fn reconstruct(
    changes: &[ChangeRecord],
    base_prices: &[BasePrice],
    items: &[&str],
    area: &str,
) -> Result<PriceTable> {
    let mut change_by_key: HashMap<(&str, i32), Option<f64>> = HashMap::new();
    for record in changes {
        if record.area == area && items.contains(&record.item.as_str()) {
            change_by_key
                .entry((record.item.as_str(), record.year))
                .or_insert(record.change_pct);
        }
    }

    let mut base_by_item: HashMap<&str, i64> = HashMap::new();
    for base in base_prices {
        base_by_item.entry(base.item.as_str()).or_insert(base.price);
    }

    let span = (LAST_YEAR - FIRST_YEAR + 1) as usize;
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(items.len());
    for &item in items {
        let base = *base_by_item
            .get(item)
            .ok_or_else(|| PriceError::MissingBasePrice {
                item: item.to_string(),
            })?;

        let mut column = vec![0.0f64; span];
        let mut previous = base as f64;
        for year in (FIRST_YEAR..=LAST_YEAR).rev() {
            let price = previous / growth_factor(&change_by_key, item, year)?;
            column[(year - FIRST_YEAR) as usize] = price;
            previous = price;
        }
        columns.push(column);
    }

    let rows = (FIRST_YEAR..=LAST_YEAR)
        .map(|year| PriceRow {
            year,
            prices: columns
                .iter()
                .map(|column| column[(year - FIRST_YEAR) as usize])
                .collect(),
        })
        .collect();

    Ok(PriceTable {
        items: items.iter().map(|item| item.to_string()).collect(),
        rows,
    })
}

/// Growth factor carrying `item` from `year` to `year + 1`, looked up at
/// `year + 1`. A coerced-to-missing change cell counts as absent here.
fn growth_factor(
    changes: &HashMap<(&str, i32), Option<f64>>,
    item: &str,
    year: i32,
) -> Result<f64> {
    match changes.get(&(item, year + 1)) {
        Some(Some(pct)) => Ok(1.0 + pct / 100.0),
        _ => Err(PriceError::MissingChange {
            item: item.to_string(),
            year: year + 1,
        }),
    }
}

/// Summary figures for one estimation run.
pub fn summarize(table: &PriceTable) -> EstimateSummary {
    EstimateSummary {
        items: table.items.len(),
        first_year: table.rows.first().map_or(FIRST_YEAR, |row| row.year),
        last_year: table.rows.last().map_or(LAST_YEAR, |row| row.year),
        first_year_median: table
            .rows
            .first()
            .map_or(0.0, |row| median(&row.prices).round()),
        last_year_median: table
            .rows
            .last()
            .map_or(0.0, |row| median(&row.prices).round()),
    }
}
