use crate::util::format_price;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Lenient deserialization target for the raw statistics export.
///
/// Only the four columns carried into the cleaned table are declared;
/// auxiliary code columns and the tabulated-variable column are dropped by
/// never being read.
#[derive(Debug, Deserialize)]
pub struct RawPriceRow {
    #[serde(rename = "Area(2020-base)")]
    pub area: Option<String>,
    #[serde(rename = "Items(2020-base)")]
    pub items: Option<String>,
    #[serde(rename = "Time")]
    pub time: Option<String>,
    #[serde(rename = "Change from the previous period (year, fiscal year, or month)[%]")]
    pub change: Option<String>,
}

/// One cleaned row of the change table.
///
/// `change_pct` is `None` when the raw value did not survive numeric
/// coercion; the row is kept and the cell serialized as empty.
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct ChangeRecord {
    #[serde(rename = "Area")]
    #[tabled(rename = "Area")]
    pub area: String,
    #[serde(rename = "Items")]
    #[tabled(rename = "Items")]
    pub item: String,
    #[serde(rename = "Time")]
    #[tabled(rename = "Time")]
    pub year: i32,
    #[serde(rename = "Change(%)")]
    #[tabled(rename = "Change(%)", display_with = "display_change")]
    pub change_pct: Option<f64>,
}

fn display_change(change: &Option<f64>) -> String {
    match change {
        Some(pct) => pct.to_string(),
        None => String::new(),
    }
}

/// One known recent price per fish kind, anchored one year after the most
/// recent estimated year.
#[derive(Debug, Clone)]
pub struct BasePrice {
    pub item: String,
    pub price: i64,
}

/// Estimated prices for every tracked fish kind across the full year range.
///
/// `items` fixes the column order; every row's `prices` align with it.
/// Rows ascend by year even though the computation walks years backward.
#[derive(Debug, Clone)]
pub struct PriceTable {
    pub items: Vec<String>,
    pub rows: Vec<PriceRow>,
}

#[derive(Debug, Clone)]
pub struct PriceRow {
    pub year: i32,
    pub prices: Vec<f64>,
}

impl PriceTable {
    /// Copy of the table with every price rounded to the nearest whole
    /// number. Values stay `f64`-typed; the year column is untouched.
    pub fn rounded(&self) -> PriceTable {
        PriceTable {
            items: self.items.clone(),
            rows: self
                .rows
                .iter()
                .map(|row| PriceRow {
                    year: row.year,
                    prices: row.prices.iter().map(|p| p.round()).collect(),
                })
                .collect(),
        }
    }

    /// Header row of the on-disk format: `Year` followed by the items.
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.items.len() + 1);
        header.push("Year".to_string());
        header.extend(self.items.iter().cloned());
        header
    }

    /// Estimated price of `item` in `year`, if both are in the table.
    pub fn price(&self, item: &str, year: i32) -> Option<f64> {
        let column = self.items.iter().position(|i| i == item)?;
        let row = self.rows.iter().find(|r| r.year == year)?;
        row.prices.get(column).copied()
    }
}

impl PriceRow {
    /// Render the row as CSV cells, prices formatted as float-typed text.
    pub fn record(&self) -> Vec<String> {
        let mut record = Vec::with_capacity(self.prices.len() + 1);
        record.push(self.year.to_string());
        record.extend(self.prices.iter().map(|p| format_price(*p)));
        record
    }
}

/// Year and refreshed median of one aggregated row, for console previews.
#[derive(Debug, Clone, Tabled)]
pub struct MedianRow {
    #[tabled(rename = "Year")]
    pub year: String,
    #[tabled(rename = "Median")]
    pub median: String,
}

/// Summary figures for one estimation run, written to `summary.json`.
#[derive(Debug, Serialize)]
pub struct EstimateSummary {
    pub items: usize,
    pub first_year: i32,
    pub last_year: i32,
    pub first_year_median: f64,
    pub last_year_median: f64,
}
