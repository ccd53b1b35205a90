// Entry point and high-level CLI flow.
//
// The binary mirrors the original three analysis scripts:
// - Option [1] cleans the raw statistics export into a tidy change table.
// - Option [2] back-computes estimated prices per year and writes a JSON
//   summary next to the table.
// - Option [3] refreshes the Median column of the website copy in place.
// - After each stage the user can go back to the menu or exit.
//
// Every stage re-reads its input file, so the stages stay independent
// one-shot transforms connected only through the files below.
use fish_prices::{aggregator, cleaner, estimator, output, util};
use std::io::{self, Write};
use std::path::Path;

/// Raw statistics export downloaded from the survey portal.
const RAW_EXPORT: &str = "FishPrice.csv";
/// Cleaned four-column change table.
const CLEANED_TABLE: &str = "CleanedFishPrice.csv";
/// Known prices anchored one year after the latest estimated year.
const BASE_PRICES: &str = "ConsumerPrice.csv";
/// Estimated prices, one row per year and one column per fish kind.
const ESTIMATES: &str = "EstimatedFishPricesByYear.csv";
/// Copy of the estimates served by the website; the median stage edits it.
const WEBSITE_ESTIMATES: &str = "website/data/EstimatedFishPricesByYear.csv";
/// Run summary written next to the estimates.
const SUMMARY: &str = "summary.json";

/// Read a single line of input after printing the common "Enter choice:"
/// prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the stage menu after a stage ran.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Stage Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: clean the raw export into the change table.
fn handle_clean() {
    match cleaner::clean_export(Path::new(RAW_EXPORT)) {
        Ok((records, report)) => {
            println!(
                "Processing export... ({} rows read, {} kept)",
                util::format_int(report.rows_read as i64),
                util::format_int(report.rows_kept as i64)
            );
            println!(
                "Note: {} rows dropped for missing values.",
                util::format_int(report.rows_dropped as i64)
            );
            if report.unparsed_changes > 0 {
                println!(
                    "Info: {} change values could not be parsed and were kept as missing.",
                    util::format_int(report.unparsed_changes as i64)
                );
            }
            println!(
                "Found {} areas and {} items.\n",
                util::format_int(report.distinct_areas as i64),
                util::format_int(report.distinct_items as i64)
            );
            if let Err(e) = output::write_csv(Path::new(CLEANED_TABLE), &records) {
                eprintln!("Write error: {}\n", e);
                return;
            }
            output::preview_rows(&records, 5);
            println!("(Full table exported to {})\n", CLEANED_TABLE);
        }
        Err(e) => {
            eprintln!("Failed to clean export: {}\n", e);
        }
    }
}

/// Handle option [2]: estimate prices for every tracked fish and year.
fn handle_estimate() {
    let changes = match estimator::load_changes(Path::new(CLEANED_TABLE)) {
        Ok(changes) => changes,
        Err(e) => {
            eprintln!("Failed to load cleaned table: {}\n", e);
            return;
        }
    };
    let base_prices = match estimator::load_base_prices(Path::new(BASE_PRICES)) {
        Ok(prices) => prices,
        Err(e) => {
            eprintln!("Failed to load base prices: {}\n", e);
            return;
        }
    };

    let table = match estimator::reconstruct(
        &changes,
        &base_prices,
        &estimator::TRACKED_FISH,
        estimator::MARKET_AREA,
    ) {
        Ok(table) => table.rounded(),
        Err(e) => {
            eprintln!("Failed to estimate prices: {}\n", e);
            return;
        }
    };

    println!(
        "Estimated {} fish kinds across {}-{}.\n",
        table.items.len(),
        estimator::FIRST_YEAR,
        estimator::LAST_YEAR
    );
    if let Err(e) = output::write_price_table(Path::new(ESTIMATES), &table) {
        eprintln!("Write error: {}\n", e);
        return;
    }
    output::preview_price_table(&table, 3);
    println!("(Full table exported to {})\n", ESTIMATES);

    let summary = estimator::summarize(&table);
    if let Err(e) = output::write_json(Path::new(SUMMARY), &summary) {
        eprintln!("Write error: {}\n", e);
    }
    println!("Summary Stats ({}):", SUMMARY);
    println!(
        "{{\"first_year_median\": {}, \"last_year_median\": {}}}\n",
        util::format_price(summary.first_year_median),
        util::format_price(summary.last_year_median)
    );
}

/// Handle option [3]: refresh the Median column of the website table.
fn handle_median() {
    match aggregator::add_median_column(Path::new(WEBSITE_ESTIMATES)) {
        Ok(rows) => {
            println!(
                "Median column refreshed for {} rows.\n",
                util::format_int(rows.len() as i64)
            );
            output::preview_rows(&rows, 5);
            println!("(Table updated in place at {})\n", WEBSITE_ESTIMATES);
        }
        Err(e) => {
            eprintln!("Failed to update median column: {}\n", e);
        }
    }
}

fn main() {
    loop {
        println!("Select Pipeline Stage:");
        println!("[1] Clean the retail price export");
        println!("[2] Estimate prices by year");
        println!("[3] Add the median column to the website table\n");
        match read_choice().as_str() {
            "1" => {
                println!("");
                handle_clean();
            }
            "2" => {
                println!("");
                handle_estimate();
            }
            "3" => {
                println!("");
                handle_median();
            }
            _ => {
                println!("Invalid choice. Please enter 1, 2 or 3.\n");
                continue;
            }
        }
        if !prompt_back_to_menu() {
            println!("Exiting the program.");
            break;
        }
    }
}
