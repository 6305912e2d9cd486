// =============================================================================
// Dataset Parsing — raw CSV text to admitted SymbolSeries
// =============================================================================
//
// Contract with the source document:
//   - Header names match case-insensitively after trimming.
//   - All of date, symbol, open, high, low, close, volume must be present,
//     otherwise the cycle aborts (MissingColumns).
//   - A row survives only when date, symbol and close all parse; any other
//     numeric cell that fails to parse becomes a missing value.
//
// Surviving rows are grouped by uppercased symbol and stable-sorted by date
// (ties keep source order). Two admission filters then apply: tickers
// containing a digit are treated as non-equity instruments and excluded, and
// series shorter than 2 bars carry nothing any detector can use.
// =============================================================================

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use csv::StringRecord;

use super::CycleError;
use crate::types::{Bar, SymbolSeries};

/// Columns the source document must carry.
pub const REQUIRED_COLUMNS: [&str; 7] =
    ["date", "symbol", "open", "high", "low", "close", "volume"];

/// Date formats seen in sheet exports, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse the full dataset: CSV text in, admitted series out (sorted by
/// symbol).
pub fn parse_dataset(text: &str) -> Result<Vec<SymbolSeries>, CycleError> {
    let bars = parse_rows(text)?;
    Ok(build_series(bars))
}

/// Parse the CSV body into retained bars.
pub fn parse_rows(text: &str) -> Result<Vec<Bar>, CycleError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (i, name) in headers.iter().enumerate() {
        index.entry(name.trim().to_lowercase()).or_insert(i);
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !index.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(CycleError::MissingColumns(missing));
    }

    let date_i = index["date"];
    let symbol_i = index["symbol"];
    let open_i = index["open"];
    let high_i = index["high"];
    let low_i = index["low"];
    let close_i = index["close"];
    let volume_i = index["volume"];

    let mut bars = Vec::new();
    for record in reader.records() {
        let record = record?;

        // Required fields: drop the row when any of them fails to parse.
        let Some(date) = parse_date(cell(&record, date_i)) else {
            continue;
        };
        let symbol = cell(&record, symbol_i);
        if symbol.is_empty() {
            continue;
        }
        let Some(close) = parse_number(cell(&record, close_i)) else {
            continue;
        };

        bars.push(Bar {
            symbol: symbol.to_uppercase(),
            date,
            open: parse_number(cell(&record, open_i)),
            high: parse_number(cell(&record, high_i)),
            low: parse_number(cell(&record, low_i)),
            close,
            volume: parse_number(cell(&record, volume_i)),
        });
    }

    Ok(bars)
}

/// Group retained bars into admitted series.
pub fn build_series(bars: Vec<Bar>) -> Vec<SymbolSeries> {
    let mut grouped: BTreeMap<String, Vec<Bar>> = BTreeMap::new();
    for bar in bars {
        grouped.entry(bar.symbol.clone()).or_default().push(bar);
    }

    grouped
        .into_iter()
        .filter_map(|(symbol, mut bars)| {
            if symbol.chars().any(|c| c.is_ascii_digit()) {
                return None;
            }
            if bars.len() < 2 {
                return None;
            }
            // Stable sort: same-date rows keep their source order.
            bars.sort_by_key(|b| b.date);
            Some(SymbolSeries { symbol, bars })
        })
        .collect()
}

fn cell<'a>(record: &'a StringRecord, i: usize) -> &'a str {
    record.get(i).map(str::trim).unwrap_or("")
}

/// Lenient numeric coercion: unparseable or NaN cells become missing.
fn parse_number(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Lenient date coercion across the formats sheet exports actually use.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "date,symbol,open,high,low,close,volume\n";

    #[test]
    fn headers_match_case_insensitively() {
        let text = "Date, SYMBOL ,Open,High,Low, Close ,Volume\n\
                    2025-01-01,nabil,500,510,495,505,1200\n\
                    2025-01-02,nabil,505,515,500,510,1300\n";
        let series = parse_dataset(text).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].symbol, "NABIL");
        assert_eq!(series[0].bars.len(), 2);
        assert_eq!(series[0].bars[1].close, 510.0);
    }

    #[test]
    fn missing_column_aborts() {
        let text = "date,symbol,open,high,low,volume\n2025-01-01,NABIL,1,2,3,4\n";
        match parse_dataset(text) {
            Err(CycleError::MissingColumns(cols)) => assert_eq!(cols, vec!["close"]),
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn rows_without_required_fields_are_dropped() {
        let text = format!(
            "{HEADER}\
             not-a-date,NABIL,1,2,3,4,5\n\
             2025-01-01,,1,2,3,4,5\n\
             2025-01-02,NABIL,1,2,3,oops,5\n\
             2025-01-03,NABIL,1,2,3,4,5\n"
        );
        let bars = parse_rows(&text).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 4.0);
    }

    #[test]
    fn optional_cells_become_missing_not_zero() {
        let text = format!(
            "{HEADER}\
             2025-01-01,NABIL,,512,x,505,\n\
             2025-01-02,NABIL,505,515,500,510,1300\n"
        );
        let series = parse_dataset(&text).unwrap();
        let first = &series[0].bars[0];
        assert_eq!(first.open, None);
        assert_eq!(first.high, Some(512.0));
        assert_eq!(first.low, None);
        assert_eq!(first.volume, None);
        assert_eq!(first.close, 505.0);
    }

    #[test]
    fn digit_tickers_are_excluded() {
        let text = format!(
            "{HEADER}\
             2025-01-01,NABIL,1,2,3,4,5\n\
             2025-01-02,NABIL,1,2,3,4,5\n\
             2025-01-01,H8020,1,2,3,4,5\n\
             2025-01-02,H8020,1,2,3,4,5\n"
        );
        let series = parse_dataset(&text).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].symbol, "NABIL");
    }

    #[test]
    fn single_bar_series_is_excluded() {
        let text = format!(
            "{HEADER}\
             2025-01-01,NABIL,1,2,3,4,5\n\
             2025-01-02,NABIL,1,2,3,4,5\n\
             2025-01-01,LONELY,1,2,3,4,5\n"
        );
        let series = parse_dataset(&text).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].symbol, "NABIL");
    }

    #[test]
    fn bars_sorted_by_date_ties_keep_source_order() {
        let text = format!(
            "{HEADER}\
             2025-01-03,NABIL,1,2,3,7,5\n\
             2025-01-01,NABIL,1,2,3,4,5\n\
             2025-01-03,NABIL,1,2,3,8,5\n"
        );
        let series = parse_dataset(&text).unwrap();
        let closes: Vec<f64> = series[0].bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![4.0, 7.0, 8.0]);
    }

    #[test]
    fn slash_dates_parse() {
        assert_eq!(
            parse_date("2025/01/05"),
            NaiveDate::from_ymd_opt(2025, 1, 5)
        );
        assert_eq!(
            parse_date("01/05/2025"),
            NaiveDate::from_ymd_opt(2025, 1, 5)
        );
        assert_eq!(parse_date("05-2025-01"), None);
    }

    #[test]
    fn symbols_come_out_sorted() {
        let text = format!(
            "{HEADER}\
             2025-01-01,SCB,1,2,3,4,5\n\
             2025-01-02,SCB,1,2,3,4,5\n\
             2025-01-01,ADBL,1,2,3,4,5\n\
             2025-01-02,ADBL,1,2,3,4,5\n"
        );
        let series = parse_dataset(&text).unwrap();
        let symbols: Vec<&str> = series.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ADBL", "SCB"]);
    }
}
