use crate::services::dates::parse_price_date;
use crate::value_objects::daily_price::DailyPrice;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// How the `Open` column of a price table is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceFormat {
    #[default]
    Plain,
    /// `1,234.5` style; the Hang Seng export uses this.
    ThousandsSeparated,
}

impl PriceFormat {
    pub fn for_symbol(symbol: &str, separated_markers: &[String]) -> Self {
        if separated_markers
            .iter()
            .any(|marker| !marker.is_empty() && symbol.contains(marker.as_str()))
        {
            PriceFormat::ThousandsSeparated
        } else {
            PriceFormat::Plain
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PriceReport {
    pub rows: usize,
    pub duplicates: usize,
    pub first_duplicate: Option<NaiveDate>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

pub fn parse_opening_price(raw: &str, format: PriceFormat) -> Result<f64, String> {
    let trimmed = raw.trim();
    let cleaned: Cow<'_, str> = match format {
        PriceFormat::Plain => Cow::Borrowed(trimmed),
        PriceFormat::ThousandsSeparated => Cow::Owned(trimmed.replace(',', "")),
    };
    let value: f64 = cleaned
        .parse()
        .map_err(|_| format!("invalid opening price '{raw}' ({format:?})"))?;
    if !value.is_finite() {
        return Err(format!("invalid opening price '{raw}' ({format:?})"));
    }
    Ok(value)
}

pub fn parse_price_row(date: &str, open: &str, format: PriceFormat) -> Result<DailyPrice, String> {
    Ok(DailyPrice {
        date: parse_price_date(date)?,
        opening_price: parse_opening_price(open, format)?,
    })
}

/// Orders rows by date. Exports are usually newest-first; a repeated date keeps the later row.
pub fn build_price_series(rows: Vec<DailyPrice>) -> (Vec<DailyPrice>, PriceReport) {
    let mut report = PriceReport {
        rows: rows.len(),
        ..PriceReport::default()
    };
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in rows {
        if by_date.insert(row.date, row.opening_price).is_some() {
            report.duplicates += 1;
            if report.first_duplicate.is_none() {
                report.first_duplicate = Some(row.date);
            }
        }
    }

    report.first_date = by_date.keys().next().copied();
    report.last_date = by_date.keys().next_back().copied();
    let series = by_date
        .into_iter()
        .map(|(date, opening_price)| DailyPrice {
            date,
            opening_price,
        })
        .collect();
    (series, report)
}

#[cfg(test)]
mod tests {
    use super::{build_price_series, parse_opening_price, parse_price_row, PriceFormat};
    use crate::value_objects::daily_price::DailyPrice;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn strips_thousands_separators_for_separated_format() {
        let value = parse_opening_price("1,234.5", PriceFormat::ThousandsSeparated).expect("parse");
        assert!((value - 1234.5).abs() < 1e-12);
        let value =
            parse_opening_price("28,901.23", PriceFormat::ThousandsSeparated).expect("parse");
        assert!((value - 28901.23).abs() < 1e-9);
    }

    #[test]
    fn plain_format_rejects_separators() {
        let err = parse_opening_price("1,234.5", PriceFormat::Plain).expect_err("plain");
        assert!(err.contains("invalid opening price"));
        assert!(parse_opening_price("3456.78", PriceFormat::Plain).is_ok());
        assert!(parse_opening_price("NaN", PriceFormat::Plain).is_err());
    }

    #[test]
    fn format_is_selected_by_symbol_marker() {
        let markers = vec!["恒生".to_string()];
        assert_eq!(
            PriceFormat::for_symbol("恒生指数", &markers),
            PriceFormat::ThousandsSeparated
        );
        assert_eq!(PriceFormat::for_symbol("上证指数", &markers), PriceFormat::Plain);
        assert_eq!(
            PriceFormat::for_symbol("上证指数", &[String::new()]),
            PriceFormat::Plain
        );
    }

    #[test]
    fn parses_chinese_dated_rows() {
        let row = parse_price_row("2021年01月04日", "3,474.68", PriceFormat::ThousandsSeparated)
            .expect("row");
        assert_eq!(row.date, ymd(2021, 1, 4));
        assert!((row.opening_price - 3474.68).abs() < 1e-9);
    }

    #[test]
    fn series_is_sorted_and_deduplicated() {
        let rows = vec![
            DailyPrice {
                date: ymd(2021, 1, 5),
                opening_price: 3.0,
            },
            DailyPrice {
                date: ymd(2021, 1, 4),
                opening_price: 2.0,
            },
            DailyPrice {
                date: ymd(2021, 1, 5),
                opening_price: 4.0,
            },
        ];
        let (series, report) = build_price_series(rows);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, ymd(2021, 1, 4));
        assert_eq!(series[1].opening_price, 4.0);
        assert_eq!(report.rows, 3);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.first_duplicate, Some(ymd(2021, 1, 5)));
        assert_eq!(report.first_date, Some(ymd(2021, 1, 4)));
        assert_eq!(report.last_date, Some(ymd(2021, 1, 5)));
    }
}
