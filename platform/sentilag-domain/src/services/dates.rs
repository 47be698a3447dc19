use chrono::NaiveDate;

const CALENDAR_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

pub fn parse_calendar_date(value: &str) -> Result<NaiveDate, String> {
    let trimmed = value.trim();
    for format in CALENDAR_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    Err(format!("unsupported date format: {value}"))
}

/// `2021年01月04日` -> `2021/01/04`; other inputs pass through unchanged.
pub fn normalize_cn_date(value: &str) -> String {
    value
        .trim()
        .replace('年', "/")
        .replace('月', "/")
        .replace('日', "")
}

pub fn parse_price_date(value: &str) -> Result<NaiveDate, String> {
    parse_calendar_date(&normalize_cn_date(value))
        .map_err(|_| format!("unsupported price date format: {value}"))
}
