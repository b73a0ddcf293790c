use crate::error::{Result, StockError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use tracing::warn;

pub const CHART_KEYS: [&str; 5] = ["Date", "Price", "High", "Low", "Volume"];

/// Index-aligned series decoded from `stock-chart-data.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub dates: Vec<DateTime<Utc>>,
    pub price: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    /// Volume in millions, pre-formatted (`2000000` -> `"2.00M"`).
    pub volume: Vec<String>,
}

impl ChartData {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn timestamps(&self) -> Vec<f64> {
        self.dates
            .iter()
            .map(|d| d.timestamp_millis() as f64)
            .collect()
    }
}

pub fn parse_chart_data(json: &Value) -> Result<ChartData> {
    let mut columns = Vec::with_capacity(CHART_KEYS.len());
    for key in CHART_KEYS {
        columns.push(ordered_values(json, key)?);
    }
    let volume_raw = columns.pop().unwrap_or_default();
    let low_raw = columns.pop().unwrap_or_default();
    let high_raw = columns.pop().unwrap_or_default();
    let price_raw = columns.pop().unwrap_or_default();
    let date_raw = columns.pop().unwrap_or_default();

    let lengths = [
        date_raw.len(),
        price_raw.len(),
        high_raw.len(),
        low_raw.len(),
        volume_raw.len(),
    ];
    let len = lengths.iter().copied().min().unwrap_or(0);
    if lengths.iter().any(|&l| l != len) {
        warn!(?lengths, kept = len, "chart series lengths differ; truncating to common prefix");
    }

    let dates = date_raw
        .iter()
        .take(len)
        .map(|v| parse_date(v))
        .collect::<Result<Vec<_>>>()?;

    Ok(ChartData {
        dates,
        price: price_raw.iter().take(len).map(|v| parse_float(v)).collect(),
        high: high_raw.iter().take(len).map(|v| parse_float(v)).collect(),
        low: low_raw.iter().take(len).map(|v| parse_float(v)).collect(),
        volume: volume_raw
            .iter()
            .take(len)
            .map(|v| format_volume(parse_float(v)))
            .collect(),
    })
}

pub fn format_volume(volume: f64) -> String {
    format!("{}M", to_fixed(volume / 1_000_000.0, 2))
}

/// Fixed-point rendering with `digits` fraction digits. Values exactly
/// halfway between two candidates round away from zero; `{:.N}` on its own
/// would round them to even.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let value = if value == 0.0 { 0.0 } else { value };

    // Every finite f64 terminates within 1074 fraction digits.
    let exact = format!("{:.1100}", value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let Some(tail) = frac_part.get(digits..) else {
        return format!("{value:.digits$}");
    };
    let is_tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if !is_tie {
        return format!("{value:.digits$}");
    }

    let truncated = if digits == 0 {
        int_part.to_string()
    } else {
        format!("{int_part}.{}", &frac_part[..digits])
    };
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{}", increment_last_digit(&truncated))
}

fn increment_last_digit(number: &str) -> String {
    let mut chars: Vec<char> = number.chars().collect();
    for ch in chars.iter_mut().rev() {
        match *ch {
            '.' => continue,
            '9' => *ch = '0',
            d => {
                *ch = char::from_digit(d.to_digit(10).unwrap_or(0) + 1, 10).unwrap_or('0');
                return chars.into_iter().collect();
            }
        }
    }
    std::iter::once('1').chain(chars).collect()
}

/// Values of `json[key]` in object-key enumeration order: integer-like keys
/// ascending, then the remaining keys in document order.
fn ordered_values<'a>(json: &'a Value, key: &'static str) -> Result<Vec<&'a Value>> {
    match json.get(key) {
        Some(Value::Object(map)) => Ok(sort_like_object_keys(map)),
        Some(Value::Array(items)) => Ok(items.iter().collect()),
        _ => Err(StockError::MissingKey(key)),
    }
}

fn sort_like_object_keys(map: &Map<String, Value>) -> Vec<&Value> {
    let mut entries: Vec<(Option<u32>, &Value)> = map
        .iter()
        .map(|(k, v)| (array_index(k), v))
        .collect();
    entries.sort_by_key(|(idx, _)| match idx {
        Some(i) => (0, *i),
        None => (1, 0),
    });
    entries.into_iter().map(|(_, v)| v).collect()
}

fn array_index(key: &str) -> Option<u32> {
    let idx = key.parse::<u32>().ok()?;
    (idx != u32::MAX && idx.to_string() == key).then_some(idx)
}

/// Lenient numeric read: numbers as-is, strings by their longest numeric
/// prefix, anything else is NaN.
pub fn parse_float(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_float_str(s),
        _ => f64::NAN,
    }
}

pub fn parse_float_str(raw: &str) -> f64 {
    let s = raw.trim_start();
    let candidate: String = s
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .collect();

    (1..=candidate.len())
        .rev()
        .find_map(|end| candidate[..end].parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

pub fn parse_date(value: &Value) -> Result<DateTime<Utc>> {
    let invalid = || StockError::InvalidDate(value.to_string());

    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .ok_or_else(invalid),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(dt.with_timezone(&Utc));
            }
            for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Ok(naive.and_utc());
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}
