//! Deserializers that accept the loosely typed values older front-ends wrote.
//!
//! Form-driven writers stored numbers and flags as strings (`"100"`,
//! `"true"`) and dates in locale formats. These helpers read either shape
//! and hand back the proper type, so a reload always yields numbers,
//! booleans and dates.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer, de::Error};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"];

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdOrText {
    Id(u64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagOrText {
    Flag(bool),
    Text(String),
}

/// A monetary amount. Blank strings read as zero.
pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) if text.trim().is_empty() => Ok(0.0),
        NumberOrText::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid amount: '{text}'"))),
    }
}

pub fn identification_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match IdOrText::deserialize(deserializer)? {
        IdOrText::Id(value) => Ok(value),
        IdOrText::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid identification number: '{text}'"))),
    }
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match FlagOrText::deserialize(deserializer)? {
        FlagOrText::Flag(value) => Ok(value),
        FlagOrText::Text(text) => match text.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(D::Error::custom(format!("invalid flag: '{other}'"))),
        },
    }
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text.trim(), format).ok())
}

/// Dates are written as ISO `YYYY-MM-DD` and read from any of the known formats.
pub mod date {
    use super::*;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_date(&text).ok_or_else(|| D::Error::custom(format!("invalid date: '{text}'")))
    }
}
