//! Feed entries and their parsing into typed readings.
//!
//! A Nightscout `entries.json` answer is a JSON array, newest entry first:
//! `[{ "sgv": 120, "direction": "Flat", "delta": -1.5, "date": 1700000000000 }]`.

use serde::{Deserialize, Serialize};

use crate::error::{GlucmonError, Result};

/// Trend arrow reported by the CGM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    DoubleDown,
    SingleDown,
    FortyFiveDown,
    Flat,
    FortyFiveUp,
    SingleUp,
    DoubleUp,
    TripleDown,
    TripleUp,
    Unknown,
}

impl Direction {
    /// Map the feed's direction string. Anything unrecognised is `Unknown`.
    pub fn from_feed(value: &str) -> Self {
        match value {
            "DoubleDown" => Direction::DoubleDown,
            "SingleDown" => Direction::SingleDown,
            "FortyFiveDown" => Direction::FortyFiveDown,
            "Flat" => Direction::Flat,
            "FortyFiveUp" => Direction::FortyFiveUp,
            "SingleUp" => Direction::SingleUp,
            "DoubleUp" => Direction::DoubleUp,
            "TripleDown" => Direction::TripleDown,
            "TripleUp" => Direction::TripleUp,
            _ => Direction::Unknown,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Direction::DoubleDown => "⇊",
            Direction::SingleDown => "↓",
            Direction::FortyFiveDown => "↘",
            Direction::Flat => "→",
            Direction::FortyFiveUp => "↗",
            Direction::SingleUp => "↑",
            Direction::DoubleUp => "⇈",
            Direction::TripleDown => "⇊",
            Direction::TripleUp => "⇈",
            Direction::Unknown => "",
        }
    }
}

/// One glucose sample taken from the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    pub glucose: i64,   // mg/dL
    pub direction: Direction,
    pub delta: i64,     // mg/dL since the previous reading
    pub timestamp_ms: i64,
}

/// Raw entry as served by Nightscout. Fields we do not use are ignored.
#[derive(Debug, Deserialize)]
struct FeedEntry {
    sgv: Option<f64>,
    direction: Option<String>,
    delta: Option<f64>,
    date: Option<i64>,
}

impl TryFrom<FeedEntry> for Reading {
    type Error = GlucmonError;

    fn try_from(entry: FeedEntry) -> Result<Self> {
        let glucose = entry
            .sgv
            .filter(|v| v.is_finite())
            .ok_or_else(|| GlucmonError::parse("entry has no sgv value"))?;
        let timestamp_ms = entry
            .date
            .ok_or_else(|| GlucmonError::parse("entry has no date"))?;

        let direction = entry
            .direction
            .as_deref()
            .map(Direction::from_feed)
            .unwrap_or(Direction::Unknown);

        let delta = entry
            .delta
            .filter(|d| d.is_finite())
            .map(|d| d.round() as i64)
            .unwrap_or(0);

        Ok(Reading {
            glucose: glucose.round() as i64,
            direction,
            delta,
            timestamp_ms,
        })
    }
}

/// Parse a feed body and return its newest reading.
///
/// Malformed JSON, an empty array and an entry missing `sgv` or `date` are
/// all parse errors; the caller shows "No data" for every one of them.
pub fn parse_latest(body: &str) -> Result<Reading> {
    let entries: Vec<FeedEntry> = serde_json::from_str(body)
        .map_err(|e| GlucmonError::parse(format!("invalid feed JSON: {}", e)))?;

    let latest = entries
        .into_iter()
        .next()
        .ok_or_else(|| GlucmonError::parse("feed returned no entries"))?;

    Reading::try_from(latest)
}
