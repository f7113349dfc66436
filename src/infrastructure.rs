use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::core::{DisplayGroup, Reservation};

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Malformed reservation payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid reservation record at index {index}: {source}")]
    Record {
        index: usize,
        source: serde_json::Error,
    },
}

/// バックエンドから受け取った予約レコードの配列を読み込む
pub fn decode_reservations(bytes: &[u8]) -> Result<Vec<Reservation>, PayloadError> {
    let records: Vec<Value> = serde_json::from_slice(bytes)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record).map_err(|source| PayloadError::Record { index, source })
        })
        .collect()
}

pub fn encode_groups(groups: &[DisplayGroup], pretty: bool) -> Result<String, PayloadError> {
    Ok(encode(groups, pretty)?)
}

fn encode<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, serde_json::Error> {
    match pretty {
        true => serde_json::to_string_pretty(value),
        false => serde_json::to_string(value),
    }
}
