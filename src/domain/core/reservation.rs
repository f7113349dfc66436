use std::ops::Range;

use chrono::NaiveDate;
use derive_more::{Deref, Display, Error, From};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{serde_as, DisplayFromStr};

use crate::domain::{deserialize_id, deserialize_optional_id, Id};

use super::{Price, SlotTime};

/// 予約ID
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Deref, Default,
)]
pub struct ReservationId(u64);

impl Id for ReservationId {
    type Inner = u64;
}

/// ユーザーID
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
    Deref,
    Default,
)]
pub struct UserId(u64);

impl Id for UserId {
    type Inner = u64;
}

/// コート番号
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
    Deref,
    Default,
)]
pub struct CourtNumber(u32);

impl Id for CourtNumber {
    type Inner = u32;
}

/// 予約ステータス（中身は解釈しない）
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, Display, From, Deref)]
pub struct ReservationStatus(String);

/// 連続枠をまとめる単位
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReservationKey {
    pub user_id: UserId,
    pub court_number: CourtNumber,
    pub date: NaiveDate,
}

/// 予約
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReservationRecord", into = "ReservationRecord")]
pub struct Reservation {
    id: Option<ReservationId>,
    user_id: UserId,
    court_number: CourtNumber,
    date: NaiveDate,
    time: Range<SlotTime>,
    status: ReservationStatus,
    total_price: Price,
    extra: Map<String, Value>,
}

impl Reservation {
    pub fn create(
        id: Option<ReservationId>,
        user_id: UserId,
        court_number: CourtNumber,
        date: NaiveDate,
        time: Range<SlotTime>,
        status: ReservationStatus,
        total_price: Price,
    ) -> Result<Self, ReservationError> {
        Self::validate_time(&time)?;
        Ok(Reservation {
            id,
            user_id,
            court_number,
            date,
            time,
            status,
            total_price,
            extra: Map::new(),
        })
    }

    /// 解釈しないフィールドをそのまま持たせる
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    pub fn id(&self) -> Option<ReservationId> {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn court_number(&self) -> CourtNumber {
        self.court_number
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> &Range<SlotTime> {
        &self.time
    }

    pub fn start_time(&self) -> SlotTime {
        self.time.start
    }

    pub fn end_time(&self) -> SlotTime {
        self.time.end
    }

    pub fn status(&self) -> &ReservationStatus {
        &self.status
    }

    pub fn total_price(&self) -> Price {
        self.total_price
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn duration(&self) -> chrono::Duration {
        *self.time.end - *self.time.start
    }

    pub fn key(&self) -> ReservationKey {
        ReservationKey {
            user_id: self.user_id,
            court_number: self.court_number,
            date: self.date,
        }
    }

    fn validate_time(time: &Range<SlotTime>) -> Result<(), ReservationError> {
        if time.start >= time.end {
            return Err(ReservationError::InvalidTime);
        }
        Ok(())
    }
}

/// 予約エラー
#[derive(Error, Display, Debug, PartialEq, Eq)]
pub enum ReservationError {
    /// 開始時刻が終了時刻より前ではありません
    #[display(fmt = "Start time must be before end time")]
    InvalidTime,
}

/// バックエンドから届く予約レコード
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_id"
    )]
    id: Option<ReservationId>,
    #[serde(deserialize_with = "deserialize_id")]
    user_id: UserId,
    #[serde(deserialize_with = "deserialize_id")]
    court_number: CourtNumber,
    #[serde_as(as = "DisplayFromStr")]
    date: NaiveDate,
    start_time: SlotTime,
    end_time: SlotTime,
    #[serde(default)]
    status: ReservationStatus,
    #[serde(default)]
    total_price: Price,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<ReservationRecord> for Reservation {
    type Error = ReservationError;

    fn try_from(value: ReservationRecord) -> Result<Self, Self::Error> {
        Reservation::create(
            value.id,
            value.user_id,
            value.court_number,
            value.date,
            value.start_time..value.end_time,
            value.status,
            value.total_price,
        )
        .map(|entity| entity.with_extra(value.extra))
    }
}

impl From<Reservation> for ReservationRecord {
    fn from(value: Reservation) -> Self {
        ReservationRecord {
            id: value.id,
            user_id: value.user_id,
            court_number: value.court_number,
            date: value.date,
            start_time: value.time.start,
            end_time: value.time.end,
            status: value.status,
            total_price: value.total_price,
            extra: value.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn slot(s: &str) -> SlotTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_reservation_create() {
        let reservation = Reservation::create(
            Some(ReservationId(7)),
            UserId(1),
            CourtNumber(5),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            slot("08:00")..slot("09:30"),
            "confirmed".to_owned().into(),
            Price::from(3000),
        )
        .unwrap();
        assert_eq!(reservation.id(), Some(ReservationId(7)));
        assert_eq!(reservation.start_time(), slot("08:00"));
        assert_eq!(reservation.end_time(), slot("09:30"));
        assert_eq!(reservation.duration(), chrono::Duration::minutes(90));
        assert_eq!(reservation.status().as_str(), "confirmed");
        assert_eq!(
            reservation.key(),
            ReservationKey {
                user_id: UserId(1),
                court_number: CourtNumber(5),
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            }
        );
    }

    #[test]
    fn test_reservation_invalid_time() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let result = Reservation::create(
            None,
            UserId(1),
            CourtNumber(5),
            date,
            slot("09:00")..slot("08:30"),
            ReservationStatus::default(),
            Price::default(),
        );
        assert_eq!(result, Err(ReservationError::InvalidTime));
        let result = Reservation::create(
            None,
            UserId(1),
            CourtNumber(5),
            date,
            slot("09:00")..slot("09:00"),
            ReservationStatus::default(),
            Price::default(),
        );
        assert_eq!(result, Err(ReservationError::InvalidTime));
    }

    #[test]
    fn test_reservation_from_backend_record() {
        let reservation: Reservation = serde_json::from_value(json!({
            "id": "42",
            "userId": 1,
            "courtNumber": "5",
            "date": "2024-06-01",
            "startTime": "08:00",
            "endTime": "08:30",
            "status": "pending",
            "totalPrice": 1500,
            "stadiumName": "Riverside"
        }))
        .unwrap();
        assert_eq!(reservation.id(), Some(ReservationId(42)));
        assert_eq!(reservation.user_id(), UserId(1));
        assert_eq!(reservation.court_number(), CourtNumber(5));
        assert_eq!(reservation.date().to_string(), "2024-06-01");
        assert_eq!(reservation.total_price(), Price::from(1500));
        assert_eq!(reservation.extra().get("stadiumName"), Some(&json!("Riverside")));
    }

    #[test]
    fn test_reservation_record_without_optional_fields() {
        let reservation: Reservation = serde_json::from_value(json!({
            "userId": 3,
            "courtNumber": 1,
            "date": "2024-06-02",
            "startTime": "18:00:00",
            "endTime": "18:30:00"
        }))
        .unwrap();
        assert_eq!(reservation.id(), None);
        assert_eq!(reservation.status(), &ReservationStatus::default());
        assert_eq!(reservation.total_price(), Price::default());
        assert!(reservation.extra().is_empty());
    }

    #[test]
    fn test_reservation_record_rejected() {
        let inverted = serde_json::from_value::<Reservation>(json!({
            "userId": 1,
            "courtNumber": 5,
            "date": "2024-06-01",
            "startTime": "10:00",
            "endTime": "09:00"
        }));
        assert!(inverted.is_err());
        let bad_date = serde_json::from_value::<Reservation>(json!({
            "userId": 1,
            "courtNumber": 5,
            "date": "June 1st",
            "startTime": "09:00",
            "endTime": "10:00"
        }));
        assert!(bad_date.is_err());
        let bad_user = serde_json::from_value::<Reservation>(json!({
            "userId": "someone",
            "courtNumber": 5,
            "date": "2024-06-01",
            "startTime": "09:00",
            "endTime": "10:00"
        }));
        assert!(bad_user.is_err());
    }

    #[test]
    fn test_reservation_serializes_backend_shape() {
        let reservation = Reservation::create(
            Some(ReservationId(9)),
            UserId(2),
            CourtNumber(3),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            slot("20:00")..slot("20:30"),
            "confirmed".to_owned().into(),
            Price::from(2000),
        )
        .unwrap()
        .with_extra(Map::from_iter([("note".to_owned(), json!("bring bibs"))]));
        assert_eq!(
            serde_json::to_value(&reservation).unwrap(),
            json!({
                "id": 9,
                "userId": 2,
                "courtNumber": 3,
                "date": "2024-06-01",
                "startTime": "20:00",
                "endTime": "20:30",
                "status": "confirmed",
                "totalPrice": 2000,
                "note": "bring bibs"
            })
        );
    }
}
