use std::{collections::HashMap, hash::Hash, ops::Range};

use intervaltree::{Element, IntervalTree};
use serde::{ser::SerializeStruct, Serialize, Serializer};
use tracing::debug;

use super::{Price, Reservation, SlotTime};

/// 連続した予約枠を1行にまとめたもの
///
/// 少なくとも1件の予約を持ち、`reservations` は開始時刻順に並ぶ。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayGroup {
    reservations: Vec<Reservation>,
    time: Range<SlotTime>,
}

impl DisplayGroup {
    fn start(reservation: &Reservation) -> Self {
        Self {
            reservations: vec![reservation.clone()],
            time: reservation.time().clone(),
        }
    }

    /// 直前の枠の終了時刻と開始時刻が一致する場合のみ連続とみなす
    fn abuts(&self, reservation: &Reservation) -> bool {
        self.time.end == reservation.start_time()
    }

    fn extend(&mut self, reservation: &Reservation) {
        self.time.end = reservation.end_time();
        self.reservations.push(reservation.clone());
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
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

    /// 代表の予約（先頭）
    pub fn representative(&self) -> &Reservation {
        &self.reservations[0]
    }

    /// まとめた枠の数
    pub fn slot_count(&self) -> usize {
        self.reservations.len()
    }

    pub fn duration(&self) -> chrono::Duration {
        *self.time.end - *self.time.start
    }

    pub fn total_price(&self) -> Price {
        self.reservations
            .iter()
            .fold(Price::default(), |sum, r| sum.saturating_add(r.total_price()))
    }
}

impl Serialize for DisplayGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DisplayGroup", 5)?;
        state.serialize_field("startTime", &self.start_time())?;
        state.serialize_field("endTime", &self.end_time())?;
        state.serialize_field("totalPrice", &self.total_price())?;
        state.serialize_field("representative", self.representative())?;
        state.serialize_field("reservations", &self.reservations)?;
        state.end()
    }
}

/// 同じコート・同じ日で時間が重なっている予約の組
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    first: Reservation,
    second: Reservation,
}

impl Conflict {
    pub fn first(&self) -> &Reservation {
        &self.first
    }

    pub fn second(&self) -> &Reservation {
        &self.second
    }
}

pub struct ReservationGrouper;

impl ReservationGrouper {
    /// 予約を (ユーザー, コート, 日付) ごとに分け、終了時刻と次の開始時刻が
    /// 一致する枠を連結して表示用のグループにする。
    ///
    /// グループはキーが最初に現れた順に並び、同じキーの中では開始時刻順。
    /// 重なっているだけで接していない予約は連結しない。
    pub fn group<'a, I>(reservations: I) -> Vec<DisplayGroup>
    where
        I: IntoIterator<Item = &'a Reservation>,
    {
        let buckets = bucket_by(reservations, |r: &&Reservation| r.key());
        let bucket_count = buckets.len();
        let mut input_count = 0;
        let mut groups = Vec::new();
        for mut bucket in buckets {
            input_count += bucket.len();
            bucket.sort_by_key(|r| r.start_time());
            let mut current: Option<DisplayGroup> = None;
            for reservation in bucket {
                match current.as_mut() {
                    Some(group) if group.abuts(reservation) => group.extend(reservation),
                    _ => {
                        if let Some(closed) = current.replace(DisplayGroup::start(reservation)) {
                            groups.push(closed);
                        }
                    }
                }
            }
            groups.extend(current);
        }
        debug!(
            "予約をグループ化: 予約 {} 件, キー {} 件, グループ {} 件",
            input_count,
            bucket_count,
            groups.len()
        );
        groups
    }

    /// 同じコート・同じ日付で時間帯が重なる予約の組を返す。
    /// 接しているだけの枠は重なりとはみなさない。
    pub fn conflicts<'a, I>(reservations: I) -> Vec<Conflict>
    where
        I: IntoIterator<Item = &'a Reservation>,
    {
        let buckets = bucket_by(
            reservations.into_iter().enumerate(),
            |(_, r): &(usize, &Reservation)| (r.court_number(), r.date()),
        );
        let mut pairs = Vec::new();
        for bucket in buckets {
            let tree = bucket
                .iter()
                .map(|&(position, r)| Element {
                    range: r.time().clone(),
                    value: (position, r),
                })
                .collect::<IntervalTree<SlotTime, (usize, &Reservation)>>();
            for &(position, first) in &bucket {
                for element in tree.query(first.time().clone()) {
                    let (other, second) = element.value;
                    if other > position {
                        pairs.push((position, other, first, second));
                    }
                }
            }
        }
        pairs.sort_unstable_by_key(|&(first, second, ..)| (first, second));
        debug!("重複予約を検出: {} 組", pairs.len());
        pairs
            .into_iter()
            .map(|(_, _, first, second)| Conflict {
                first: first.clone(),
                second: second.clone(),
            })
            .collect()
    }
}

/// キーが最初に現れた順にバケットを並べる
fn bucket_by<T, K, I, F>(items: I, key: F) -> Vec<Vec<T>>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut index = HashMap::new();
    let mut buckets: Vec<Vec<T>> = Vec::new();
    for item in items {
        let i = *index.entry(key(&item)).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[i].push(item);
    }
    buckets
}
