pub mod core;

use serde::{de, Deserialize, Deserializer, Serialize};
use std::{
    fmt::{Debug, Display},
    ops::Deref,
    str::FromStr,
};

pub trait Id:
    Copy
    + Eq
    + Deref<Target = Self::Inner>
    + From<Self::Inner>
    + Display
    + Debug
    + Serialize
    + for<'de> Deserialize<'de>
{
    type Inner: FromStr;
}

/// バックエンドはIDを数値でも文字列でも返してくる
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId<T> {
    Number(T),
    Text(String),
}

fn resolve_id<I, E>(raw: RawId<I::Inner>) -> Result<I, E>
where
    I: Id,
    <I::Inner as FromStr>::Err: Display,
    E: de::Error,
{
    match raw {
        RawId::Number(inner) => Ok(I::from(inner)),
        RawId::Text(text) => text
            .trim()
            .parse::<I::Inner>()
            .map(I::from)
            .map_err(E::custom),
    }
}

pub(crate) fn deserialize_id<'de, D, I>(deserializer: D) -> Result<I, D::Error>
where
    D: Deserializer<'de>,
    I: Id,
    I::Inner: Deserialize<'de>,
    <I::Inner as FromStr>::Err: Display,
{
    resolve_id(RawId::deserialize(deserializer)?)
}

pub(crate) fn deserialize_optional_id<'de, D, I>(deserializer: D) -> Result<Option<I>, D::Error>
where
    D: Deserializer<'de>,
    I: Id,
    I::Inner: Deserialize<'de>,
    <I::Inner as FromStr>::Err: Display,
{
    Option::<RawId<I::Inner>>::deserialize(deserializer)?
        .map(|raw| resolve_id(raw))
        .transpose()
}
