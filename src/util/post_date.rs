use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::text_utils::parse_date_time;

/// Creation date of a post, always held in UTC.
///
/// Reads RFC 3339 (what the site stores), `YYYY-MM-DD HH:MM:SS[.fff]` and
/// `YYYY-MM-DD`. Writes RFC 3339 with millisecond precision.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct PostDate(pub DateTime<Utc>);

impl PostDate {
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(3))
    }

    /// `2022-12-13T16:42:08.476Z`
    pub fn to_iso_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// `Tue, 13 Dec 2022 16:42:08 +0000`
    pub fn to_rfc2822(&self) -> String {
        self.0.to_rfc2822()
    }
}

impl fmt::Display for PostDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl FromStr for PostDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(date) = DateTime::parse_from_rfc3339(s.trim()) {
            return Ok(Self(date.with_timezone(&Utc)));
        }
        let naive = parse_date_time(s)?;
        Ok(Self(naive.and_utc()))
    }
}

impl Serialize for PostDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
    {
        serializer.serialize_str(&self.to_iso_string())
    }
}

impl<'de> Deserialize<'de> for PostDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
    {
        use serde::de::Error;
        let value = String::deserialize(deserializer)?;
        PostDate::from_str(&value).map_err(Error::custom)
    }
}

/// Treats `null` and blank strings as a missing date.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<PostDate>, D::Error>
    where
        D: Deserializer<'de>,
{
    use serde::de::Error;
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => PostDate::from_str(&value).map(Some).map_err(Error::custom),
    }
}
