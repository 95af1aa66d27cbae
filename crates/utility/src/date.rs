use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parses a date delivered by the backend. Plain `date` columns arrive as
/// `YYYY-MM-DD`, `timestamp`/`timestamptz` columns with a time part which is
/// dropped here.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f%#z"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|date_time| date_time.date())
}

/// Label used on the x axis of the progress charts.
pub fn chart_label(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

pub mod lenient {
    use chrono::NaiveDate;
    use serde::{
        de::{Error, IntoDeserializer},
        Deserialize, Deserializer, Serializer,
    };

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
        let s = String::deserialize(deserializer)?;
        super::parse_date(&s)
            .ok_or_else(|| Error::custom(format!("invalid date '{s}'")))
    }

    pub fn serialize_option<S>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serialize(date, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => deserialize(s.as_str().into_deserializer()).map(Some),
            None => Ok(None),
        }
    }
}
