//! Serde adapters for Microcks wire formats

/// (De)serializes a `Duration` as an integer number of milliseconds.
pub mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Microcks serializes longs, but some versions emit floating point values
        let millis = f64::deserialize(deserializer)?;
        if !millis.is_finite() || millis < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "invalid duration in milliseconds: {}",
                millis
            )));
        }
        Ok(Duration::from_millis(millis as u64))
    }
}

/// Accepts either a plain string or an array of strings, joining arrays with `,`.
///
/// Header values come back from Microcks as arrays but are sent as a single
/// comma separated string.
pub mod string_or_seq {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrSeq {
        One(String),
        Many(Vec<String>),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match StringOrSeq::deserialize(deserializer)? {
            StringOrSeq::One(value) => value,
            StringOrSeq::Many(values) => values.join(","),
        })
    }
}
