use serde::{Deserialize, Deserializer, Serializer};

/// Deserialize a ping value that may arrive as a number, the string "N/A",
/// or null. Anything that is not a non-negative number becomes `None`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let raw: Option<Raw> = Option::deserialize(deserializer)?;

    Ok(match raw {
        Some(Raw::Number(ms)) if ms >= 0.0 => Some(ms),
        Some(Raw::Text(s)) => s.parse::<f64>().ok().filter(|ms| *ms >= 0.0),
        _ => None,
    })
}

/// Serialize a ping back the way the endpoint reports it: a number when
/// known, the string "N/A" otherwise.
pub fn serialize<S>(ping_ms: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match ping_ms {
        Some(ms) => serializer.serialize_f64(*ms),
        None => serializer.serialize_str("N/A"),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, with = "super")]
        ping_ms: Option<f64>,
    }

    #[test]
    fn accepts_numbers_strings_and_absence() {
        let numeric: Probe = serde_json::from_str(r#"{"ping_ms": 12.5}"#).unwrap();
        assert_eq!(numeric.ping_ms, Some(12.5));

        let not_available: Probe = serde_json::from_str(r#"{"ping_ms": "N/A"}"#).unwrap();
        assert_eq!(not_available.ping_ms, None);

        let absent: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.ping_ms, None);

        let negative: Probe = serde_json::from_str(r#"{"ping_ms": -1}"#).unwrap();
        assert_eq!(negative.ping_ms, None);
    }
}
