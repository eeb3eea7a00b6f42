use serde::Deserialize;

/// Live stream record from `player_api.php?action=get_live_streams`.
///
/// Providers disagree on whether `stream_id` is a number or a string, and
/// routinely send `null` for the optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelRecord {
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub stream_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stream_icon: Option<String>,
}

fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct StringOrNumberVisitor;

    impl<'de> Visitor<'de> for StringOrNumberVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumberVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_stream_id() {
        let record: ChannelRecord = serde_json::from_str(
            r#"{"num":1,"stream_id":1234,"name":"News HD","stream_icon":"http://logo/1.png","category_id":"7"}"#,
        )
        .unwrap();
        assert_eq!(record.stream_id, "1234");
        assert_eq!(record.name.as_deref(), Some("News HD"));
        assert_eq!(record.stream_icon.as_deref(), Some("http://logo/1.png"));
    }

    #[test]
    fn test_string_stream_id_and_null_fields() {
        let record: ChannelRecord =
            serde_json::from_str(r#"{"stream_id":"77","name":null,"stream_icon":null}"#).unwrap();
        assert_eq!(record.stream_id, "77");
        assert_eq!(record.name, None);
        assert_eq!(record.stream_icon, None);
    }

    #[test]
    fn test_missing_stream_id_is_rejected() {
        assert!(serde_json::from_str::<ChannelRecord>(r#"{"name":"No id"}"#).is_err());
    }
}
