use serde::{Deserialize, Deserializer, Serialize};

/// Measure metadata as returned by the series-list endpoint.
///
/// The API serializes goal/target/indicator associations as lists (of
/// strings or numbers depending on the field) and occasionally leaves
/// free-text fields null, so deserialization is deliberately lenient.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesMeta {
    #[serde(default, deserialize_with = "nullable_string")]
    pub code: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, deserialize_with = "string_list")]
    pub goal: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub target: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub indicator: Vec<String>,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .map(|value| match value {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        })
        .collect())
}
