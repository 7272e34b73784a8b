use serde::{Deserialize, Deserializer};

/// Decodes an explicit `null` the same way as a missing key.
///
/// Pair with `#[serde(default)]` so both cases land on `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Flags {
        #[serde(default, deserialize_with = "null_as_default")]
        archived: bool,
        #[serde(default, deserialize_with = "null_as_default")]
        city: String,
    }

    #[test]
    fn null_and_missing_both_default() {
        let from_null: Flags =
            serde_json::from_value(json!({ "archived": null, "city": null })).unwrap();
        let from_missing: Flags = serde_json::from_value(json!({})).unwrap();
        assert_eq!(from_null, from_missing);
        assert_eq!(
            from_null,
            Flags {
                archived: false,
                city: String::new()
            }
        );
    }

    #[test]
    fn wrong_type_still_fails() {
        assert!(serde_json::from_value::<Flags>(json!({ "archived": "yes" })).is_err());
    }
}
