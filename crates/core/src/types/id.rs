//! Identifier types.
//!
//! Every ID is generated with `define_id!` so that IDs of different entities
//! cannot be mixed up. The backend hands out both numeric and string
//! identifiers, so each ID accepts either.

/// Macro to define a type-safe ID that is either a number or a string.
///
/// Creates an enum with `Number(i64)` and `Text(String)` variants and:
/// - untagged `Serialize`/`Deserialize`, so `7` and `"look-7"` both decode
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `Display`, `FromStr` (digits become `Number`, anything else `Text`)
/// - `From<i64>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use staybnb_core::define_id;
/// define_id!(ReelId);
///
/// assert_eq!(ReelId::from(7), ReelId::Number(7));
/// assert_eq!(ReelId::from("r-7").to_string(), "r-7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(untagged)]
        pub enum $name {
            /// Numeric identifier.
            Number(i64),
            /// Free-form string identifier.
            Text(String),
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                match self {
                    Self::Number(n) => write!(f, "{n}"),
                    Self::Text(s) => f.write_str(s),
                }
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                Ok(trimmed
                    .parse::<i64>()
                    .map_or_else(|_| Self::Text(trimmed.to_owned()), Self::Number))
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self::Number(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                match id.parse() {
                    Ok(parsed) => parsed,
                    Err(never) => match never {},
                }
            }
        }
    };
}

define_id!(
    /// A user identifier.
    UserId
);

define_id!(
    /// A wishlist item identifier.
    ///
    /// Serialized untagged, so a persisted wishlist looks like `[3, "look-7"]`.
    ItemId
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_roundtrip() {
        let id = UserId::from(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_user_id_accepts_string_ids() {
        let id: UserId = serde_json::from_str(r#""65f1c0ffee""#).unwrap();
        assert_eq!(id, UserId::Text("65f1c0ffee".to_string()));
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""65f1c0ffee""#);
    }

    #[test]
    fn test_item_id_parses_numbers_and_text() {
        assert_eq!("17".parse::<ItemId>().unwrap(), ItemId::Number(17));
        assert_eq!(
            " look-7 ".parse::<ItemId>().unwrap(),
            ItemId::Text("look-7".to_string())
        );
        assert_eq!(ItemId::from("3"), ItemId::Number(3));
    }

    #[test]
    fn test_item_id_untagged_json() {
        let ids: Vec<ItemId> = serde_json::from_str(r#"[3, "look-7"]"#).unwrap();
        assert_eq!(
            ids,
            vec![ItemId::Number(3), ItemId::Text("look-7".to_string())]
        );
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[3,"look-7"]"#);
    }
}
