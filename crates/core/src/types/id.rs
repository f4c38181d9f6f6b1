//! Newtype IDs for type-safe entity references.
//!
//! Shopify identifies entities with opaque global ID strings (e.g.
//! `gid://shopify/CartLine/abc123`). Use the `define_id!` macro to create
//! type-safe wrappers that prevent accidentally mixing IDs from different
//! entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use wildroot_core::define_id;
/// define_id!(LineId);
/// define_id!(MerchandiseId);
///
/// let line_id = LineId::new("gid://shopify/CartLine/1");
/// let merch_id = MerchandiseId::new("gid://shopify/ProductVariant/1");
///
/// // These are different types, so this won't compile:
/// // let _: LineId = merch_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
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
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(CartId);
define_id!(LineId);
define_id!(MerchandiseId);
define_id!(ProductId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        let id = LineId::new("gid://shopify/CartLine/1");
        assert_eq!(id.as_str(), "gid://shopify/CartLine/1");
        assert_eq!(id.to_string(), "gid://shopify/CartLine/1");
        assert_eq!(String::from(id), "gid://shopify/CartLine/1");
    }

    #[test]
    fn test_id_equality_and_hash() {
        use std::collections::HashMap;

        let a = LineId::new("L1");
        let b = LineId::from("L1");
        assert_eq!(a, b);

        let mut map = HashMap::new();
        map.insert(a, 1);
        assert_eq!(map.get(&b), Some(&1));
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = MerchandiseId::new("gid://shopify/ProductVariant/42");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"gid://shopify/ProductVariant/42\"");

        let back: MerchandiseId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
