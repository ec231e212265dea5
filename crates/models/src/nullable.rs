use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// A field of a partial update, which can be missing, explicitly `null`, or carry a value.
///
/// Missing fields deserialize as [`Nullable::Undefined`] only when the field is marked
/// `#[serde(default)]`, and should be skipped when serializing with
/// `#[serde(skip_serializing_if = "Nullable::is_undefined")]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullable<T> {
    /// Not present in the update, the current value must not change
    Undefined,
    /// Present as `null`, the current value is cleared
    Null,
    Some(T),
}

impl<T> Nullable<T> {
    #[inline]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Nullable::Undefined)
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Nullable::Null)
    }

    #[inline]
    pub const fn is_some(&self) -> bool {
        matches!(self, Nullable::Some(_))
    }

    #[inline]
    pub const fn as_ref(&self) -> Nullable<&T> {
        match self {
            Nullable::Undefined => Nullable::Undefined,
            Nullable::Null => Nullable::Null,
            Nullable::Some(value) => Nullable::Some(value),
        }
    }

    #[inline]
    pub fn map<U, F>(self, f: F) -> Nullable<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Nullable::Undefined => Nullable::Undefined,
            Nullable::Null => Nullable::Null,
            Nullable::Some(value) => Nullable::Some(f(value)),
        }
    }

    /// `None` when undefined, `Some(None)` when null.
    #[inline]
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Nullable::Undefined => None,
            Nullable::Null => Some(None),
            Nullable::Some(value) => Some(Some(value)),
        }
    }
}

impl<T> Default for Nullable<T> {
    #[inline]
    fn default() -> Self {
        Nullable::Undefined
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Nullable::Some(value),
            None => Nullable::Null,
        }
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Nullable::Some(value) => serializer.serialize_some(value),
            _ => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Nullable::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Test {
        #[serde(default, skip_serializing_if = "Nullable::is_undefined")]
        a: Nullable<u32>,
    }

    #[test]
    fn test_absent_is_not_null() {
        let missing: Test = serde_json::from_str("{}").unwrap();
        let null: Test = serde_json::from_str(r#"{"a": null}"#).unwrap();
        let value: Test = serde_json::from_str(r#"{"a": 4}"#).unwrap();

        assert_eq!(missing.a, Nullable::Undefined);
        assert_eq!(null.a, Nullable::Null);
        assert_eq!(value.a, Nullable::Some(4));
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&Test::default()).unwrap(), "{}");
        assert_eq!(serde_json::to_string(&Test { a: Nullable::Null }).unwrap(), r#"{"a":null}"#);
        assert_eq!(serde_json::to_string(&Test { a: Nullable::Some(1) }).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_into_option() {
        assert_eq!(Nullable::<u8>::Undefined.into_option(), None);
        assert_eq!(Nullable::<u8>::Null.into_option(), Some(None));
        assert_eq!(Nullable::Some(3u8).into_option(), Some(Some(3)));
    }
}
