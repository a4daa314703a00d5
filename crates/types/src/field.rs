//! Partial-update primitives.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single field of a partial row.
///
/// `Unset` leaves the stored value untouched, `Clear` nulls it out and
/// `Value` overwrites it. Rows are serialized with `Unset` fields skipped and
/// `Clear` fields written as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FieldUpdate<T> {
    #[default]
    Unset,
    Clear,
    Value(T),
}

impl<T> FieldUpdate<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn is_set(&self) -> bool {
        !self.is_unset()
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// `None` means "no change".
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Self::Value)
    }

    pub fn as_ref(&self) -> FieldUpdate<&T> {
        match self {
            Self::Unset => FieldUpdate::Unset,
            Self::Clear => FieldUpdate::Clear,
            Self::Value(value) => FieldUpdate::Value(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldUpdate<U> {
        match self {
            Self::Unset => FieldUpdate::Unset,
            Self::Clear => FieldUpdate::Clear,
            Self::Value(value) => FieldUpdate::Value(f(value)),
        }
    }

    /// Layers a newer update on top of this one. The newer update wins unless it is `Unset`.
    pub fn merge(self, newer: Self) -> Self {
        match newer {
            Self::Unset => self,
            newer => newer,
        }
    }

    /// Applies this update to a stored value.
    pub fn apply_to(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Unset => current,
            Self::Clear => None,
            Self::Value(value) => Some(value),
        }
    }
}

impl<T> From<T> for FieldUpdate<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: Serialize> Serialize for FieldUpdate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unset | Self::Clear => serializer.serialize_none(),
            Self::Value(value) => serializer.serialize_some(value),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.map_or(Self::Clear, Self::Value))
    }
}

/// Validity window `[lower, upper)` of one version of a row.
///
/// The importer only ever opens ranges; closing `upper` happens when a later
/// version supersedes the row downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimestampRange {
    pub lower: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<i64>,
}

impl TimestampRange {
    /// An open range starting at `lower`.
    pub fn since(lower: i64) -> Self {
        Self { lower, upper: None }
    }

    pub fn is_open(&self) -> bool {
        self.upper.is_none()
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.lower && self.upper.map_or(true, |upper| timestamp < upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_older_when_newer_is_unset() {
        let older = FieldUpdate::Value("a");
        assert_eq!(older.clone().merge(FieldUpdate::Unset), FieldUpdate::Value("a"));
        assert_eq!(older.clone().merge(FieldUpdate::Clear), FieldUpdate::Clear);
        assert_eq!(older.merge(FieldUpdate::Value("b")), FieldUpdate::Value("b"));
    }

    #[test]
    fn test_apply_to_distinguishes_clear_from_unset() {
        assert_eq!(FieldUpdate::<i64>::Unset.apply_to(Some(5)), Some(5));
        assert_eq!(FieldUpdate::<i64>::Clear.apply_to(Some(5)), None);
        assert_eq!(FieldUpdate::Value(7).apply_to(Some(5)), Some(7));
    }

    #[test]
    fn test_empty_string_is_a_value() {
        let memo = FieldUpdate::Value(String::new());
        assert!(memo.is_set());
        assert_eq!(memo.value().map(String::as_str), Some(""));
    }

    #[test]
    fn test_timestamp_range_contains() {
        let open = TimestampRange::since(10);
        assert!(open.is_open());
        assert!(open.contains(10));
        assert!(!open.contains(9));

        let closed = TimestampRange {
            lower: 10,
            upper: Some(20),
        };
        assert!(closed.contains(19));
        assert!(!closed.contains(20));
    }
}
