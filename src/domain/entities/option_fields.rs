use serde::{Deserialize, Deserializer};

/// Represents optional field semantics in PATCH requests.
///
/// - `Unchanged` → field absent from the body
/// - `SetToNull` → explicitly `null`
/// - `SetToValue` → set to provided value
///
/// Use together with `#[serde(default)]` on the containing struct so absent keys
/// stay `Unchanged`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OptionField<T> {
    #[default]
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(v) => OptionField::SetToValue(v),
            None => OptionField::SetToNull,
        })
    }
}

impl<T> OptionField<T> {
    /// Convert to nested option:
    /// - `None` → unchanged
    /// - `Some(None)` → set null
    /// - `Some(Some(T))` → set to value
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Self::Unchanged => None,
            Self::SetToNull => Some(None),
            Self::SetToValue(v) => Some(Some(v)),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Writes the change into `target`; `null` resets the target to its default.
    pub fn apply_to(self, target: &mut T)
    where
        T: Default,
    {
        match self {
            Self::Unchanged => {}
            Self::SetToNull => *target = T::default(),
            Self::SetToValue(v) => *target = v,
        }
    }

    /// Writes the change into a nullable `target`.
    pub fn apply_to_option(self, target: &mut Option<T>) {
        if let Some(change) = self.into_option() {
            *target = change;
        }
    }
}
