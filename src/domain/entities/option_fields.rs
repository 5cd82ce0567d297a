use serde::{Deserialize, Deserializer, Serialize};

/// Represents optional field semantics in PUT/PATCH payloads.
///
/// - `Unchanged` → field not sent
/// - `SetToNull` → sent as `null`, clears the stored value
/// - `SetToValue` → set to provided value
///
/// Fields of this type must carry `#[serde(default)]` so that a missing key
/// deserializes to `Unchanged`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum OptionField<T> {
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<T> Default for OptionField<T> {
    fn default() -> Self {
        OptionField::Unchanged
    }
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => OptionField::SetToValue(value),
            None => OptionField::SetToNull,
        })
    }
}

impl<T> OptionField<T> {
    /// Resolves the patch against the currently stored value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Unchanged => current,
            Self::SetToNull => None,
            Self::SetToValue(v) => Some(v),
        }
    }

    /// If `SetToValue`, returns a reference to inner value.
    pub fn value_ref(&self) -> Option<&T> {
        if let Self::SetToValue(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

impl OptionField<String> {
    /// Trims a supplied string; an empty result clears the field.
    pub fn trimmed(self) -> Self {
        match self {
            Self::SetToValue(s) => {
                let t = s.trim();
                if t.is_empty() {
                    Self::SetToNull
                } else {
                    Self::SetToValue(t.to_string())
                }
            }
            other => other,
        }
    }
}
