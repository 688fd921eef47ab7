//! Validated primitives shared across the deskhub crates.
//!
//! - [`NonEmptyText`] for user-supplied text that must carry content (login identifiers,
//!   required names).
//! - [`RecordId`] for backend-assigned record identities, which the REST backends emit either
//!   as JSON integers or as strings.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Identity of a persisted record, as assigned by the backend.
///
/// The Python backends use integer primary keys for most tables and string keys for a few
/// (file shares, uploaded media), so both JSON shapes are accepted. The identity is compared
/// by its textual form but written back in the shape it was read with, so `"007"` stays a
/// string and `7` stays a number.
#[derive(Debug, Clone)]
pub struct RecordId {
    text: String,
    shape: WireShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WireShape {
    Integer,
    Text,
}

impl RecordId {
    /// Creates a text `RecordId` from any non-blank text.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the input is blank.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        NonEmptyText::new(input).map(|text| Self {
            text: text.into_string(),
            shape: WireShape::Text,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the backend sent this id as a JSON number.
    pub fn is_integer(&self) -> bool {
        self.shape == WireShape::Integer
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self {
            text: value.to_string(),
            shape: WireShape::Integer,
        }
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for RecordId {}

impl std::hash::Hash for RecordId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.text.cmp(&other.text)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for RecordId {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match (self.shape, self.text.parse::<u64>()) {
            (WireShape::Integer, Ok(n)) => serializer.serialize_u64(n),
            _ => serializer.serialize_str(&self.text),
        }
    }
}

impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Int(u64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Int(n) => Ok(RecordId::from(n)),
            Wire::Text(s) => RecordId::new(&s).map_err(serde::de::Error::custom),
        }
    }
}
