use serde::de;

/// Reasons an encoded map is rejected while it is being rebuilt.
///
/// These reach callers through the host format's own error type, carrying
/// the message produced by `Display`. Failures of the host format itself are
/// passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A field name could not be turned back into a key.
    TypeMismatch { field: String, expected: &'static str },
    /// A key was seen a second time. For the pair sequence `offset` is the
    /// element offset of the repeated key; for field-named maps it is the
    /// entry offset.
    DuplicateKey { offset: usize },
    /// The pair sequence ended right after the key at `offset`.
    TruncatedPairSequence { offset: usize },
}

impl DecodeError {
    pub(crate) fn raise<E: de::Error>(self) -> E {
        tracing::debug!(error = %self, "rejecting encoded ordered map");
        E::custom(self)
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch { field, expected } => f.write_fmt(format_args!(
                "type mismatch: field name {:?} is not a valid {}",
                field, expected
            )),
            Self::DuplicateKey { offset } => {
                f.write_fmt(format_args!("duplicate key at offset {}", offset))
            }
            Self::TruncatedPairSequence { offset } => f.write_fmt(format_args!(
                "truncated pair sequence: key at offset {} has no value",
                offset
            )),
        }
    }
}

impl std::error::Error for DecodeError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    LengthMismatch { keys: usize, values: usize },
    MisplacedKey { position: usize },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LengthMismatch { keys, values } => f.write_fmt(format_args!(
                "ordered map holds {} keys but {} values",
                keys, values
            )),
            Self::MisplacedKey { position } => f.write_fmt(format_args!(
                "ordered map key at position {} does not resolve to itself",
                position
            )),
        }
    }
}

impl std::error::Error for InvariantViolation {}
