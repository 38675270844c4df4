//! An insertion-ordered map that picks its serialized shape from its key type.
//!
//! Maps keyed by strings, or by keys with a lossless string form, are written
//! as field-named containers. Every other map is written as a flat sequence
//! of alternating keys and values, which keeps any key type and the exact
//! entry order.
//!
//! ```
//! use ordmap::OrderedMap;
//!
//! let mut ports = OrderedMap::new();
//! ports.insert(6881u16, "tcp".to_string());
//! ports.insert(80, "http".to_string());
//!
//! let encoded = serde_json::to_string(&ports).unwrap();
//! assert_eq!(r#"{"6881":"tcp","80":"http"}"#, encoded);
//!
//! let decoded: OrderedMap<u16, String> = serde_json::from_str(&encoded).unwrap();
//! assert_eq!(ports, decoded);
//! ```

mod de;
mod error;
mod field_name;
mod key;
mod map;
pub mod pairs;
mod ser;

pub use error::{DecodeError, InvariantViolation};
pub use field_name::FieldName;
pub use key::{MapKey, Strategy};
pub use map::{IntoIter, Iter, IterMut, OrderedMap};
