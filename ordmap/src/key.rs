use crate::FieldName;

use std::borrow::Cow;

/// How an [`OrderedMap`](crate::OrderedMap) is laid out by the host format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// A field-named container; each key is its own field name.
    StringKeyed,
    /// A field-named container; each key is written through its string
    /// conversion.
    StringConvertible,
    /// A positional container holding `key, value, key, value, ...`.
    PairSequence,
}

impl Strategy {
    /// The strategy a decoder expects for keys of type `K`.
    ///
    /// This only looks at the type. Encoding can still fall back to
    /// [`Strategy::PairSequence`] when a particular key fails to convert.
    pub fn of<K: MapKey>() -> Self {
        K::STRATEGY
    }

    pub fn is_field_named(self) -> bool {
        !matches!(self, Self::PairSequence)
    }
}

/// Capability of a key type to act as a field name.
///
/// The defaults describe a key with no string form, which is always encoded
/// through the pair sequence:
///
/// ```
/// #[derive(Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// struct Point(i32, i32);
///
/// impl ordmap::MapKey for Point {}
/// ```
///
/// Implementations opting into [`Strategy::StringConvertible`] must make
/// `from_field_name` undo `to_field_name`. `to_field_name` may still refuse
/// individual keys.
pub trait MapKey: Sized {
    const STRATEGY: Strategy = Strategy::PairSequence;

    fn to_field_name(&self) -> Option<Cow<'_, str>> {
        None
    }

    fn from_field_name(_name: &str) -> Option<Self> {
        None
    }
}

/// Field names for every key, or `None` when the keys have to go out as a
/// pair sequence.
pub(crate) fn field_names<'a, K, I>(keys: I) -> Option<Vec<FieldName<'a>>>
where
    K: MapKey + 'a,
    I: Iterator<Item = &'a K>,
{
    if !K::STRATEGY.is_field_named() {
        return None;
    }

    keys.map(|key| key.to_field_name().map(FieldName::ByName))
        .collect()
}

/// Implements [`MapKey`] as [`Strategy::StringConvertible`] through the
/// type's `Display` and `FromStr` impls.
#[macro_export]
macro_rules! string_convertible {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::MapKey for $ty {
                const STRATEGY: $crate::Strategy = $crate::Strategy::StringConvertible;

                fn to_field_name(&self) -> ::std::option::Option<::std::borrow::Cow<'_, str>> {
                    ::std::option::Option::Some(::std::borrow::Cow::Owned(
                        ::std::string::ToString::to_string(self),
                    ))
                }

                fn from_field_name(name: &str) -> ::std::option::Option<Self> {
                    ::std::str::FromStr::from_str(name).ok()
                }
            }
        )*
    };
}

/// Implements [`MapKey`] as [`Strategy::PairSequence`].
#[macro_export]
macro_rules! pair_keyed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::MapKey for $ty {}
        )*
    };
}

macro_rules! string_keyed {
    ($($ty:ty),*) => {
        $(
            impl MapKey for $ty {
                const STRATEGY: Strategy = Strategy::StringKeyed;

                fn to_field_name(&self) -> Option<Cow<'_, str>> {
                    Some(Cow::Borrowed(self.as_ref()))
                }

                fn from_field_name(name: &str) -> Option<Self> {
                    Some(name.into())
                }
            }
        )*
    };
}

string_keyed!(String, Box<str>, std::rc::Rc<str>, std::sync::Arc<str>);

string_convertible!(
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    bool,
    char,
    std::num::NonZeroU32,
    std::num::NonZeroU64,
    std::num::NonZeroUsize,
    std::net::IpAddr,
    std::net::Ipv4Addr,
    std::net::Ipv6Addr,
    std::net::SocketAddr,
);

pair_keyed!((), std::time::Duration);

impl<T> MapKey for Option<T> {}

impl<T> MapKey for Vec<T> {}

impl<T, const N: usize> MapKey for [T; N] {}

macro_rules! tuple_keyed {
    ($(($($name:ident),+)),*) => {
        $(
            impl<$($name),+> MapKey for ($($name,)+) {}
        )*
    };
}

tuple_keyed!(
    (A),
    (A, B),
    (A, B, C),
    (A, B, C, D),
    (A, B, C, D, E),
    (A, B, C, D, E, F)
);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classifies_by_type() {
        assert_eq!(Strategy::StringKeyed, Strategy::of::<String>());
        assert_eq!(Strategy::StringKeyed, Strategy::of::<Box<str>>());
        assert_eq!(Strategy::StringConvertible, Strategy::of::<u64>());
        assert_eq!(Strategy::StringConvertible, Strategy::of::<char>());
        assert_eq!(Strategy::PairSequence, Strategy::of::<(i32, i32)>());
        assert_eq!(Strategy::PairSequence, Strategy::of::<Vec<u8>>());
        assert_eq!(Strategy::PairSequence, Strategy::of::<Option<String>>());
    }

    #[test]
    fn converts_losslessly() {
        assert_eq!(
            Some("-12".to_string()),
            (-12i32).to_field_name().map(Cow::into_owned)
        );
        assert_eq!(Some(-12i32), i32::from_field_name("-12"));
        assert_eq!(None, u8::from_field_name("256"));
        assert_eq!(None, u8::from_field_name("spam"));

        let addr: std::net::SocketAddr = "127.0.0.1:6881".parse().unwrap();
        assert_eq!(
            Some(addr),
            addr.to_field_name()
                .and_then(|n| std::net::SocketAddr::from_field_name(&n))
        );
    }

    #[test]
    fn string_keys_are_their_own_field_names() {
        let key = "spam".to_string();

        assert!(matches!(key.to_field_name(), Some(Cow::Borrowed("spam"))));
        assert_eq!(Some(key), String::from_field_name("spam"));
    }

    #[test]
    fn names_every_key_or_none() {
        let keys = [1u8, 2, 3];
        let names = field_names(keys.iter()).unwrap();
        assert_eq!(
            vec!["1", "2", "3"],
            names.iter().map(FieldName::as_str).collect::<Vec<_>>()
        );

        let pairs = [(1, 2)];
        assert!(field_names(pairs.iter()).is_none());
    }
}
