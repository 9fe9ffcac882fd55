//! Field accessors: a getter/setter pair that lets a combinator read one part
//! of an owner's state and commit a new value for it.
//!
//! `Field::new` takes both halves explicitly. For the common case of a single
//! struct field, `field!` writes the setter for you from the getter's shape.

use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;

type Getter<S, F> = Arc<dyn Fn(&S) -> &F + Send + Sync>;
type Setter<S, F> = Arc<dyn Fn(S, F) -> S + Send + Sync>;

pub struct Field<S, F> {
    get: Getter<S, F>,
    set: Setter<S, F>,
}

impl<S, F> Clone for Field<S, F> {
    fn clone(&self) -> Self {
        Self {
            get: Arc::clone(&self.get),
            set: Arc::clone(&self.set),
        }
    }
}

impl<S, F> fmt::Debug for Field<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field").finish_non_exhaustive()
    }
}

impl<S: 'static, F: 'static> Field<S, F> {
    pub fn new<G, W>(get: G, set: W) -> Self
    where
        G: Fn(&S) -> &F + Send + Sync + 'static,
        W: Fn(S, F) -> S + Send + Sync + 'static,
    {
        Self {
            get: Arc::new(get),
            set: Arc::new(set),
        }
    }
}

impl<S, F> Field<S, F> {
    pub fn get<'a>(&self, state: &'a S) -> &'a F {
        (self.get)(state)
    }

    /// Commit `value` into `state`, consuming the old owner value.
    pub fn set(&self, state: S, value: F) -> S {
        (self.set)(state, value)
    }
}

/// Backing function for `field!`. Not meant to be called directly.
#[doc(hidden)]
pub fn synthesize<S, F, G, W>(
    getter: &str,
    param: &str,
    object: &str,
    get: G,
    set: W,
) -> Result<Field<S, F>, ConfigError>
where
    S: 'static,
    F: 'static,
    G: Fn(&S) -> &F + Send + Sync + 'static,
    W: Fn(S, F) -> S + Send + Sync + 'static,
{
    if param != object {
        return Err(ConfigError::ParameterMismatch {
            getter: getter.to_string(),
            param: param.to_string(),
            object: object.to_string(),
        });
    }
    Ok(Field::new(get, set))
}

/// Build a `Field` from a single-field getter, deriving the setter.
///
/// Two shapes are recognised: `|s: &T| s.name` and `|s: &T| { s.name }`.
/// The parameter must carry its type; the field access is checked before
/// anything else could fix `T`.
///
/// ```
/// use trellis_engine::{field, ConfigError, Field};
///
/// struct Counter {
///     count: u32,
/// }
///
/// let count: Field<Counter, u32> = field!(|s: &Counter| s.count)?;
/// assert_eq!(count.set(Counter { count: 0 }, 5).count, 5);
/// # Ok::<(), ConfigError>(())
/// ```
///
/// An unannotated parameter is rejected at compile time:
///
/// ```compile_fail
/// use trellis_engine::{field, ConfigError, Field};
///
/// struct Counter {
///     count: u32,
/// }
///
/// let count: Result<Field<Counter, u32>, ConfigError> = field!(|s| s.count);
/// ```
///
/// The object before the dot must be the closure's own parameter. Anything
/// else (nested access, method calls, indexing) evaluates to
/// `Err(ConfigError::GetterTooComplex)`; use `Field::new` with an explicit
/// setter for those.
#[macro_export]
macro_rules! field {
    (|$param:ident : $ty:ty| $object:ident . $name:ident) => {
        $crate::field::synthesize(
            stringify!(|$param: $ty| $object.$name),
            stringify!($param),
            stringify!($object),
            |$param: $ty| &$param.$name,
            |mut state, value| {
                state.$name = value;
                state
            },
        )
    };
    (|$param:ident : $ty:ty| { $object:ident . $name:ident }) => {
        $crate::field::synthesize(
            stringify!(|$param: $ty| { $object.$name }),
            stringify!($param),
            stringify!($object),
            |$param: $ty| &$param.$name,
            |mut state, value| {
                state.$name = value;
                state
            },
        )
    };
    (|$param:ident| $object:ident . $name:ident) => {
        ::core::compile_error!(concat!(
            "field! needs a typed parameter, e.g. `|",
            stringify!($param),
            ": &State| ",
            stringify!($object.$name),
            "`"
        ))
    };
    (|$param:ident| { $object:ident . $name:ident }) => {
        ::core::compile_error!(concat!(
            "field! needs a typed parameter, e.g. `|",
            stringify!($param),
            ": &State| { ",
            stringify!($object.$name),
            " }`"
        ))
    };
    ($($getter:tt)*) => {
        ::core::result::Result::Err($crate::ConfigError::GetterTooComplex {
            getter: stringify!($($getter)*).to_string(),
        })
    };
}
