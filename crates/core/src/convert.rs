//! Value-to-string conversion
//!
//! Failure messages render values through converters registered per exact
//! type. A converter registered for `Vec<u8>` applies to `Vec<u8>` only: there
//! is no supertype or trait-object matching. Values without a converter fall
//! back to their `Debug` representation.

use std::any::{self, Any, TypeId};
use std::fmt;
use std::sync::Arc;

type ConvertFn = dyn Fn(&dyn Any) -> Option<String> + Send + Sync;

/// Renders values of one exact type for failure messages.
///
/// Cloning is cheap; clones share the same function and compare equal
/// through [`StringConverter::same_as`].
///
/// # Examples
///
/// ```
/// use stipulate_core::StringConverter;
///
/// let hex = StringConverter::of::<u32, _>(|v| format!("{v:#x}"));
/// assert_eq!(hex.convert(&255u32), Some("0xff".to_string()));
/// assert_eq!(hex.convert(&255u64), None);
/// ```
#[derive(Clone)]
pub struct StringConverter {
    type_id: TypeId,
    type_name: &'static str,
    convert: Arc<ConvertFn>,
}

impl StringConverter {
    /// Create a converter for values of type `T`.
    pub fn of<T, F>(f: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        StringConverter {
            type_id: TypeId::of::<T>(),
            type_name: any::type_name::<T>(),
            convert: Arc::new(move |value: &dyn Any| value.downcast_ref::<T>().map(|v| f(v))),
        }
    }

    /// The exact type this converter accepts
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Name of the accepted type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Convert a value, or `None` if it is not of the accepted type.
    pub fn convert(&self, value: &dyn Any) -> Option<String> {
        (self.convert)(value)
    }

    /// True if both handles share one conversion function.
    pub fn same_as(&self, other: &StringConverter) -> bool {
        Arc::ptr_eq(&self.convert, &other.convert)
    }
}

impl fmt::Debug for StringConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringConverter")
            .field("type", &self.type_name)
            .finish()
    }
}
