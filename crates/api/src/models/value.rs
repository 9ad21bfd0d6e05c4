//! Boxed values exchanged with callback targets.
//!
//! Every argument and every result crossing the callback boundary is one of
//! these. The typed accessors turn a kind mismatch into an [`ApiError`]
//! instead of coercing, so a wrong `int` never silently becomes `0`.

use crate::error::{ApiError, ApiResult};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Kind of a boxed value, also used to name the typed invocation entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Void,
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Str,
    Object,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Void => "void",
            ValueKind::Boolean => "boolean",
            ValueKind::Byte => "byte",
            ValueKind::Char => "char",
            ValueKind::Short => "short",
            ValueKind::Int => "int",
            ValueKind::Long => "long",
            ValueKind::Float => "float",
            ValueKind::Double => "double",
            ValueKind::Str => "string",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque shared reference to an object living on the other side.
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn Any + Send + Sync>);

impl ObjectRef {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn from_arc(value: Arc<dyn Any + Send + Sync>) -> Self {
        Self(value)
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({:p})", Arc::as_ptr(&self.0))
    }
}

/// A boxed argument or result.
#[derive(Debug, Clone)]
pub enum Value {
    Unit,
    Boolean(bool),
    Byte(i8),
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    Object(ObjectRef),
    /// The null reference. Accepted wherever an object is expected.
    Null,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Unit => ValueKind::Void,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Byte(_) => ValueKind::Byte,
            Value::Char(_) => ValueKind::Char,
            Value::Short(_) => ValueKind::Short,
            Value::Int(_) => ValueKind::Int,
            Value::Long(_) => ValueKind::Long,
            Value::Float(_) => ValueKind::Float,
            Value::Double(_) => ValueKind::Double,
            Value::Str(_) => ValueKind::Str,
            Value::Object(_) | Value::Null => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Boolean,
    i8 => Byte,
    u16 => Char,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => Str,
    ObjectRef => Object,
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<Option<ObjectRef>> for Value {
    fn from(v: Option<ObjectRef>) -> Self {
        v.map(Value::Object).unwrap_or(Value::Null)
    }
}

// Result-side conversions. Each one accepts exactly its own kind.
macro_rules! value_into {
    ($($name:ident -> $ty:ty : $variant:ident => $kind:ident),* $(,)?) => {
        impl Value {
            $(
                pub fn $name(self) -> ApiResult<$ty> {
                    match self {
                        Value::$variant(v) => Ok(v),
                        other => Err(ApiError::ReturnKind {
                            expected: ValueKind::$kind,
                            found: other.kind(),
                        }),
                    }
                }
            )*
        }
    };
}

value_into! {
    into_boolean -> bool: Boolean => Boolean,
    into_byte -> i8: Byte => Byte,
    into_char -> u16: Char => Char,
    into_short -> i16: Short => Short,
    into_int -> i32: Int => Int,
    into_long -> i64: Long => Long,
    into_float -> f32: Float => Float,
    into_double -> f64: Double => Double,
    into_str -> String: Str => Str,
}

impl Value {
    /// Object result; `Null` maps to `None`.
    pub fn into_object(self) -> ApiResult<Option<ObjectRef>> {
        match self {
            Value::Object(obj) => Ok(Some(obj)),
            Value::Null => Ok(None),
            other => Err(ApiError::ReturnKind {
                expected: ValueKind::Object,
                found: other.kind(),
            }),
        }
    }
}

/// Positional access to a callback's argument list.
///
/// Mismatches are reported with the argument's index so the failure points
/// at the offending call site.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub fn new(values: &'a [Value]) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn expect_arity(&self, expected: usize) -> ApiResult<()> {
        if self.values.len() == expected {
            Ok(())
        } else {
            Err(ApiError::Arity {
                expected,
                found: self.values.len(),
            })
        }
    }

    pub fn get(&self, index: usize) -> ApiResult<&'a Value> {
        self.values.get(index).ok_or(ApiError::Arity {
            expected: index + 1,
            found: self.values.len(),
        })
    }

    fn mismatch(&self, index: usize, expected: ValueKind, found: &Value) -> ApiError {
        ApiError::ArgumentKind {
            index,
            expected,
            found: found.kind(),
        }
    }

    pub fn boolean(&self, index: usize) -> ApiResult<bool> {
        match self.get(index)? {
            Value::Boolean(v) => Ok(*v),
            other => Err(self.mismatch(index, ValueKind::Boolean, other)),
        }
    }

    pub fn int(&self, index: usize) -> ApiResult<i32> {
        match self.get(index)? {
            Value::Int(v) => Ok(*v),
            other => Err(self.mismatch(index, ValueKind::Int, other)),
        }
    }

    pub fn long(&self, index: usize) -> ApiResult<i64> {
        match self.get(index)? {
            Value::Long(v) => Ok(*v),
            other => Err(self.mismatch(index, ValueKind::Long, other)),
        }
    }

    pub fn double(&self, index: usize) -> ApiResult<f64> {
        match self.get(index)? {
            Value::Double(v) => Ok(*v),
            other => Err(self.mismatch(index, ValueKind::Double, other)),
        }
    }

    pub fn str(&self, index: usize) -> ApiResult<&'a str> {
        match self.get(index)? {
            Value::Str(v) => Ok(v.as_str()),
            other => Err(self.mismatch(index, ValueKind::Str, other)),
        }
    }

    /// Object argument; `Null` maps to `None`.
    pub fn object(&self, index: usize) -> ApiResult<Option<&'a ObjectRef>> {
        match self.get(index)? {
            Value::Object(obj) => Ok(Some(obj)),
            Value::Null => Ok(None),
            other => Err(self.mismatch(index, ValueKind::Object, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_accepts_only_own_kind() {
        assert_eq!(Value::Int(0).into_int(), Ok(0));
        assert_eq!(
            Value::Boolean(false).into_int(),
            Err(ApiError::ReturnKind {
                expected: ValueKind::Int,
                found: ValueKind::Boolean,
            })
        );
        assert!(Value::Long(5).into_int().is_err());
    }

    #[test]
    fn test_null_is_an_object() {
        assert_eq!(Value::Null.kind(), ValueKind::Object);
        assert!(Value::Null.into_object().unwrap().is_none());
        assert!(Value::Unit.into_object().is_err());
    }

    #[test]
    fn test_object_equality_is_identity() {
        let a = ObjectRef::new(42u32);
        let b = ObjectRef::new(42u32);
        assert_eq!(Value::Object(a.clone()), Value::Object(a.clone()));
        assert_ne!(Value::Object(a), Value::Object(b));
    }

    #[test]
    fn test_args_reports_index() {
        let values = vec![Value::Int(1), Value::from("x")];
        let args = Args::new(&values);
        assert_eq!(args.int(0), Ok(1));
        assert_eq!(args.str(1), Ok("x"));
        assert_eq!(
            args.int(1),
            Err(ApiError::ArgumentKind {
                index: 1,
                expected: ValueKind::Int,
                found: ValueKind::Str,
            })
        );
        assert_eq!(
            args.int(2),
            Err(ApiError::Arity {
                expected: 3,
                found: 2
            })
        );
        assert!(args.expect_arity(2).is_ok());
    }
}
