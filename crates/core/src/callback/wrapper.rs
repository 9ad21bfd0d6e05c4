use super::method::CallbackObject;
use super::table::CallbackTable;
use jbridge_api::{ApiError, ApiResult, CallbackHandle, MethodId, ObjectRef, Value};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

macro_rules! typed_call {
    ($($name:ident => $invoke:ident -> $ty:ty),* $(,)?) => {
        $(
            pub fn $name(&self, method: MethodId, args: &[Value]) -> ApiResult<$ty> {
                self.table.$invoke(self.live_handle()?, method, args)
            }
        )*
    };
}

/// Owner of one registration in a [`CallbackTable`].
///
/// The registration is released exactly once: by [`dispose`](Self::dispose)
/// or, failing that, when the wrapper is dropped.
pub struct Callback {
    table: Arc<CallbackTable>,
    handle: Option<CallbackHandle>,
}

impl Callback {
    pub fn new(table: Arc<CallbackTable>, target: Arc<dyn CallbackObject>) -> ApiResult<Self> {
        let handle = table.register(target)?;
        Ok(Self {
            table,
            handle: Some(handle),
        })
    }

    pub fn handle(&self) -> Option<CallbackHandle> {
        self.handle
    }

    pub fn call(&self, method: MethodId, args: &[Value]) -> ApiResult<Value> {
        self.table.invoke(self.live_handle()?, method, args)
    }

    typed_call! {
        call_void => invoke_void -> (),
        call_boolean => invoke_boolean -> bool,
        call_byte => invoke_byte -> i8,
        call_char => invoke_char -> u16,
        call_short => invoke_short -> i16,
        call_int => invoke_int -> i32,
        call_long => invoke_long -> i64,
        call_float => invoke_float -> f32,
        call_double => invoke_double -> f64,
        call_str => invoke_str -> String,
        call_object => invoke_object -> Option<ObjectRef>,
    }

    /// Releases the registration now and reports the outcome.
    pub fn dispose(mut self) -> ApiResult<()> {
        match self.handle.take() {
            Some(handle) => self.table.release(handle),
            None => Ok(()),
        }
    }

    fn live_handle(&self) -> ApiResult<CallbackHandle> {
        self.handle
            .ok_or_else(|| ApiError::Internal("callback already disposed".to_string()))
    }
}

impl Drop for Callback {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.table.release(handle) {
                warn!("Failed to release callback {}: {}", handle, e);
            }
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").field("handle", &self.handle).finish()
    }
}
