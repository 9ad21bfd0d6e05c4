use super::method::{CallbackObject, method_id};
use super::registry::HandleRegistry;
use jbridge_api::{ApiError, ApiResult, CallbackHandle, MethodId, ObjectRef, Value};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, ThreadId};
use tracing::{debug, warn};

type Targets = HandleRegistry<Arc<dyn CallbackObject>>;

macro_rules! typed_invoke {
    ($($(#[$meta:meta])* $name:ident -> $ty:ty => $convert:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(
                &self,
                handle: CallbackHandle,
                method: MethodId,
                args: &[Value],
            ) -> ApiResult<$ty> {
                self.invoke(handle, method, args)?.$convert()
            }
        )*
    };
}

/// Registry of callback targets reachable from native code.
///
/// Registering a target stores one strong reference to it; that reference is
/// the keep-alive the native side owns until it calls [`release`](Self::release).
pub struct CallbackTable {
    targets: RwLock<Targets>,
    owner: Option<ThreadId>,
}

impl Default for CallbackTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CallbackTable {
    /// Table callable from any thread; thread discipline is up to the caller.
    pub fn new() -> Self {
        Self {
            targets: RwLock::new(HandleRegistry::new()),
            owner: None,
        }
    }

    /// Table whose `invoke*` calls fail with [`ApiError::WrongThread`] off the
    /// creating thread.
    pub fn bound_to_current_thread() -> Self {
        Self {
            targets: RwLock::new(HandleRegistry::new()),
            owner: Some(thread::current().id()),
        }
    }

    pub fn owner(&self) -> Option<ThreadId> {
        self.owner
    }

    /// Same as [`method_id`].
    pub fn resolve(&self, method_name: &str) -> MethodId {
        method_id(method_name)
    }

    pub fn register(&self, target: Arc<dyn CallbackObject>) -> ApiResult<CallbackHandle> {
        let handle = self.write()?.insert(target);
        debug!("Registered callback target {}", handle);
        Ok(handle)
    }

    /// Drops the table's reference to the target.
    ///
    /// Allowed from any thread: wrappers may be torn down wherever their last
    /// owner goes away.
    pub fn release(&self, handle: CallbackHandle) -> ApiResult<()> {
        // The guard must be gone before the target drops: a target may own
        // wrappers registered in this same table.
        let removed = self.write()?.remove(handle);
        match removed {
            Some(target) => {
                drop(target);
                debug!("Released callback target {}", handle);
                Ok(())
            }
            None => {
                warn!("Release of stale callback handle {}", handle);
                Err(ApiError::StaleHandle(handle))
            }
        }
    }

    pub fn is_live(&self, handle: CallbackHandle) -> bool {
        self.read().map(|targets| targets.contains(handle)).unwrap_or(false)
    }

    pub fn live_count(&self) -> usize {
        self.read().map(|targets| targets.len()).unwrap_or(0)
    }

    /// Calls `method` on the target and returns whatever it produced.
    pub fn invoke(
        &self,
        handle: CallbackHandle,
        method: MethodId,
        args: &[Value],
    ) -> ApiResult<Value> {
        self.check_thread()?;

        // The lock is not held during the call so the target may re-enter.
        let target = self
            .read()?
            .get(handle)
            .cloned()
            .ok_or(ApiError::StaleHandle(handle))?;

        debug!("Invoking method {} on {}", method, handle);
        target.call(method, args)
    }

    /// Runs the method for its effect; any produced value is discarded.
    pub fn invoke_void(
        &self,
        handle: CallbackHandle,
        method: MethodId,
        args: &[Value],
    ) -> ApiResult<()> {
        self.invoke(handle, method, args).map(drop)
    }

    typed_invoke! {
        invoke_boolean -> bool => into_boolean,
        invoke_byte -> i8 => into_byte,
        /// UTF-16 code unit.
        invoke_char -> u16 => into_char,
        invoke_short -> i16 => into_short,
        invoke_int -> i32 => into_int,
        invoke_long -> i64 => into_long,
        invoke_float -> f32 => into_float,
        invoke_double -> f64 => into_double,
        invoke_str -> String => into_str,
        /// `None` is the null reference.
        invoke_object -> Option<ObjectRef> => into_object,
    }

    fn check_thread(&self) -> ApiResult<()> {
        match self.owner {
            Some(owner) if owner != thread::current().id() => Err(ApiError::WrongThread),
            _ => Ok(()),
        }
    }

    fn read(&self) -> ApiResult<RwLockReadGuard<'_, Targets>> {
        self.targets
            .read()
            .map_err(|_| ApiError::Internal("callback table lock poisoned".to_string()))
    }

    fn write(&self) -> ApiResult<RwLockWriteGuard<'_, Targets>> {
        self.targets
            .write()
            .map_err(|_| ApiError::Internal("callback table lock poisoned".to_string()))
    }
}
