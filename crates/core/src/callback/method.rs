use jbridge_api::{ApiError, ApiResult, Args, MethodId, Value};
use std::collections::HashMap;
use std::fmt;

/// Hashes a method name to its identifier.
///
/// `h = 223 * h + byte` over the UTF-8 bytes, truncated to 31 bits and
/// sign-extended. Pure: equal names give equal ids in every process.
pub fn method_id(name: &str) -> MethodId {
    let mut accu: i64 = 0;
    for &byte in name.as_bytes() {
        accu = accu.wrapping_mul(223).wrapping_add(byte as i64);
    }
    let low = (accu as u32) & 0x7FFF_FFFF;
    MethodId::from_raw((((low << 1) as i32) >> 1) as i64)
}

/// A target that public methods can be invoked on by id.
pub trait CallbackObject: Send + Sync {
    fn call(&self, method: MethodId, args: &[Value]) -> ApiResult<Value>;
}

type MethodFn = dyn Fn(Args<'_>) -> ApiResult<Value> + Send + Sync;

/// Callback object assembled from named closures.
#[derive(Default)]
pub struct MethodTable {
    methods: HashMap<MethodId, (String, Box<MethodFn>)>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `body`, replacing an earlier body of the same name.
    ///
    /// Fails if a different name already owns the same id.
    pub fn define<F>(&mut self, name: &str, body: F) -> ApiResult<MethodId>
    where
        F: Fn(Args<'_>) -> ApiResult<Value> + Send + Sync + 'static,
    {
        let id = method_id(name);
        if let Some((existing, _)) = self.methods.get(&id) {
            if existing != name {
                return Err(ApiError::MethodCollision {
                    name: name.to_string(),
                    existing: existing.clone(),
                    id,
                });
            }
        }
        self.methods.insert(id, (name.to_string(), Box::new(body)));
        Ok(id)
    }

    pub fn with<F>(mut self, name: &str, body: F) -> ApiResult<Self>
    where
        F: Fn(Args<'_>) -> ApiResult<Value> + Send + Sync + 'static,
    {
        self.define(name, body)?;
        Ok(self)
    }

    pub fn name_of(&self, id: MethodId) -> Option<&str> {
        self.methods.get(&id).map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl CallbackObject for MethodTable {
    fn call(&self, method: MethodId, args: &[Value]) -> ApiResult<Value> {
        let (_, body) = self
            .methods
            .get(&method)
            .ok_or(ApiError::UnknownMethod(method))?;
        body(Args::new(args))
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.methods.values().map(|(name, _)| name.as_str()).collect();
        names.sort_unstable();
        f.debug_struct("MethodTable").field("methods", &names).finish()
    }
}
