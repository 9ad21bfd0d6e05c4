//! Callback dispatch into registered objects.
//!
//! Native code never holds a callback target directly. It holds a
//! [`CallbackHandle`](jbridge_api::CallbackHandle) issued by a
//! [`CallbackTable`], names methods by [`MethodId`](jbridge_api::MethodId)
//! and picks the typed entry point matching the method's declared result.
//!
//! Invocation is only legal from the thread(s) the embedding host allows to
//! call into it. Tables created with
//! [`CallbackTable::bound_to_current_thread`] enforce this for a single
//! thread; otherwise it is the caller's obligation.

pub mod method;
pub mod registry;
mod table;
mod wrapper;

pub use method::{CallbackObject, MethodTable, method_id};
pub use registry::HandleRegistry;
pub use table::CallbackTable;
pub use wrapper::Callback;
