pub mod classpath;
pub mod handle;
pub mod value;

pub use classpath::*;
pub use handle::*;
pub use value::*;
