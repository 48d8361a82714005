//! Runtime method replay
//!
//! A `DeferredQuery` records builder calls as `RuntimeMethod`s. Replaying the
//! log against a `CommandBuilder` of any dialect goes through a `MethodTable`,
//! a typed map from `MethodKey` to handler.

pub mod deferred;
pub mod method;
pub mod table;

pub use deferred::DeferredQuery;
pub use method::{MethodArgument, MethodKey, MethodQueue, RuntimeMethod};
pub use table::MethodTable;
