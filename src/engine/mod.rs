pub mod core;
pub mod dispatcher;
pub mod errors;
pub mod messages;
pub mod state;
pub mod worker;

// Re-export key components
pub use self::core::ComputeEngine;
pub use dispatcher::{Dispatcher, decode_request};
pub use errors::TaskError;
pub use messages::{ResponseBody, Task, TaskKind, TaskOutput, TaskRequest, TaskResponse};
pub use state::TaskState;
