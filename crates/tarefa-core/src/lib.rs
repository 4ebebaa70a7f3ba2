pub mod ids;
pub mod model;

pub use ids::TaskId;
pub use model::{Completion, NewTask, Task};
