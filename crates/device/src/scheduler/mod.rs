mod task;

pub use task::{ScheduledTask, TaskHandle};
