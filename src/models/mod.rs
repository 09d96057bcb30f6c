pub mod task;
pub mod user;

pub use task::{
    CreateTaskRequest, SortOrder, Task, TaskListQuery, TaskPriority, TaskSortBy, TaskStats,
    TaskStatus, UpdateTaskRequest,
};
pub use user::{User, UserResponse};
