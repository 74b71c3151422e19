mod auth;
mod health_check;
mod tasks;

pub use auth::{login, logout, me, refresh, register, REFRESH_COOKIE};
pub use health_check::health_check;
pub use tasks::{create_task, delete_task, get_task, list_tasks, update_task};
