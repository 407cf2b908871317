pub mod advisor;
pub mod day_service;
pub mod task_service;
