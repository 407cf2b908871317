pub mod history;
pub mod tasks;
