pub mod advice;
pub mod error;
pub mod history;
pub mod ordering;
pub mod repository;
pub mod scoring;
pub mod summary;
pub mod task;
