//! NourRise: daily task tracking with completion rates, a score out of 20
//! and a validated-days history.

pub mod application;
pub mod config;
pub mod domain;
pub mod http;
pub mod infrastructure;
