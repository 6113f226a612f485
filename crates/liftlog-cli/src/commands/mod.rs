pub mod config;
pub mod template;
pub mod timer;
pub mod workout;
