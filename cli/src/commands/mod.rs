pub mod alarm;
pub mod config;
pub mod logs;
pub mod status;
