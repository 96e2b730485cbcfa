pub mod backup_config;
pub mod executor;
pub mod filter;
pub mod job;
pub mod options;
pub mod paths;
pub mod result_error;
pub mod rsync;
pub mod validate;
