pub mod backup_cmd;
pub mod cache_cmd;
pub mod merge;
