pub mod error;
pub mod file;
pub mod iterator;
pub mod kv;
pub mod memory;
pub mod options;
