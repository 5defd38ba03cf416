pub mod docdb;
pub mod logs;
pub mod opaque;
