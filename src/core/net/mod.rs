pub mod fd;
pub mod limit;
