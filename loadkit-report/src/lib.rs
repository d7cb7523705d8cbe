pub mod aggregate;
pub mod endpoint;
pub mod sample;
pub mod stats;
pub mod summary;
pub mod writer;
