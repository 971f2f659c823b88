//! Store access: the table and object store seams, their AWS and in-memory
//! implementations, and upload body extraction.

pub mod dynamodb;
pub mod memory;
pub mod multipart;
pub mod object_store;
pub mod s3;
pub mod table_store;
