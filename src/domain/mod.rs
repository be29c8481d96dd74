pub mod documents;
pub mod error;
pub mod file_type;
pub mod parsing;
pub mod upload;
