//! Shared error types for the catalog generation system

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Serialization failed: {message}")]
    SerializationError { message: String },

    #[error("Invalid UUID: {input}")]
    InvalidUuid { input: String },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },

    #[error("Unknown product status: {input}")]
    InvalidStatus { input: String },

    #[error("Malformed cache scope key: {input}")]
    InvalidScopeKey { input: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
