//! Response DTOs. Request bodies are the payload types of `staffgate-service`.

pub mod response;
