// Market data domain
pub mod market;

// Machine learning domain
pub mod ml;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
