//! Property-based tests for history ordering and response validation

mod response_parsing;
