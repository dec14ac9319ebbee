//! Integration tests for the metadata and messaging crates live under `tests/`.
