//! Benchmarks live under `benchmarks/`.
