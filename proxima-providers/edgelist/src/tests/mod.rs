//! Unit tests for edge-list parsing and loading.
