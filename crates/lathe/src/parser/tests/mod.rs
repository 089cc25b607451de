//! End-to-end grammar tests: whole grammars built from the public API,
//! exercising tokenization helpers, recursion through slots, the
//! expression engine, and error reporting together.

mod json_tests;
