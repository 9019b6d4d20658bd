//! Integration tests exercising the library end to end

mod persistence_tests;
