//! Integration test suite
//!
//! Every test runs the compiled `gantry` binary against a throwaway
//! bindings repository. See `helpers` for the fixture layout.

mod test_release;
mod test_version;
