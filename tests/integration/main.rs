//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the pump controller
//! against mock pins and a simulated clock.  All tests run on the host
//! (x86_64) with no real hardware required.

mod mock_hw;
mod phase_sync_tests;
