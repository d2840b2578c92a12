//! gradsnip-test - Regression test framework for GradSnip
//!
//! A small version of the regression helpers used throughout the
//! workspace's `tests/*_reg.rs` files, plus synthetic input images.
//!
//! # Usage
//!
//! ```ignore
//! use gradsnip_test::RegParams;
//!
//! let mut rp = RegParams::new("gradient");
//! rp.compare_values(110.0, threshold as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: "compare" (default) or "display". Display mode also
//!   writes result images to `tests/regout` under the workspace root.

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};
pub use synth::{bmp_bytes, gradient_image, page_background, page_ink, unevenly_lit_page};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // gradsnip-test is at crates/gradsnip-test
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
