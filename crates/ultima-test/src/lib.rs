//! Testing harness for Última Milla widgets.
//!
//! ```ignore
//! use ultima_test::Harness;
//!
//! let mut harness = Harness::new(menu).viewport(1280.0, 800.0);
//! harness.click("#user-1-menu").tick(16);
//! harness.assert_scroll_locked(true);
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::missing_panics_doc)]

mod harness;
mod selector;

pub use harness::Harness;
pub use selector::{Selector, SelectorError};
