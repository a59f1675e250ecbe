//! Última Milla backoffice tooling.
//!
//! - [`place`]: where an action menu panel opens for a trigger rectangle.
//! - [`backoffice`]: the user table, one action menu per row.
//! - [`demo`]: a scripted session over that table, driven headlessly.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod backoffice;
pub mod demo;
pub mod place;
