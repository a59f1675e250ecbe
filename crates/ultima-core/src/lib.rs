//! Core types and traits for the Última Milla backoffice UI.
//!
//! This crate provides foundational types used throughout the workspace:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color representation: [`Color`]
//! - Layout constraints: [`Constraints`]
//! - Events: [`Event`], [`Key`], [`MouseButton`]
//! - The [`Widget`] and [`Canvas`] traits, plus [`RecordingCanvas`]
//! - Time-driven [`Transition`]s with [`Easing`] curves
//! - The top-level overlay layer: [`paint_frame`]
//! - The reference-counted document [`ScrollLock`]

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::missing_const_for_fn)]

mod canvas;
mod color;
mod constraints;
mod event;
mod geometry;
pub mod layer;
mod scroll_lock;
mod transition;
pub mod widget;

pub use canvas::{DrawCommand, RecordingCanvas};
pub use color::Color;
pub use constraints::Constraints;
pub use event::{Event, Key, MouseButton, PointerId, PointerType};
pub use geometry::{CornerRadius, Point, Rect, Size};
pub use layer::paint_frame;
pub use scroll_lock::{ScrollLock, ScrollLockGuard, ScrollLockStats};
pub use transition::{Easing, Transition};
pub use widget::{
    AccessibleRole, Canvas, FontWeight, LayoutResult, TextStyle, Transform2D, TypeId, Widget,
};
