//! Dotboard Render Library
//!
//! Renderer abstraction and implementations for Dotboard.
//! The default implementation uses Vello for GPU-accelerated rendering and
//! parley for text layout.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod text_layout;
#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use text_layout::ParleyMeasurer;
#[cfg(feature = "vello-renderer")]
pub use vello_impl::{GpuRenderer, VelloRenderer};
