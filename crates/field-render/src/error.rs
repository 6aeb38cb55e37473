//! Fatal initialization errors
//!
//! A missing drawing surface is a configuration error surfaced to the
//! caller, not a silent no-op. Per-frame surface errors are handled by the
//! frame loop instead and never reach this type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to acquire GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}
