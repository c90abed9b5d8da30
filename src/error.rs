//! Error types for hairsim.
//!
//! Setup can fail while loading the growth map, reading a scene config, or
//! bringing up the GPU. Per-sample and per-vertex degeneracies are absorbed
//! where they happen and never show up here.

use std::fmt;

/// Errors that can occur while loading a growth map.
#[derive(Debug)]
pub enum GrowthMapError {
    /// The image decoder rejected the file.
    ImageLoad(image::ImageError),
    /// Failed to read file from disk.
    Io(std::io::Error),
    /// The image has no pixels to look up.
    Empty { width: u32, height: u32 },
    /// Raw pixel data does not match the stated dimensions.
    SizeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for GrowthMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthMapError::ImageLoad(e) => write!(f, "Failed to load growth map image: {}", e),
            GrowthMapError::Io(e) => write!(f, "Failed to read growth map file: {}", e),
            GrowthMapError::Empty { width, height } => write!(
                f,
                "Growth map is empty ({}x{}); it does not appear to be a valid image",
                width, height
            ),
            GrowthMapError::SizeMismatch { expected, actual } => write!(
                f,
                "Growth map data size mismatch: expected {} bytes, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for GrowthMapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GrowthMapError::ImageLoad(e) => Some(e),
            GrowthMapError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for GrowthMapError {
    fn from(e: image::ImageError) -> Self {
        GrowthMapError::ImageLoad(e)
    }
}

impl From<std::io::Error> for GrowthMapError {
    fn from(e: std::io::Error) -> Self {
        GrowthMapError::Io(e)
    }
}

/// Errors that can occur while loading or saving a scene config.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    Io(std::io::Error),
    /// The file is not valid scene JSON.
    Json(serde_json::Error),
    /// A value is outside the range the core accepts.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access scene config: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse scene config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid scene config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that abort the interactive viewer.
#[derive(Debug)]
pub enum ViewerError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// The growth map could not be loaded.
    GrowthMap(GrowthMapError),
    /// The scene config could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            ViewerError::Window(e) => write!(f, "Failed to create window: {}", e),
            ViewerError::Gpu(e) => write!(f, "GPU error: {}", e),
            ViewerError::GrowthMap(e) => write!(f, "{}", e),
            ViewerError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::EventLoop(e) => Some(e),
            ViewerError::Window(e) => Some(e),
            ViewerError::Gpu(e) => Some(e),
            ViewerError::GrowthMap(e) => Some(e),
            ViewerError::Config(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for ViewerError {
    fn from(e: winit::error::EventLoopError) -> Self {
        ViewerError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for ViewerError {
    fn from(e: winit::error::OsError) -> Self {
        ViewerError::Window(e)
    }
}

impl From<GpuError> for ViewerError {
    fn from(e: GpuError) -> Self {
        ViewerError::Gpu(e)
    }
}

impl From<GrowthMapError> for ViewerError {
    fn from(e: GrowthMapError) -> Self {
        ViewerError::GrowthMap(e)
    }
}

impl From<ConfigError> for ViewerError {
    fn from(e: ConfigError) -> Self {
        ViewerError::Config(e)
    }
}
