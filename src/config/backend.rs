// Device selection for loaded models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Device a loaded model is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// CPU (works everywhere)
    Cpu,
    /// NVIDIA CUDA GPU
    Cuda,
    /// Apple Metal Performance Shaders
    Mps,
    /// Pick the best available device
    #[default]
    Auto,
}

impl Device {
    /// Get short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Cuda => "cuda",
            Device::Mps => "mps",
            Device::Auto => "auto",
        }
    }

    /// Check if this device can be used on the current build
    ///
    /// Compile-time view only: CUDA needs the `cuda` feature, MPS needs macOS.
    pub fn is_available(&self) -> bool {
        match self {
            Device::Cpu | Device::Auto => true,
            Device::Cuda => cfg!(feature = "cuda"),
            Device::Mps => cfg!(target_os = "macos"),
        }
    }

    /// Select best available device automatically
    pub fn auto_select() -> Device {
        if Device::Cuda.is_available() {
            return Device::Cuda;
        }
        if Device::Mps.is_available() {
            return Device::Mps;
        }
        Device::Cpu
    }

    /// Resolve `Auto` to a concrete device and fall back to CPU for
    /// devices this build cannot use
    pub fn resolve(&self) -> Device {
        match self {
            Device::Auto => Device::auto_select(),
            device if device.is_available() => *device,
            device => {
                tracing::warn!("{} not available in this build, using cpu", device.name());
                Device::Cpu
            }
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Device {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "cuda" | "gpu" => Ok(Device::Cuda),
            "mps" | "metal" => Ok(Device::Mps),
            "auto" => Ok(Device::Auto),
            other => anyhow::bail!("Unknown device: {}", other),
        }
    }
}
