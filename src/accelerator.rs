//! Hardware accelerator selection shared by the transcriber and the
//! translation loader.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::process::Command;
use tracing::debug;

/// Compute device a model runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Cuda => "cuda",
        }
    }

    pub fn is_gpu(&self) -> bool {
        matches!(self, Device::Cuda)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the device is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePolicy {
    /// Use CUDA when a GPU is visible, CPU otherwise
    #[default]
    Auto,
    Cpu,
    Cuda,
}

/// Probe for a CUDA capable GPU
pub struct Accelerator {
    probe_binary: String,
}

impl Accelerator {
    pub fn new() -> Self {
        Self::with_probe("nvidia-smi")
    }

    pub fn with_probe<S: Into<String>>(probe_binary: S) -> Self {
        Self {
            probe_binary: probe_binary.into(),
        }
    }

    /// Resolve a policy to a concrete device
    pub async fn select(&self, policy: DevicePolicy) -> Device {
        match policy {
            DevicePolicy::Cpu => Device::Cpu,
            DevicePolicy::Cuda => Device::Cuda,
            DevicePolicy::Auto => {
                if self.cuda_available().await {
                    Device::Cuda
                } else {
                    Device::Cpu
                }
            }
        }
    }

    /// A GPU is considered present when the driver tool lists at least one device
    pub async fn cuda_available(&self) -> bool {
        match Command::new(&self.probe_binary).arg("-L").output().await {
            Ok(output) if output.status.success() => {
                let listing = String::from_utf8_lossy(&output.stdout);
                let found = listing.lines().any(|line| line.trim_start().starts_with("GPU"));
                debug!("{} reported GPU present: {}", self.probe_binary, found);
                found
            }
            Ok(output) => {
                debug!("{} exited with {}", self.probe_binary, output.status);
                false
            }
            Err(e) => {
                debug!("{} unavailable: {}", self.probe_binary, e);
                false
            }
        }
    }
}

impl Default for Accelerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_forced_policies_skip_probe() {
        let accelerator = Accelerator::with_probe("transub-no-such-probe");
        assert_eq!(accelerator.select(DevicePolicy::Cpu).await, Device::Cpu);
        assert_eq!(accelerator.select(DevicePolicy::Cuda).await, Device::Cuda);
    }

    #[tokio::test]
    async fn test_missing_probe_means_cpu() {
        let accelerator = Accelerator::with_probe("transub-no-such-probe");
        assert!(!accelerator.cuda_available().await);
        assert_eq!(accelerator.select(DevicePolicy::Auto).await, Device::Cpu);
    }

    #[test]
    fn test_policy_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            device: DevicePolicy,
        }
        let parsed: Wrapper = toml::from_str("device = \"cuda\"").unwrap();
        assert_eq!(parsed.device, DevicePolicy::Cuda);
    }
}
