//! JSON configuration for the sender and the relay.

use std::fs;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use aerotrack_telemetry::{PublisherConfig, RelayConfig};
use aerotrack_vision::{PipelineParams, VisionError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Vision(#[from] VisionError),
    #[error("send period must be positive")]
    ZeroPeriod,
    #[error("invalid resolution {width}x{height}: both sides must be positive")]
    InvalidResolution { width: u32, height: u32 },
}

/// Pretty JSON load/store for configuration types.
pub trait JsonConfig: Serialize + DeserializeOwned {
    /// Load a JSON config from disk. Missing fields take their defaults.
    fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl JsonConfig for SenderConfig {}
impl JsonConfig for RelayConfig {}

/// `Duration` as floating-point seconds.
mod seconds {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(|e| D::Error::custom(format!("{secs} s: {e}")))
    }
}

/// Frame size the vision loop works at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Sender process configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    /// Where angle datagrams go.
    pub destination: SocketAddr,
    #[serde(with = "seconds")]
    pub send_period: Duration,
    pub resolution: Resolution,
    /// Capture device index used by the camera source.
    pub camera_index: i32,
    /// Pause after the source reports no frame.
    #[serde(with = "seconds")]
    pub retry_delay: Duration,
    pub pipeline: PipelineParams,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            destination: SocketAddr::from((Ipv4Addr::LOCALHOST, 5005)),
            send_period: Duration::from_millis(2),
            resolution: Resolution::default(),
            camera_index: 0,
            retry_delay: Duration::from_millis(10),
            pipeline: PipelineParams::default(),
        }
    }
}

impl SenderConfig {
    /// Check the values that deserialization alone cannot reject.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.send_period.is_zero() {
            return Err(ConfigError::ZeroPeriod);
        }
        self.resolution.validate()?;
        self.pipeline.detector.validate()?;
        self.pipeline.tracker.validate()?;
        Ok(())
    }

    pub fn publisher(&self) -> PublisherConfig {
        PublisherConfig {
            destination: self.destination,
            period: self.send_period,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let cfg = SenderConfig::default();
        assert_eq!(cfg.destination, "127.0.0.1:5005".parse().unwrap());
        assert_eq!(cfg.send_period, Duration::from_millis(2));
        assert_eq!(cfg.resolution, Resolution { width: 1280, height: 720 });
        assert_eq!(cfg.retry_delay, Duration::from_millis(10));
        assert_eq!(cfg.camera_index, 0);
        assert_eq!(cfg.pipeline.detector.min_area_ratio, 0.0005);
        assert_eq!(cfg.pipeline.tracker.alpha, 0.1);
        assert_eq!(cfg.pipeline.segmentation.lower, [20, 100, 100]);
        assert_eq!(cfg.pipeline.segmentation.upper, [35, 255, 255]);
        assert!(cfg.pipeline.angle.snap_to_pixel);
        cfg.validate().unwrap();
    }

    #[test]
    fn durations_are_seconds_in_json() {
        let json = serde_json::to_value(SenderConfig::default()).unwrap();
        assert_eq!(json["send_period"], serde_json::json!(0.002));
        assert_eq!(json["retry_delay"], serde_json::json!(0.01));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SenderConfig =
            serde_json::from_str(r#"{"destination":"10.1.2.3:9000","send_period":0.005}"#).unwrap();
        assert_eq!(cfg.destination.port(), 9000);
        assert_eq!(cfg.send_period, Duration::from_millis(5));
        assert_eq!(cfg.resolution, Resolution::default());
    }

    #[test]
    fn negative_duration_is_rejected() {
        let err = serde_json::from_str::<SenderConfig>(r#"{"retry_delay":-1.0}"#);
        assert!(err.is_err());
    }

    #[test]
    fn zero_period_fails_validation() {
        let cfg = SenderConfig {
            send_period: Duration::ZERO,
            ..SenderConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroPeriod)));
    }

    #[test]
    fn zero_sized_resolution_fails_validation() {
        let cfg: SenderConfig =
            serde_json::from_str(r#"{"resolution":{"width":0,"height":720}}"#).unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidResolution {
                width: 0,
                height: 720
            })
        ));
        let cfg = SenderConfig {
            resolution: Resolution {
                width: 640,
                height: 0,
            },
            ..SenderConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn bad_alpha_fails_validation() {
        let mut cfg = SenderConfig::default();
        cfg.pipeline.tracker.alpha = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Vision(_))));
    }

    #[test]
    fn relay_config_is_flat() {
        let json = serde_json::to_value(RelayConfig::default()).unwrap();
        assert_eq!(json["listen"], serde_json::json!("0.0.0.0:5005"));
        assert_eq!(json["forward"], serde_json::json!("127.0.0.1:5006"));
    }
}
