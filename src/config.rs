//! Host configuration: route, speed, and marker options, loaded from TOML.
//!
//! ```toml
//! [motion]
//! speed_kmh = 4000.0
//! rotation = true
//! autoplay = true
//! loop = false
//! icon = "car.png"
//!
//! [route]
//! file = "route.json"        # or inline:
//! # waypoints = [[22.652615, -102.995279], [22.648595, -102.987329]]
//! ```
//!
//! The route file is a JSON array of `[lat, lng]` pairs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::LatLng;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("route file parse error: {0}")]
    Route(#[from] serde_json::Error),
    #[error("route is empty: set [route] file or waypoints")]
    EmptyRoute,
}

/// Marker options passed to the controller at construction.
///
/// `icon` is an opaque descriptor forwarded to the host renderer; the motion
/// core never interprets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionOptions {
    #[serde(default)]
    pub rotation: bool,
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default, rename = "loop")]
    pub looped: bool,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub motion: MotionSection,
    #[serde(default)]
    pub route: RouteSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            motion: MotionSection::default(),
            route: RouteSection::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionSection {
    #[serde(default = "default_speed_kmh")]
    pub speed_kmh: f64,
    #[serde(flatten)]
    pub options: MotionOptions,
}

impl Default for MotionSection {
    fn default() -> Self {
        Self {
            speed_kmh: default_speed_kmh(),
            options: MotionOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteSection {
    /// JSON file of `[lat, lng]` pairs; takes precedence over `waypoints`.
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub waypoints: Vec<[f64; 2]>,
}

impl RouteSection {
    /// Resolves the configured route into a waypoint list. Relative route
    /// file paths are resolved against `base_dir`.
    pub fn load(&self, base_dir: &Path) -> Result<Vec<LatLng>, ConfigError> {
        let pairs: Vec<[f64; 2]> = match &self.file {
            Some(file) => {
                let path = if file.is_absolute() {
                    file.clone()
                } else {
                    base_dir.join(file)
                };
                serde_json::from_str(&fs::read_to_string(path)?)?
            }
            None => self.waypoints.clone(),
        };
        if pairs.is_empty() {
            return Err(ConfigError::EmptyRoute);
        }
        Ok(pairs.into_iter().map(LatLng::from).collect())
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let raw = fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

fn default_speed_kmh() -> f64 {
    60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.motion.speed_kmh, 60.0);
        assert!(!config.motion.options.rotation);
        assert!(!config.motion.options.looped);
        assert!(config.route.file.is_none());
        assert!(config.route.waypoints.is_empty());
    }

    #[test]
    fn loop_key_maps_to_looped() {
        let config: Config = toml::from_str(
            r#"
            [motion]
            speed_kmh = 1000.0
            rotation = true
            loop = true
            icon = "car.png"
            "#,
        )
        .unwrap();
        assert!(config.motion.options.looped);
        assert!(config.motion.options.rotation);
        assert_eq!(config.motion.options.icon.as_deref(), Some("car.png"));
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marker.toml");
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
            [motion]
            speed_kmh = 4000.0
            autoplay = true

            [route]
            waypoints = [[0.0, 0.0], [0.0, 1.0]]
            "#
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.motion.speed_kmh, 4000.0);
        assert!(config.motion.options.autoplay);
        let route = config.route.load(dir.path()).unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route[1], LatLng::new(0.0, 1.0));
    }

    #[test]
    fn route_file_takes_precedence_over_inline_waypoints() {
        let dir = tempfile::tempdir().unwrap();
        let route_path = dir.path().join("route.json");
        fs::write(&route_path, "[[10.0, 20.0], [11.0, 21.0], [12.0, 22.0]]").unwrap();

        let section = RouteSection {
            file: Some(PathBuf::from("route.json")),
            waypoints: vec![[0.0, 0.0]],
        };
        let route = section.load(dir.path()).unwrap();
        assert_eq!(route.len(), 3);
        assert_eq!(route[0], LatLng::new(10.0, 20.0));
    }

    #[test]
    fn empty_route_is_rejected() {
        let section = RouteSection::default();
        assert!(matches!(
            section.load(Path::new(".")),
            Err(ConfigError::EmptyRoute)
        ));
    }
}
