//! Object detection over uploaded item photos
//!
//! Wraps an external detector process. The process receives the image
//! path as its last argument and prints a JSON array of detections on
//! stdout. Detection is advisory: every failure mode degrades to an empty
//! list and is only logged.

use lostfound_common::config::DetectorConfig;
use lostfound_common::models::DetectedObject;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Reasons a detector run produced no usable output
#[derive(Debug, Error)]
pub enum DetectorError {
    /// Failed to start the detector process
    #[error("Failed to execute detector: {0}")]
    ExecutionError(String),

    /// Detector exited unsuccessfully
    #[error("Detector failed: {0}")]
    DetectionFailed(String),

    /// Detector stdout was not a JSON array of detections
    #[error("Failed to parse detector output: {0}")]
    ParseError(String),
}

/// Something that can list the objects visible in an image
///
/// Implementations block; callers on the async runtime should run them
/// via `spawn_blocking`.
pub trait Detector: Send + Sync {
    fn detect(&self, image_path: &Path) -> Vec<DetectedObject>;
}

/// Detector used when detection is disabled
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledDetector;

impl Detector for DisabledDetector {
    fn detect(&self, _image_path: &Path) -> Vec<DetectedObject> {
        Vec::new()
    }
}

/// Runs an external detector command
#[derive(Debug, Clone)]
pub struct ProcessDetector {
    program: String,
    args: Vec<String>,
}

impl ProcessDetector {
    /// Create a detector from `[program, args...]`
    ///
    /// Returns `None` for an empty command.
    pub fn new(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Run the detector, surfacing why it produced nothing
    pub fn run(&self, image_path: &Path) -> Result<Vec<DetectedObject>, DetectorError> {
        debug!(
            program = %self.program,
            image = %image_path.display(),
            "Running object detection"
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(image_path)
            .output()
            .map_err(|e| DetectorError::ExecutionError(e.to_string()))?;

        if !output.stderr.is_empty() {
            debug!("Detector stderr: {}", String::from_utf8_lossy(&output.stderr).trim());
        }

        if !output.status.success() {
            return Err(DetectorError::DetectionFailed(format!(
                "Exit code: {:?}, stderr: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_detections(&String::from_utf8_lossy(&output.stdout))
    }
}

impl Detector for ProcessDetector {
    fn detect(&self, image_path: &Path) -> Vec<DetectedObject> {
        match self.run(image_path) {
            Ok(objects) => {
                info!(
                    image = %image_path.display(),
                    detections = objects.len(),
                    "Object detection completed"
                );
                objects
            }
            Err(e) => {
                warn!(image = %image_path.display(), "Object detection failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Parse detector stdout
///
/// Blank output means no detections. Any JSON array is accepted and its
/// elements are kept as the detector wrote them.
pub fn parse_detections(stdout: &str) -> Result<Vec<DetectedObject>, DetectorError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).map_err(|e| DetectorError::ParseError(e.to_string()))
}

/// Build the detector selected by configuration
pub fn from_config(config: &DetectorConfig) -> Arc<dyn Detector> {
    if !config.enabled {
        info!("Object detection disabled");
        return Arc::new(DisabledDetector);
    }
    match ProcessDetector::new(&config.command) {
        Some(detector) => {
            info!("Object detection command: {}", config.command.join(" "));
            Arc::new(detector)
        }
        None => {
            warn!("Detector enabled but no command configured, detection disabled");
            Arc::new(DisabledDetector)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_detections_array() {
        let json = r#"[
            {"class": "cell phone", "confidence": 0.87, "bbox": [12, 40, 200, 380]},
            {"class": "book", "confidence": 0.55, "bbox": [0, 0, 50, 60]}
        ]"#;
        let objects = parse_detections(json).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].class(), Some("cell phone"));
        assert_eq!(objects[1].bbox(), Some(vec![0.0, 0.0, 50.0, 60.0]));
    }

    #[test]
    fn test_parse_keeps_float_boxes_and_unusual_keys() {
        let json = r#"[
            {"class": "cup", "confidence": 0.9, "bbox": [1.5, 2.0, 3.0, 4.0]},
            {"class": "book", "confidence": 0.7, "bbox": [1, 2, 3, 4]},
            {"label": "keys", "mask": [[0, 1], [1, 0]]}
        ]"#;
        let objects = parse_detections(json).unwrap();
        assert_eq!(objects.len(), 3);
        assert_eq!(objects[0].bbox(), Some(vec![1.5, 2.0, 3.0, 4.0]));
        assert_eq!(objects[1].class(), Some("book"));
        assert_eq!(objects[2].as_value()["label"], "keys");
    }

    #[test]
    fn test_parse_blank_output_is_empty() {
        assert!(parse_detections("").unwrap().is_empty());
        assert!(parse_detections("  \n").unwrap().is_empty());
        assert!(parse_detections("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(matches!(
            parse_detections("Error: model not found"),
            Err(DetectorError::ParseError(_))
        ));
        assert!(parse_detections(r#"{"class": "book"}"#).is_err());
    }

    #[test]
    fn test_empty_command_builds_nothing() {
        assert!(ProcessDetector::new(&[]).is_none());
    }

    #[test]
    fn test_missing_program_degrades_to_empty() {
        let detector =
            ProcessDetector::new(&["lostfound-no-such-detector-binary".to_string()]).unwrap();
        let path = PathBuf::from("photo.jpg");

        assert!(matches!(detector.run(&path), Err(DetectorError::ExecutionError(_))));
        assert!(detector.detect(&path).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_process_output_is_parsed() {
        let script = r#"echo '[{"class":"bottle","confidence":0.9,"bbox":[1,2,3,4]}]'"#;
        let detector = ProcessDetector::new(&[
            "sh".to_string(),
            "-c".to_string(),
            script.to_string(),
            "sh".to_string(),
        ])
        .unwrap();

        let objects = detector.detect(Path::new("/tmp/ignored.jpg"));
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].class(), Some("bottle"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_degrades_to_empty() {
        let detector = ProcessDetector::new(&[
            "sh".to_string(),
            "-c".to_string(),
            r#"echo '[{"class":"bottle","confidence":0.9,"bbox":[1,2,3,4]}]'; exit 1"#.to_string(),
            "sh".to_string(),
        ])
        .unwrap();

        let path = Path::new("/tmp/ignored.jpg");
        assert!(matches!(detector.run(path), Err(DetectorError::DetectionFailed(_))));
        assert!(detector.detect(path).is_empty());
    }

    #[test]
    fn test_disabled_config_never_detects() {
        let config = DetectorConfig {
            enabled: false,
            command: vec!["sh".to_string()],
        };
        assert!(from_config(&config).detect(Path::new("x.jpg")).is_empty());
    }
}
