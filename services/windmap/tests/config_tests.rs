//! Tests for configuration parsing, validation and overrides.

use std::path::PathBuf;

use test_utils::temp_file_with;
use windmap::{ConfigOverrides, WindmapConfig};
use windmap_common::{GradientError, Rgb, WindmapError};

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_defaults() {
    let config = WindmapConfig::default();
    assert_eq!(config.animation.max_animations, 20);
    assert_eq!(config.animation.points_per_animation, 42);
    assert_eq!(config.animation.fps, 60);
    assert_eq!(config.generator.d_sep, 0.5);
    assert_eq!(config.generator.d_test, 0.25);
    assert_eq!(config.generator.time_step, 0.09);
    assert_eq!(config.render.background_rgb().unwrap(), Rgb::new(0x0A, 0x19, 0x36));
    assert_eq!(config.render.coastline_rgb().unwrap(), Rgb::new(0x55, 0x77, 0x88));
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_document_gives_defaults() {
    let config = WindmapConfig::from_yaml_str("{}").unwrap();
    assert_eq!(config.render.width, WindmapConfig::default().render.width);
    assert_eq!(config.sources.wind, "2019010300.png");
}

#[test]
fn test_partial_sections_keep_other_defaults() {
    let yaml = r#"
render:
  width: 800
animation:
  seed: 7
  frames: 120
generator:
  d_sep: 1.0
sources:
  wind: https://example.com/wind.png
  coastline: null
output:
  path: out/frame.png
  snapshot_every: 30
"#;
    let config = WindmapConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.render.width, 800);
    assert_eq!(config.render.height, 720);
    assert_eq!(config.animation.seed, Some(7));
    assert_eq!(config.animation.frames, Some(120));
    assert_eq!(config.animation.points_per_animation, 42);
    assert_eq!(config.generator.d_sep, 1.0);
    assert_eq!(config.generator.d_test, 0.25);
    assert_eq!(config.sources.coastline, None);
    assert_eq!(config.output.path, PathBuf::from("out/frame.png"));
    assert_eq!(config.output.snapshot_every, Some(30));
    assert!(config.validate().is_ok());
}

#[test]
fn test_gradient_and_calibration_sections() {
    let yaml = r##"
calibration:
  u_min: -10.0
  u_max: 10.0
  v_min: -5.0
  v_max: 5.0
gradient:
  stops:
    - { position: 0.0, color: "#000" }
    - { position: 0.5, color: [0, 128, 255] }
    - { position: 1.0, color: { r: 255, g: 255, b: 255 } }
"##;
    let config = WindmapConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.calibration.u_max, 10.0);
    let stops = config.gradient.resolve().unwrap();
    assert_eq!(stops.len(), 3);
    assert_eq!(stops[1].color, Rgb::new(0, 128, 255));
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_from_file() {
    let file = temp_file_with(".yaml", b"render:\n  height: 100\n");
    let config = WindmapConfig::load(file.path()).unwrap();
    assert_eq!(config.render.height, 100);
}

#[test]
fn test_load_missing_file() {
    let err = WindmapConfig::load("/nonexistent/windmap.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config"));
}

#[test]
fn test_malformed_yaml_is_rejected() {
    assert!(WindmapConfig::from_yaml_str("render: [1, 2").is_err());
    assert!(WindmapConfig::from_yaml_str("render:\n  width: wide\n").is_err());
}

// ============================================================================
// Validation
// ============================================================================

fn expect_config_error(config: WindmapConfig) -> String {
    match config.validate() {
        Err(WindmapError::Config(message)) => message,
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn test_rejects_empty_canvas() {
    let mut config = WindmapConfig::default();
    config.render.height = 0;
    assert!(expect_config_error(config).contains("non-empty"));
}

#[test]
fn test_rejects_bad_line_width() {
    let mut config = WindmapConfig::default();
    config.render.line_width = 0.0;
    assert!(expect_config_error(config).contains("line_width"));
}

#[test]
fn test_rejects_bad_colors() {
    let mut config = WindmapConfig::default();
    config.render.background = "navy".to_string();
    assert!(expect_config_error(config).contains("render.background"));
}

#[test]
fn test_rejects_non_ascii_colors() {
    let mut config = WindmapConfig::default();
    config.render.coastline_color = "#aééb".to_string();
    assert!(expect_config_error(config).contains("render.coastline_color"));

    let yaml = r##"
gradient:
  stops:
    - { position: 0.0, color: "#000" }
    - { position: 1.0, color: "#ffé" }
"##;
    let config = WindmapConfig::from_yaml_str(yaml).unwrap();
    assert!(matches!(
        config.validate(),
        Err(WindmapError::Gradient(GradientError::InvalidColor { index: 1, .. }))
    ));
}

#[test]
fn test_rejects_zero_points_per_animation() {
    let mut config = WindmapConfig::default();
    config.animation.points_per_animation = 0;
    expect_config_error(config);
}

#[test]
fn test_zero_max_animations_is_allowed() {
    let mut config = WindmapConfig::default();
    config.animation.max_animations = 0;
    assert!(config.validate().is_ok());
}

#[test]
fn test_rejects_zero_snapshot_interval() {
    let mut config = WindmapConfig::default();
    config.output.snapshot_every = Some(0);
    expect_config_error(config);
}

#[test]
fn test_rejects_generator_spacing() {
    let mut config = WindmapConfig::default();
    config.generator.d_test = 1.0;
    assert!(expect_config_error(config).contains("d_test"));
}

#[test]
fn test_rejects_inverted_calibration() {
    let mut config = WindmapConfig::default();
    config.calibration.u_min = 30.0;
    assert!(matches!(config.validate(), Err(WindmapError::Calibration(_))));
}

#[test]
fn test_rejects_uncovered_gradient() {
    let yaml = r##"
gradient:
  stops:
    - { position: 0.0, color: "#000" }
    - { position: 0.5, color: "#fff" }
"##;
    let config = WindmapConfig::from_yaml_str(yaml).unwrap();
    assert!(matches!(
        config.validate(),
        Err(WindmapError::Gradient(GradientError::DoesNotEndAtOne(_)))
    ));

    let yaml = r##"
gradient:
  stops:
    - { position: 0.0, color: "#000" }
    - { position: 1.0, color: "#12345" }
"##;
    let config = WindmapConfig::from_yaml_str(yaml).unwrap();
    assert!(matches!(config.validate(), Err(WindmapError::Gradient(_))));
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn test_overrides_replace_file_values() {
    let mut config = WindmapConfig::default();
    ConfigOverrides {
        wind: Some("wind.png".to_string()),
        output: Some(PathBuf::from("/tmp/x.png")),
        width: Some(320),
        height: Some(160),
        frames: Some(10),
        snapshot_every: Some(5),
        seed: Some(99),
        fps: Some(0),
        ..ConfigOverrides::default()
    }
    .apply(&mut config);

    assert_eq!(config.sources.wind, "wind.png");
    assert_eq!(config.output.path, PathBuf::from("/tmp/x.png"));
    assert_eq!((config.render.width, config.render.height), (320, 160));
    assert_eq!(config.animation.frames, Some(10));
    assert_eq!(config.output.snapshot_every, Some(5));
    assert_eq!(config.animation.seed, Some(99));
    assert_eq!(config.animation.fps, 0);
}

#[test]
fn test_empty_overrides_change_nothing() {
    let mut config = WindmapConfig::default();
    config.animation.seed = Some(3);
    ConfigOverrides::default().apply(&mut config);
    assert_eq!(config.animation.seed, Some(3));
    assert!(config.sources.coastline.is_some());
}

#[test]
fn test_no_coastline_wins_over_coastline() {
    let mut config = WindmapConfig::default();
    ConfigOverrides {
        coastline: Some("coast.json".to_string()),
        no_coastline: true,
        ..ConfigOverrides::default()
    }
    .apply(&mut config);
    assert_eq!(config.sources.coastline, None);
}
