//! Tests for coastline loading and drawing.

use renderer::coastline::{project, Coastline, COASTLINE_COLOR};
use renderer::segment::{DrawCall, RecordingTarget};
use test_utils::SAMPLE_COASTLINE_GEOJSON;
use windmap_common::{LoadError, Rgb, Vector2};

#[test]
fn test_parses_line_geometries_and_skips_points() {
    let coastline = Coastline::from_geojson(SAMPLE_COASTLINE_GEOJSON).unwrap();

    assert!(!coastline.is_empty());
    assert_eq!(coastline.lines().len(), 3);
    assert_eq!(coastline.lines()[0], vec![(-180.0, 90.0), (0.0, 0.0), (180.0, -90.0)]);
    // Altitude is dropped
    assert_eq!(coastline.lines()[2], vec![(90.0, -45.0), (45.0, -45.0)]);
}

#[test]
fn test_empty_collection() {
    let coastline =
        Coastline::from_geojson(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
    assert!(coastline.is_empty());
}

#[test]
fn test_feature_without_geometry_is_skipped() {
    let json = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {}, "geometry": null}
    ]}"#;
    assert!(Coastline::from_geojson(json).unwrap().is_empty());
}

#[test]
fn test_invalid_json_is_a_geojson_error() {
    let err = Coastline::from_geojson("{not json").unwrap_err();
    assert!(matches!(err, LoadError::Geojson(_)), "got {:?}", err);
}

#[test]
fn test_short_position_is_rejected() {
    let json = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[1.0], [2.0, 3.0]]}}
    ]}"#;
    let err = Coastline::from_geojson(json).unwrap_err();
    assert!(err.to_string().contains("at least 2"), "got {}", err);
}

#[test]
fn test_draw_projects_each_line() {
    let coastline = Coastline::from_geojson(SAMPLE_COASTLINE_GEOJSON).unwrap();
    let mut target = RecordingTarget::new(360.0, 180.0);
    coastline.draw(&mut target, COASTLINE_COLOR);

    assert_eq!(target.calls.len(), 3);
    match &target.calls[0] {
        DrawCall::Polyline { points, style } => {
            assert_eq!(
                points,
                &vec![
                    Vector2::new(0.0, 0.0),
                    Vector2::new(180.0, 90.0),
                    Vector2::new(360.0, 180.0)
                ]
            );
            assert_eq!(style.color, Rgb::new(0x55, 0x77, 0x88));
            assert_eq!(style.alpha, 1.0);
        }
        other => panic!("expected a polyline, got {:?}", other),
    }
}

#[test]
fn test_projection_is_linear() {
    assert_eq!(project(-90.0, 45.0, 360.0, 180.0), Vector2::new(90.0, 45.0));
    assert_eq!(project(90.0, -45.0, 360.0, 180.0), Vector2::new(270.0, 135.0));
}
