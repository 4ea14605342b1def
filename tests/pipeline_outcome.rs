mod common;

use common::{column, pack_columns};
use yolopost::{
    decode_and_suppress, ClassSelection, DetectError, Detector, DetectorConfig, LabelTable,
    NmsMode, Outcome,
};

fn crowded_frame() -> (Vec<f32>, usize, usize) {
    pack_columns(&[
        // Two overlapping "person" boxes.
        column(0.30, 0.40, 0.20, 0.40, &[0.92, 0.05, 0.01]),
        column(0.31, 0.41, 0.20, 0.40, &[0.81, 0.10, 0.02]),
        // A "dog" box on top of the first person.
        column(0.30, 0.40, 0.20, 0.38, &[0.10, 0.77, 0.05]),
        // A lone "cup" elsewhere.
        column(0.80, 0.80, 0.10, 0.10, &[0.02, 0.03, 0.66]),
        // Below threshold.
        column(0.60, 0.20, 0.10, 0.10, &[0.20, 0.30, 0.40]),
        // Invalid geometry.
        column(0.95, 0.50, 0.30, 0.10, &[0.99, 0.00, 0.00]),
    ])
}

fn labels() -> LabelTable {
    LabelTable::from_text("person\ndog\ncup\n")
}

#[test]
fn detector_suppresses_and_orders_by_confidence() {
    let (data, channels, elements) = crowded_frame();
    let detector = Detector::new()
        .with_shape(channels, elements)
        .with_labels(labels());

    let outcome = detector.process(&data).unwrap();
    let names: Vec<&str> = outcome
        .detections()
        .iter()
        .map(|d| d.class_name.as_str())
        .collect();
    assert_eq!(names, vec!["person", "cup"]);
    assert!(outcome.elapsed().is_some());
    assert_eq!(outcome.best().unwrap().element, 0);
}

#[test]
fn per_class_mode_keeps_overlapping_other_class() {
    let (data, channels, elements) = crowded_frame();
    let detector = Detector::new()
        .with_shape(channels, elements)
        .with_labels(labels())
        .with_config(DetectorConfig {
            nms_mode: NmsMode::PerClass,
            ..DetectorConfig::default()
        });

    let outcome = detector.process(&data).unwrap();
    let names: Vec<&str> = outcome
        .detections()
        .iter()
        .map(|d| d.class_name.as_str())
        .collect();
    assert_eq!(names, vec!["person", "dog", "cup"]);
}

#[test]
fn max_detections_truncates_lowest_confidence() {
    let (data, channels, elements) = crowded_frame();
    let detector = Detector::new()
        .with_shape(channels, elements)
        .with_labels(labels())
        .with_config(DetectorConfig {
            max_detections: Some(1),
            ..DetectorConfig::default()
        });

    let outcome = detector.process(&data).unwrap();
    assert_eq!(outcome.detections().len(), 1);
    assert_eq!(outcome.detections()[0].class_name, "person");
}

#[test]
fn raising_confidence_threshold_can_empty_the_frame() {
    let (data, channels, elements) = crowded_frame();
    let outcome = decode_and_suppress(&data, channels, elements, &labels(), 0.95, 0.5).unwrap();
    assert!(outcome.is_empty());
    assert_eq!(outcome, Outcome::NoDetections);
}

#[test]
fn one_shot_refuses_unset_shape_and_labels() {
    let err = decode_and_suppress(&[], 0, 0, &labels(), 0.55, 0.5).unwrap_err();
    assert!(matches!(err, DetectError::NotReady { .. }));

    let err = decode_and_suppress(&[0.0f32; 6], 6, 1, &LabelTable::default(), 0.55, 0.5)
        .unwrap_err();
    assert_eq!(
        err,
        DetectError::NotReady {
            reason: "label table is empty",
        }
    );
}

#[test]
fn one_shot_rejects_invalid_thresholds() {
    let raw = [0.5f32, 0.5, 0.2, 0.2, 0.9];
    let err = decode_and_suppress(&raw, 5, 1, &labels(), -0.1, 0.5).unwrap_err();
    assert!(matches!(
        err,
        DetectError::InvalidThreshold {
            name: "confidence_threshold",
            ..
        }
    ));
    let err = decode_and_suppress(&raw, 5, 1, &labels(), 0.5, 1.5).unwrap_err();
    assert!(matches!(
        err,
        DetectError::InvalidThreshold {
            name: "iou_threshold",
            ..
        }
    ));
}

#[test]
fn detector_is_reusable_across_frames() {
    let (data, channels, elements) = crowded_frame();
    let detector = Detector::new()
        .with_shape(channels, elements)
        .with_labels(labels());

    let first = detector.process(&data).unwrap();
    let empty = vec![0.0f32; data.len()];
    let second = detector.process(&empty).unwrap();
    let third = detector.process(&data).unwrap();

    assert_eq!(second, Outcome::NoDetections);
    assert_eq!(first.detections(), third.detections());
}

#[test]
fn selection_offers_top_class_once_per_session() {
    let (data, channels, elements) = crowded_frame();
    let detector = Detector::new()
        .with_shape(channels, elements)
        .with_labels(labels());
    let mut selection = ClassSelection::new();

    let outcome = detector.process(&data).unwrap();
    let offered = selection.offer(&outcome);
    assert_eq!(offered.as_deref(), Some("person"));
    selection.accept("person");

    let again = detector.process(&data).unwrap();
    assert_eq!(selection.offer(&again), None);
    assert_eq!(selection.accepted(), &["person".to_string()]);
}

#[test]
fn pixel_rects_follow_frame_size() {
    let (data, channels, elements) = crowded_frame();
    let outcome = decode_and_suppress(&data, channels, elements, &labels(), 0.55, 0.5).unwrap();
    let cup = &outcome.detections()[1];
    let rect = cup.to_pixel_rect(1000.0, 500.0);
    assert!((rect.left - 750.0).abs() < 1e-2);
    assert!((rect.top - 375.0).abs() < 1e-2);
    assert!((rect.right - 850.0).abs() < 1e-2);
    assert!((rect.bottom - 425.0).abs() < 1e-2);
}
