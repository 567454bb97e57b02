//! Integration tests for shapefile reading

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::builders::{shp_point_body, shp_polyline_body, ShpBuilder};
use gisbin::io::shp::{read_file, Shape, ShapeType, ShpReader};
use gisbin::{DecodeError, NotificationType};

#[test]
fn test_read_nonexistent_file() {
    let result = read_file("nonexistent.shp");
    assert!(matches!(result, Err(DecodeError::Io(_))));
}

#[test]
fn test_read_single_point() {
    let data = ShpBuilder::new(1)
        .record(1, &shp_point_body(10.5, -3.25))
        .build();

    let collection = ShpReader::new(&data).read().unwrap();
    assert_eq!(collection.header.shape_type, ShapeType::Point);
    assert_eq!(collection.header.version, 1000);
    assert_eq!(collection.len(), 1);
    assert!(collection.notifications.is_empty());

    let record = &collection.records[0];
    assert_eq!(record.record_number, 1);
    match &record.shape {
        Shape::Point(point) => {
            assert_eq!(point.position.x, 10.5);
            assert_eq!(point.position.y, -3.25);
            assert_eq!(point.m, None);
        }
        other => panic!("expected point, got {other:?}"),
    }
}

#[test]
fn test_invalid_signature() {
    let mut data = ShpBuilder::new(1).build();
    data[0..4].copy_from_slice(&1234i32.to_be_bytes());
    let result = ShpReader::new(&data).read();
    assert!(matches!(result, Err(DecodeError::InvalidSignature(_))));
}

#[test]
fn test_declared_length_below_header() {
    let mut data = ShpBuilder::new(1).build();
    // 64 words = 128 bytes would be fine; 40 words = 80 bytes is not.
    data[24..28].copy_from_slice(&40i32.to_be_bytes());
    let result = ShpReader::new(&data).read();
    assert!(matches!(result, Err(DecodeError::TruncatedFile(_))));
}

#[test]
fn test_unknown_shape_type_in_header() {
    let data = ShpBuilder::new(2).build();
    let result = ShpReader::new(&data).read();
    assert!(matches!(result, Err(DecodeError::InvalidShapeType(2))));
}

#[test]
fn test_version_warning() {
    let data = ShpBuilder::new(1).build_with_version(42);
    let collection = ShpReader::new(&data).read().unwrap();
    assert!(collection
        .notifications
        .has_type(NotificationType::Warning));
}

#[test]
fn test_null_records_are_skipped() {
    let null_body = 0i32.to_le_bytes().to_vec();
    let data = ShpBuilder::new(1)
        .record(1, &null_body)
        .record(2, &shp_point_body(1.0, 2.0))
        .build();

    let collection = ShpReader::new(&data).read().unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.records[0].record_number, 2);
}

#[test]
fn test_record_type_mismatch_is_fatal() {
    // File declares points, record claims polyline.
    let mut body = shp_point_body(0.0, 0.0);
    body[0..4].copy_from_slice(&3i32.to_le_bytes());
    let data = ShpBuilder::new(1).record(1, &body).build();
    let result = ShpReader::new(&data).read();
    assert!(matches!(result, Err(DecodeError::InvalidShapeType(3))));
}

#[test]
fn test_polyline_parts() {
    let body = shp_polyline_body(
        &[0, 2],
        &[(0.0, 0.0), (1.0, 1.0), (5.0, 5.0), (6.0, 5.0)],
    );
    let data = ShpBuilder::new(3).record(1, &body).build();

    let collection = ShpReader::new(&data).read().unwrap();
    match &collection.records[0].shape {
        Shape::Polyline(poly) => {
            assert_eq!(poly.parts, vec![0, 2]);
            assert_eq!(poly.points.len(), 4);
            assert_eq!(poly.points[2].position.x, 5.0);
        }
        other => panic!("expected polyline, got {other:?}"),
    }
}

#[test]
fn test_part_index_out_of_range_is_fatal() {
    let body = shp_polyline_body(&[0, 9], &[(0.0, 0.0), (1.0, 1.0)]);
    let data = ShpBuilder::new(3).record(1, &body).build();
    let result = ShpReader::new(&data).read();
    assert!(matches!(result, Err(DecodeError::TruncatedFile(_))));
}

#[test]
fn test_decreasing_part_table_is_fatal() {
    // Starts [2, 0] describe an inverted second ring; assembling such a
    // shape would slice backwards, so decode rejects it outright.
    let body = shp_polyline_body(&[2, 0], &[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
    let data = ShpBuilder::new(3).record(1, &body).build();
    let result = ShpReader::new(&data).read();
    assert!(matches!(result, Err(DecodeError::TruncatedFile(_))));
}

#[test]
fn test_multipatch_skipped_with_notification() {
    let mut body = 31i32.to_le_bytes().to_vec();
    body.extend_from_slice(&[0u8; 16]); // unparsed payload
    let data = ShpBuilder::new(31).record(1, &body).build();

    let collection = ShpReader::new(&data).read().unwrap();
    assert_eq!(collection.len(), 1);
    assert!(matches!(collection.records[0].shape, Shape::MultiPatch));
    assert!(collection
        .notifications
        .has_type(NotificationType::NotImplemented));
}

#[test]
fn test_truncated_record_body_is_fatal() {
    let mut data = ShpBuilder::new(1)
        .record(1, &shp_point_body(0.0, 0.0))
        .build();
    data.truncate(data.len() - 4);
    let result = ShpReader::new(&data).read();
    assert!(matches!(result, Err(DecodeError::TruncatedFile(_))));
}

#[test]
fn test_cancellation() {
    let data = ShpBuilder::new(1)
        .record(1, &shp_point_body(0.0, 0.0))
        .build();
    let token = Arc::new(AtomicBool::new(false));
    token.store(true, Ordering::Relaxed);

    let result = ShpReader::new(&data).with_cancel_token(token).read();
    assert!(matches!(result, Err(DecodeError::Cancelled)));
}
