use posenet_colmap::ConvertError;
use posenet_colmap::pose::{Pose, PoseStore};
use nalgebra as na;
use std::io::Cursor;
use std::path::Path;

const HEADER: &str = "Cambridge Landmarks Dataset V1\nImageFile, Camera Position [X Y Z W P Q R]\n\n";

fn load(body: &str) -> Result<PoseStore, ConvertError> {
    let text = format!("{}{}", HEADER, body);
    PoseStore::from_reader(Cursor::new(text), Path::new("dataset_train.txt"))
}

#[test]
fn test_load_skips_header_and_keeps_order() {
    let store = load(
        "seq1/frame00001.png 1.0 2.0 3.0 1.0 0.0 0.0 0.0\n\
         seq1/frame00002.png -4.5 0.5 12.25 0.0 1.0 0.0 0.0\n",
    )
    .unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store[0].name, "seq1/frame00001.png");
    assert_eq!(store[1].name, "seq1/frame00002.png");
    assert!((store[0].position - na::Point3::new(1.0, 2.0, 3.0)).norm() < 1e-12);
    assert!((store[1].position - na::Point3::new(-4.5, 0.5, 12.25)).norm() < 1e-12);
    assert!(store[0].orientation.angle() < 1e-12);
}

#[test]
fn test_header_lines_are_never_parsed() {
    // header lines that look like records must still be skipped
    let text = "a 0 0 0 1 0 0 0\nb 0 0 0 1 0 0 0\nc 0 0 0 1 0 0 0\nd 0 0 0 1 0 0 0\n";
    let store = PoseStore::from_reader(Cursor::new(text), Path::new("list.txt")).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store[0].name, "d");
}

#[test]
fn test_orientation_is_normalized() {
    let store = load("img 0 0 0 2.0 0.0 0.0 0.0\nimg2 0 0 0 0.0 0.0 0.0 3.0\n").unwrap();
    let q0 = store[0].orientation.quaternion();
    assert!((q0.norm() - 1.0).abs() < 1e-12);
    assert!((q0.w - 1.0).abs() < 1e-12);
    let q1 = store[1].orientation.quaternion();
    assert!((q1.k - 1.0).abs() < 1e-12);
}

#[test]
fn test_blank_lines_are_skipped() {
    let store = load("\na 0 0 0 1 0 0 0\n   \nb 1 0 0 1 0 0 0\n\n").unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn test_empty_list() {
    let store = load("").unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_wrong_field_count_fails_whole_load() {
    let result = load("a 0 0 0 1 0 0 0\nb 0 0 0 1 0 0\n");
    match result {
        Err(ConvertError::Parse { line, .. }) => assert_eq!(line, 5),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_non_numeric_field_fails_whole_load() {
    let result = load("a 0 0 zero 1 0 0 0\n");
    match result {
        Err(ConvertError::Parse { line, message, .. }) => {
            assert_eq!(line, 4);
            assert!(message.contains("zero"));
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_nan_and_inf_fields_fail_load() {
    for record in [
        "B nan 0 0 1 0 0 0",
        "B NaN 0 0 1 0 0 0",
        "B 0 inf 0 1 0 0 0",
        "B 0 0 -infinity 1 0 0 0",
        "B 0 0 0 inf 0 0 0",
        "B 0 0 0 1 0 NaN 0",
    ] {
        let result = load(&format!("A 0 0 0 1 0 0 0\n{}\nC 1000 0 0 1 0 0 0\n", record));
        match result {
            Err(ConvertError::Parse { line, message, .. }) => {
                assert_eq!(line, 5);
                assert!(message.contains("not a finite number"), "{}", message);
            }
            other => panic!("expected parse error for {}, got {:?}", record, other),
        }
    }
}

#[test]
fn test_overflowing_quaternion_is_rejected() {
    let result = load("a 0 0 0 1e308 1e308 0 0\n");
    assert!(matches!(
        result,
        Err(ConvertError::DegenerateOrientation { line: 4, .. })
    ));
}

#[test]
fn test_zero_quaternion_is_rejected() {
    let result = load("a 0 0 0 0 0 0 0\n");
    match result {
        Err(ConvertError::DegenerateOrientation { name, line, .. }) => {
            assert_eq!(name, "a");
            assert_eq!(line, 4);
        }
        other => panic!("expected degenerate orientation, got {:?}", other),
    }
}

#[test]
fn test_missing_file() {
    let result = PoseStore::load("non_existent_dataset_train.txt");
    match result {
        Err(ConvertError::Io { path, .. }) => {
            assert_eq!(path, Path::new("non_existent_dataset_train.txt"))
        }
        other => panic!("expected io error, got {:?}", other),
    }
}

#[test]
fn test_duplicate_names_are_kept() {
    let store = load("a 0 0 0 1 0 0 0\na 1 0 0 1 0 0 0\n").unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn test_world_to_camera_translation() {
    let pose = Pose::new(
        "img",
        na::Point3::new(1.0, 0.0, 0.0),
        na::UnitQuaternion::identity(),
    );
    let iso = pose.world_to_camera();
    assert!((iso.translation.vector - na::Vector3::new(-1.0, 0.0, 0.0)).norm() < 1e-12);

    // the camera centre maps to the camera origin
    let yawed = Pose::new(
        "img",
        na::Point3::new(3.0, -2.0, 5.0),
        na::UnitQuaternion::from_euler_angles(0.3, -0.2, 1.1),
    );
    let centre_in_cam = yawed.world_to_camera() * yawed.position;
    assert!(centre_in_cam.coords.norm() < 1e-12);
}
