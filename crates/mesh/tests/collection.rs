//! Integration tests for reading and writing whole meshtal files

use meshops_mesh::operations::{sum, Correlation};
use meshops_mesh::writer::OutputFormat;
use meshops_mesh::{CuvNormalisation, Meshtal, ReadOptions};
use rstest::rstest;
use std::fs;
use std::path::PathBuf;

const RECT: &str = "./data/meshes/meshtal_rect.msht";
const CUV: &str = "./data/meshes/meshtal_cuv.msht";

/// Fresh output directory under the system temp location
fn output_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("meshops_tests").join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn open_without_reading() {
    let meshtal = Meshtal::open(RECT).unwrap();
    assert_eq!(meshtal.formats.len(), 5);
    assert_eq!(meshtal.header.histories, Some(1e6));
    assert!(meshtal.ids().is_empty());
    assert!(meshtal.mesh(124).is_err());
    assert!(meshtal.info().contains("not loaded"));
}

#[test]
fn read_selected_tallies() {
    let mut meshtal = Meshtal::open(RECT).unwrap();
    let options = ReadOptions {
        ids: vec![154, 124],
        ..Default::default()
    };
    meshtal.read(&options).unwrap();

    assert_eq!(meshtal.ids(), vec![124, 154]);
    assert_eq!(meshtal.mesh(154).unwrap().ebins(), 3);
    assert!(meshtal.mesh(134).is_err());
    assert_eq!(meshtal.file_prefix(), "meshtal_rect");
}

#[test]
fn read_with_normalisation() {
    let mut meshtal = Meshtal::open(CUV).unwrap();
    let options = ReadOptions {
        ids: vec![304],
        normalisation: CuvNormalisation::CellVolume,
        cell_filters: vec![2],
        ..Default::default()
    };
    meshtal.read(&options).unwrap();

    let mesh = meshtal.mesh(304).unwrap();
    assert!((mesh.voxels[0].result - 8.0).abs() < 1e-9);
    assert!((mesh.voxels[1].result - 2.0).abs() < 1e-9);
}

#[test]
fn keep_arithmetic_results() {
    let mut meshtal = Meshtal::open(RECT).unwrap();
    meshtal.read(&ReadOptions::default()).unwrap();

    let a = meshtal.mesh(124).unwrap();
    let b = meshtal.mesh(134).unwrap();
    let mut total = sum(a, b, Correlation::Correlated).unwrap();
    total.id = 1124;

    assert!(meshtal.insert(total).is_none());
    assert_eq!(meshtal.ids(), vec![124, 134, 144, 154, 164, 1124]);
    assert_eq!(meshtal.mesh(1124).unwrap().voxels[3].result, 32.0);
    assert!(meshtal.info().contains("(in memory)"));
}

#[rstest]
#[case(OutputFormat::Csv, "meshtal_rect_124_csv.csv")]
#[case(OutputFormat::PointCloud, "meshtal_rect_124_point_cloud.txt")]
#[case(OutputFormat::IpFluent, "meshtal_rect_124_ip_fluent.txt")]
#[case(OutputFormat::Vtk, "meshtal_rect_124.vtr")]
fn write_single(#[case] format: OutputFormat, #[case] expected: &str) {
    let dir = output_dir(&format!("write_single_{}", format.tag()));
    let mut meshtal = Meshtal::open(RECT).unwrap();
    meshtal
        .read(&ReadOptions {
            ids: vec![124],
            ..Default::default()
        })
        .unwrap();

    let path = meshtal.write(124, &dir, format, &[]).unwrap();
    assert_eq!(path, dir.join(expected));
    assert!(path.is_file());
}

#[test]
fn write_csv_contents() {
    let dir = output_dir("write_csv_contents");
    let mut meshtal = Meshtal::open(RECT).unwrap();
    meshtal
        .read(&ReadOptions {
            ids: vec![124],
            ..Default::default()
        })
        .unwrap();

    let arrays = vec!["Value - Total".to_string()];
    let path = meshtal.write(124, &dir, OutputFormat::Csv, &arrays).unwrap();
    let text = fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "x,y,z,Value - Total");
    assert_eq!(lines[1], "0.5,0.5,0.5,1");

    let unknown = vec!["Value - 1.00000e+00".to_string()];
    assert!(meshtal.write(124, &dir, OutputFormat::Csv, &unknown).is_err());
}

#[test]
fn write_every_mesh() {
    let dir = output_dir("write_every_mesh");
    let mut meshtal = Meshtal::open(RECT).unwrap();
    meshtal.read(&ReadOptions::default()).unwrap();

    let paths = meshtal.write_all(&dir, OutputFormat::PointCloud).unwrap();
    assert_eq!(paths.len(), 5);
    assert!(paths.iter().all(|p| p.is_file()));
}
