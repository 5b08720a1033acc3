//! End-to-end tests: files in, CSV table out.
//!
//! Tests verify that:
//! - `generate` writes one CSV record per voxel in grid order
//! - A failing run leaves no output file behind
//! - Both scaffolding templates composite to full coverage
//! - Domain records load from JSON and PhysiCell settings

use std::fs;
use std::path::Path;

use ecm_ic::{
    generate, generate_grid, template_document, write_template, DomainConfig, GenerateOptions,
    TemplateVariant,
};

fn domain_400(spacing: f64) -> DomainConfig {
    DomainConfig {
        x_min: -400.0,
        x_max: 400.0,
        dx: spacing,
        y_min: -400.0,
        y_max: 400.0,
        dy: spacing,
        z0: 0.0,
    }
}

const EVERYWHERE: &str = r#"<?xml version="1.0"?>
<ic_ecm>
    <layer ID="1">
        <patch_collection type="everywhere">
            <patch ID="1">
                <density>0.4</density>
                <orientation>random</orientation>
                <anisotropy>0.3</anisotropy>
            </patch>
        </patch_collection>
    </layer>
</ic_ecm>"#;

fn read_records(path: &Path) -> Vec<Vec<f64>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["x", "y", "z", "ecm_density", "ecm_orientation_x", "ecm_orientation_y"]
    );
    reader
        .records()
        .map(|r| r.unwrap().iter().map(|v| v.parse::<f64>().unwrap()).collect())
        .collect()
}

// ============================================================================
// generate
// ============================================================================

#[test]
fn test_generate_writes_voxel_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ecm.xml");
    let output = dir.path().join("out").join("ecm.csv");
    fs::write(&input, EVERYWHERE).unwrap();

    let domain = DomainConfig {
        z0: 5.0,
        ..domain_400(40.0)
    };
    let summary = generate(&input, &output, &domain, GenerateOptions { seed: Some(1) }).unwrap();
    assert_eq!(summary.rows, 400);
    assert_eq!((summary.nx, summary.ny), (20, 20));
    assert_eq!(summary.layers, 1);
    assert_eq!(summary.output, output);

    let records = read_records(&output);
    assert_eq!(records.len(), 400);
    for (i, record) in records.iter().enumerate() {
        let expected_x = -400.0 + ((i % 20) as f64 + 0.5) * 40.0;
        let expected_y = -400.0 + ((i / 20) as f64 + 0.5) * 40.0;
        assert!((record[0] - expected_x).abs() < 1e-9, "row {i} x");
        assert!((record[1] - expected_y).abs() < 1e-9, "row {i} y");
        assert_eq!(record[2], 5.0);
        assert_eq!(record[3], 0.4);
        let magnitude = record[4].hypot(record[5]);
        assert!((magnitude - 0.3).abs() < 1e-9, "row {i} magnitude {magnitude}");
    }
    assert!(!dir.path().join("out").join("ecm.csv.partial").exists());
}

#[test]
fn test_failed_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ecm.xml");
    let output = dir.path().join("ecm.csv");
    let lone_disc = r#"<ic_ecm><layer ID="1"><patch_collection type="elliptical_disc"><patch ID="1">
        <x0>0</x0><y0>0</y0><a>100</a><b>100</b><rotation>0</rotation>
        <density>0.5</density><orientation>random</orientation><anisotropy>0.1</anisotropy>
    </patch></patch_collection></layer></ic_ecm>"#;
    fs::write(&input, lone_disc).unwrap();

    let err = generate(&input, &output, &domain_400(40.0), GenerateOptions::default()).unwrap_err();
    assert!(
        format!("{err:#}").contains("undefined"),
        "error should report undefined voxels: {err:#}"
    );
    assert!(!output.exists());
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("ecm.csv");
    let result = generate(
        &dir.path().join("absent.xml"),
        &output,
        &domain_400(40.0),
        GenerateOptions::default(),
    );
    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn test_seed_makes_runs_reproducible() {
    let options = GenerateOptions { seed: Some(99) };
    let a = generate_grid(EVERYWHERE, &domain_400(40.0), options).unwrap();
    let b = generate_grid(EVERYWHERE, &domain_400(40.0), options).unwrap();
    assert!(a.rows().zip(b.rows()).all(|(ra, rb)| ra == rb));
}

// ============================================================================
// Templates
// ============================================================================

#[test]
fn test_templates_cover_domain() {
    for variant in [TemplateVariant::Multilayer, TemplateVariant::Monolayer] {
        let grid = generate_grid(&template_document(variant), &domain_400(20.0), GenerateOptions::default())
            .unwrap_or_else(|e| panic!("{variant} template failed: {e}"));
        assert_eq!(grid.defined_count(), grid.len());
    }
}

#[test]
fn test_template_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("templates").join("monolayer.xml");
    let output = dir.path().join("monolayer.csv");

    write_template(&input, TemplateVariant::Monolayer, false).unwrap();
    let summary = generate(&input, &output, &domain_400(20.0), GenerateOptions::default()).unwrap();
    assert_eq!(summary.rows, 1600);
    assert_eq!(read_records(&output).len(), 1600);
}

#[test]
fn test_template_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ecm.xml");
    fs::write(&path, "keep me").unwrap();

    assert!(write_template(&path, TemplateVariant::Multilayer, false).is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");

    write_template(&path, TemplateVariant::Multilayer, true).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("<ic_ecm>"));
}

// ============================================================================
// Domain configuration
// ============================================================================

#[test]
fn test_domain_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("domain.json");
    fs::write(
        &path,
        r#"{"x_min": -400, "x_max": 400, "dx": 40, "y_min": -400, "y_max": 400, "dy": 40, "z0": 1.5}"#,
    )
    .unwrap();

    let domain = DomainConfig::load(&path).unwrap();
    assert_eq!(domain, DomainConfig { z0: 1.5, ..domain_400(40.0) });
}

#[test]
fn test_domain_json_rejects_bad_spacing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("domain.json");
    fs::write(
        &path,
        r#"{"x_min": 0, "x_max": 10, "dx": -1, "y_min": 0, "y_max": 10, "dy": 1}"#,
    )
    .unwrap();
    assert!(matches!(DomainConfig::load(&path), Err(ecm_ic::EcmError::InvalidDomain(_))));
}

#[test]
fn test_domain_from_physicell_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("PhysiCell_settings.xml");
    fs::write(
        &path,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<PhysiCell_settings version="devel-version">
    <domain>
        <x_min>-400</x_min>
        <x_max>400</x_max>
        <y_min>-400</y_min>
        <y_max>400</y_max>
        <z_min>-10</z_min>
        <z_max>10</z_max>
        <dx>40</dx>
        <dy>40</dy>
        <dz>20</dz>
        <use_2D>true</use_2D>
    </domain>
</PhysiCell_settings>"#,
    )
    .unwrap();

    let domain = DomainConfig::from_physicell_settings(&path).unwrap();
    assert_eq!(domain, domain_400(40.0));
}
