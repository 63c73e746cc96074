//! Method L Tests
//!
//! Free-flow integration for at most 50 occupants: density is derived once
//! from the origin room and held for the whole path.

use evacuation_core_rs::calculator::{EvacuationCalculator, Method, TraceEntry};
use evacuation_core_rs::{PathType, RegulationsLoader, Segment};
use serde_json::json;
use std::sync::Arc;

/// Helper to create a calculator over a small Table 11
fn calculator() -> EvacuationCalculator {
    let reg = RegulationsLoader::from_value(json!({
        "table_11_flow_params": { "data": [
            { "D": 0.1,
              "horiz": {"v": 100.0, "q": 10.0}, "stair_down": {"v": 100.0, "q": 10.0},
              "stair_up": {"v": 60.0, "q": 6.0}, "door_wide": {"v": 100.0, "q": 10.0} },
            { "D": 0.5,
              "horiz": {"v": 91.0, "q": 45.5}, "stair_down": {"v": 95.0, "q": 47.5},
              "stair_up": {"v": 55.0, "q": 27.5}, "door_wide": {"v": 92.0, "q": 46.0} },
            { "D": 9.2,
              "horiz": {"v": 15.0, "q": 138.0}, "stair_down": {"v": 16.5, "q": 151.8},
              "stair_up": {"v": 11.5, "q": 105.8}, "door_wide": {"v": 19.0, "q": 174.8} }
        ]}
    }))
    .unwrap();
    EvacuationCalculator::new(Arc::new(reg))
}

#[test]
fn test_density_is_occupants_over_area() {
    let calc = calculator();
    assert_eq!(calc.density(10, 100.0), 0.1);
    assert_eq!(calc.density(1000, 10.0), 9.2);
}

#[test]
fn test_non_positive_area_is_boundary_density() {
    let calc = calculator();
    assert_eq!(calc.density(7, 0.0), 9.2);
    assert_eq!(calc.density(7, -20.0), 9.2);
}

#[test]
fn test_method_selection_boundary() {
    let calc = calculator();
    assert_eq!(calc.select_method(1), Method::L);
    assert_eq!(calc.select_method(50), Method::L);
    assert_eq!(calc.select_method(51), Method::Q);
}

#[test]
fn test_single_horizontal_segment() {
    // N=10, A=100 → D=0.1 → v_horiz = 100 m/min; 10 m → 0.1 min
    let calc = calculator();
    let path = vec![Segment::new(10.0, PathType::Horizontal)];

    let result = calc.calculate(&path, 10, 100.0).unwrap();

    assert_eq!(result.method, Method::L);
    assert_eq!(result.initial_density, 0.1);
    assert_eq!(result.total_time, 0.1);
}

#[test]
fn test_segment_times_accumulate() {
    // N=30, A=100 → D=0.3 → row D=0.5
    let calc = calculator();
    let path = vec![
        Segment::new(18.2, PathType::Horizontal),
        Segment::new(9.5, PathType::StairDown),
        Segment::new(5.5, PathType::StairUp),
        Segment::new(0.5, PathType::Door),
    ];

    let result = calc.calculate(&path, 30, 100.0).unwrap();

    let expected = 18.2 / 91.0 + 9.5 / 95.0 + 5.5 / 55.0 + 0.5 / 92.0;
    assert!((result.total_time - expected).abs() < 1e-12);
    assert_eq!(result.log.segment_entries().len(), 4);

    let traced: f64 = result
        .log
        .segment_entries()
        .iter()
        .filter_map(|e| e.segment_time())
        .sum();
    assert!((traced - result.total_time).abs() < 1e-12);
}

#[test]
fn test_width_does_not_affect_method_l() {
    let calc = calculator();
    let narrow = vec![Segment::new(10.0, PathType::Door).with_width(0.7)];
    let wide = vec![Segment::new(10.0, PathType::Door).with_width(3.0)];

    let a = calc.calculate(&narrow, 40, 100.0).unwrap();
    let b = calc.calculate(&wide, 40, 100.0).unwrap();
    assert_eq!(a.total_time, b.total_time);
}

#[test]
fn test_crowded_origin_uses_boundary_row() {
    // 50 people in 2 m² → D=25 → clamped 9.2
    let calc = calculator();
    let path = vec![Segment::new(15.0, PathType::Horizontal)];

    let result = calc.calculate(&path, 50, 2.0).unwrap();
    assert_eq!(result.initial_density, 9.2);
    assert!((result.total_time - 1.0).abs() < 1e-12);
}

#[test]
fn test_empty_path_has_zero_time_and_header_only() {
    let calc = calculator();

    let result = calc.calculate(&[], 12, 100.0).unwrap();

    assert_eq!(result.total_time, 0.0);
    assert_eq!(result.log.len(), 2);
    assert!(result.log.segment_entries().is_empty());
    assert_eq!(
        result.log.entries()[0],
        TraceEntry::MethodSelected { method: Method::L }
    );
    assert!(matches!(
        result.log.entries()[1],
        TraceEntry::InitialDensity { occupant_count: 12, .. }
    ));
}

#[test]
fn test_trace_text() {
    let calc = calculator();
    let path = vec![Segment::new(10.0, PathType::Horizontal)];

    let result = calc.calculate(&path, 10, 100.0).unwrap();
    let text = result.log.render();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines,
        vec![
            "Method L Selected (N <= 50)",
            "Initial Density D = 0.10 (N=10, A=100.00)",
            "Seg 1 (horizontal): L=10.00m, v=100.00m/min -> t=0.10 min",
        ]
    );
}

#[test]
fn test_empty_table_aborts_calculation() {
    let calc = EvacuationCalculator::new(Arc::new(RegulationsLoader::empty()));
    let path = vec![Segment::new(10.0, PathType::Horizontal)];

    assert!(calc.calculate(&path, 10, 100.0).is_err());
    // Nothing to look up: an empty path still succeeds
    assert_eq!(calc.calculate(&[], 10, 100.0).unwrap().total_time, 0.0);
}
