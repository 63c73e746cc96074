//! Method Q Tests
//!
//! Throughput-limited integration for more than 50 occupants. Each segment
//! takes max(N / (W·q), L / v). Covers the continuity and narrow-door
//! options as well as the default behavior they leave untouched.

use evacuation_core_rs::calculator::{
    CalculationError, CalculationOptions, ContinuityMode, EvacuationCalculator, Method,
    TraceEntry,
};
use evacuation_core_rs::regulations::RegulationsError;
use evacuation_core_rs::{FlowParams, PathType, RegulationsLoader, Segment};
use serde_json::json;
use std::sync::Arc;

fn table_11() -> serde_json::Value {
    json!({ "data": [
        { "D": 0.1,
          "horiz": {"v": 100.0, "q": 10.0}, "stair_down": {"v": 100.0, "q": 10.0},
          "stair_up": {"v": 60.0, "q": 6.0}, "door_wide": {"v": 100.0, "q": 10.0} },
        { "D": 0.5,
          "horiz": {"v": 91.0, "q": 45.5}, "stair_down": {"v": 95.0, "q": 47.5},
          "stair_up": {"v": 55.0, "q": 27.5}, "door_wide": {"v": 92.0, "q": 46.0} },
        { "D": 1.0,
          "horiz": {"v": 80.14, "q": 80.1}, "stair_down": {"v": 86.0, "q": 86.0},
          "stair_up": {"v": 49.0, "q": 49.0}, "door_wide": {"v": 82.0, "q": 180.0} },
        { "D": 2.0,
          "horiz": {"v": 60.5, "q": 121.0}, "stair_down": {"v": 66.0, "q": 132.0},
          "stair_up": {"v": 38.0, "q": 76.0}, "door_wide": {"v": 63.0, "q": 126.0} },
        { "D": 9.2,
          "horiz": {"v": 15.0, "q": 138.0}, "stair_down": {"v": 16.5, "q": 151.8},
          "stair_up": {"v": 11.5, "q": 105.8}, "door_wide": {"v": 19.0, "q": 174.8} }
    ]})
}

fn table_12() -> serde_json::Value {
    json!({ "data": [
        { "width": 0.6, "v": 10.0, "q": 150.0 },
        { "width": 0.8, "v": 12.0, "q": 160.0 },
        { "width": 1.0, "v": 14.0, "q": 170.0 },
        { "width": 1.6, "v": 20.0, "q": 200.0 }
    ]})
}

/// Helper to create the shared tables
fn regulations() -> Arc<RegulationsLoader> {
    Arc::new(
        RegulationsLoader::from_value(json!({
            "table_11_flow_params": table_11(),
            "table_12_narrow_doors": table_12()
        }))
        .unwrap(),
    )
}

fn calculator() -> EvacuationCalculator {
    EvacuationCalculator::new(regulations())
}

fn calculator_with(options: CalculationOptions) -> EvacuationCalculator {
    EvacuationCalculator::new(regulations()).with_options(options)
}

/// Density recorded for each Method Q segment in the trace
fn traced_densities(entries: &[TraceEntry]) -> Vec<f64> {
    entries
        .iter()
        .filter_map(|e| match e {
            TraceEntry::ThroughputSegment { density, .. } => Some(*density),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Core algorithm
// ============================================================================

#[test]
fn test_single_segment_throughput_bound() {
    // N=60, A=100 → D=0.6 → row D=1.0 (v=80.14, q=80.1)
    // throughput 60 / 80.1 ≈ 0.749 > travel 10 / 80.14 ≈ 0.125
    let calc = calculator();
    let path = vec![Segment::new(10.0, PathType::Horizontal)];

    let result = calc.calculate(&path, 60, 100.0).unwrap();

    assert_eq!(result.method, Method::Q);
    assert!((result.total_time - 60.0 / 80.1).abs() < 1e-12);
    assert!((result.total_time - 0.749).abs() < 1e-3);
}

#[test]
fn test_single_segment_travel_bound() {
    // Long corridor: 1000 / 80.14 ≈ 12.48 min dominates 0.749 min
    let calc = calculator();
    let path = vec![Segment::new(1000.0, PathType::Horizontal)];

    let result = calc.calculate(&path, 60, 100.0).unwrap();
    assert!((result.total_time - 1000.0 / 80.14).abs() < 1e-12);
}

#[test]
fn test_segment_maxima_accumulate() {
    let calc = calculator();
    let path = vec![
        Segment::new(10.0, PathType::Horizontal).with_width(1.5),
        Segment::new(8.0, PathType::StairDown).with_width(1.2),
        Segment::new(0.4, PathType::Door).with_width(1.8),
    ];

    let result = calc.calculate(&path, 60, 100.0).unwrap();

    let t1 = (60.0 / (1.5 * 80.1_f64)).max(10.0 / 80.14);
    let t2 = (60.0 / (1.2 * 86.0_f64)).max(8.0 / 86.0);
    let t3 = (60.0 / (1.8 * 180.0_f64)).max(0.4 / 82.0);
    assert!((result.total_time - (t1 + t2 + t3)).abs() < 1e-12);
}

#[test]
fn test_trace_records_both_bounds() {
    let calc = calculator();
    let path = vec![Segment::new(10.0, PathType::Horizontal)];

    let result = calc.calculate(&path, 60, 100.0).unwrap();

    match result.log.segment_entries()[0] {
        TraceEntry::ThroughputSegment {
            index,
            width,
            density,
            q,
            v,
            throughput_time,
            travel_time,
            time,
            narrow_door,
            ..
        } => {
            assert_eq!(*index, 1);
            assert_eq!(*width, 1.0);
            assert_eq!(*density, 0.6);
            assert_eq!(*q, 80.1);
            assert_eq!(*v, 80.14);
            assert!(*throughput_time > *travel_time);
            assert_eq!(*time, *throughput_time);
            assert!(narrow_door.is_none());
        }
        other => panic!("unexpected entry {:?}", other),
    }

    let text = result.log.render();
    assert!(text.starts_with("Method Q Selected (N > 50)"));
    assert!(text.contains("Seg 1: W=1.00m L=10.00m Type=horizontal D=0.60 -> q=80.10 v=80.14"));
}

#[test]
fn test_empty_path_header_only() {
    let calc = calculator();

    let result = calc.calculate(&[], 200, 100.0).unwrap();

    assert_eq!(result.method, Method::Q);
    assert_eq!(result.total_time, 0.0);
    assert_eq!(result.log.len(), 2);
    assert!(result.log.segment_entries().is_empty());
}

#[test]
fn test_empty_table_yields_no_partial_result() {
    let calc = EvacuationCalculator::new(Arc::new(RegulationsLoader::empty()));
    let path = vec![
        Segment::new(10.0, PathType::Horizontal),
        Segment::new(5.0, PathType::StairDown),
    ];

    let err = calc.calculate(&path, 80, 100.0).unwrap_err();
    assert_eq!(
        err,
        CalculationError::Regulations(RegulationsError::EmptyTable("table_11_flow_params"))
    );
}

// ============================================================================
// Continuity
// ============================================================================

#[test]
fn test_pinned_density_holds_across_width_change() {
    let calc = calculator();
    let path = vec![
        Segment::new(10.0, PathType::Horizontal).with_width(1.0),
        Segment::new(10.0, PathType::Horizontal).with_width(2.0),
    ];

    let result = calc.calculate(&path, 60, 100.0).unwrap();

    assert_eq!(traced_densities(result.log.entries()), vec![0.6, 0.6]);

    let continuity: Vec<&TraceEntry> = result
        .log
        .entries()
        .iter()
        .filter(|e| matches!(e, TraceEntry::Continuity { .. }))
        .collect();
    assert_eq!(continuity.len(), 1);
    match continuity[0] {
        TraceEntry::Continuity {
            flow,
            next_width,
            next_q,
            next_density,
            ..
        } => {
            assert_eq!(*flow, 80.1);
            assert_eq!(*next_width, 2.0);
            assert!((next_q - 40.05).abs() < 1e-12);
            assert!(next_density.is_none());
        }
        _ => unreachable!(),
    }

    // Pinned density: the second segment uses the same row as the first
    let t = (60.0 / 80.1_f64).max(10.0 / 80.14) + (60.0 / (2.0 * 80.1_f64)).max(10.0 / 80.14);
    assert!((result.total_time - t).abs() < 1e-12);
}

#[test]
fn test_width_continuity_rederives_density() {
    // Seg 1: W=2.0, D=0.6 → q=80.1, flow = 160.2 p/min
    // Seg 2: W=1.0 needs q=160.2, beyond every horizontal row → D=9.2
    let calc = calculator_with(CalculationOptions {
        continuity: ContinuityMode::WidthContinuity,
        ..Default::default()
    });
    let path = vec![
        Segment::new(10.0, PathType::Horizontal).with_width(2.0),
        Segment::new(10.0, PathType::Horizontal).with_width(1.0),
    ];

    let result = calc.calculate(&path, 60, 100.0).unwrap();

    assert_eq!(traced_densities(result.log.entries()), vec![0.6, 9.2]);

    let t1 = (60.0 / (2.0 * 80.1_f64)).max(10.0 / 80.14);
    let t2 = (60.0 / 138.0_f64).max(10.0 / 15.0);
    assert!((result.total_time - (t1 + t2)).abs() < 1e-12);
}

#[test]
fn test_width_continuity_widening_lowers_density() {
    // Seg 1: W=1.0, q=80.1; Seg 2: W=2.0 needs q=40.05 → row D=0.5
    let calc = calculator_with(CalculationOptions {
        continuity: ContinuityMode::WidthContinuity,
        ..Default::default()
    });
    let path = vec![
        Segment::new(10.0, PathType::Horizontal).with_width(1.0),
        Segment::new(10.0, PathType::Horizontal).with_width(2.0),
    ];

    let result = calc.calculate(&path, 60, 100.0).unwrap();
    assert_eq!(traced_densities(result.log.entries()), vec![0.6, 0.5]);
}

// ============================================================================
// Narrow doors
// ============================================================================

#[test]
fn test_narrow_door_is_traced_but_not_binding_by_default() {
    let calc = calculator();
    let path = vec![Segment::new(0.5, PathType::Door).with_width(0.8)];

    let result = calc.calculate(&path, 60, 100.0).unwrap();

    match result.log.segment_entries()[0] {
        TraceEntry::ThroughputSegment { q, narrow_door, .. } => {
            assert_eq!(*q, 180.0);
            assert_eq!(*narrow_door, Some(FlowParams { v: 12.0, q: 160.0 }));
        }
        other => panic!("unexpected entry {:?}", other),
    }
    assert!((result.total_time - 60.0 / (0.8 * 180.0)).abs() < 1e-12);
}

#[test]
fn test_narrow_door_bottleneck_option_caps_throughput() {
    let calc = calculator_with(CalculationOptions {
        narrow_door_bottleneck: true,
        ..Default::default()
    });
    let path = vec![Segment::new(0.5, PathType::Door).with_width(0.8)];

    let result = calc.calculate(&path, 60, 100.0).unwrap();
    assert!((result.total_time - 60.0 / (0.8 * 160.0)).abs() < 1e-12);
}

#[test]
fn test_door_at_upper_width_bound_is_not_narrow() {
    let calc = calculator_with(CalculationOptions {
        narrow_door_bottleneck: true,
        ..Default::default()
    });
    let path = vec![Segment::new(0.5, PathType::Door).with_width(1.6)];

    let result = calc.calculate(&path, 60, 100.0).unwrap();
    match result.log.segment_entries()[0] {
        TraceEntry::ThroughputSegment { narrow_door, q, .. } => {
            assert!(narrow_door.is_none());
            assert_eq!(*q, 180.0);
        }
        other => panic!("unexpected entry {:?}", other),
    }
}

#[test]
fn test_missing_table_12_only_fails_when_binding() {
    let reg = Arc::new(
        RegulationsLoader::from_value(json!({ "table_11_flow_params": table_11() })).unwrap(),
    );
    let path = vec![Segment::new(0.5, PathType::Door).with_width(0.9)];

    let informational = EvacuationCalculator::new(Arc::clone(&reg));
    assert!(informational.calculate(&path, 60, 100.0).is_ok());

    let binding = EvacuationCalculator::new(reg).with_options(CalculationOptions {
        narrow_door_bottleneck: true,
        ..Default::default()
    });
    assert_eq!(
        binding.calculate(&path, 60, 100.0).unwrap_err(),
        CalculationError::Regulations(RegulationsError::EmptyTable("table_12_narrow_doors"))
    );
}
