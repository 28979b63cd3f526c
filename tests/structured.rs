mod common;

use common::*;
use modflow_reader::modflow::decode::structured;
use modflow_reader::{
    read_budget, read_heads, GridShape, ModflowError, OutputFile, StructuredBudget,
    StructuredHead, TermFilter, TimeStepKey,
};
use ndarray::Array3;

const SHAPE: GridShape = GridShape { nlay: 2, nrow: 3, ncol: 4 };

/// (kper, kstp, totim) of each synthetic head step.
const STEPS: &[(i32, i32, f32)] = &[(1, 1, 10.0), (1, 2, 20.0), (2, 1, 35.5)];

fn layer_values(step: usize, layer: usize) -> Vec<f32> {
    ramp(SHAPE.cells_per_layer(), step as f32 * 100.0 + layer as f32 * 10.0)
}

fn expected_heads(step: usize) -> Array3<f32> {
    let values: Vec<f32> = (0..SHAPE.nlay).flat_map(|l| layer_values(step, l)).collect();
    Array3::from_shape_vec((SHAPE.nlay, SHAPE.nrow, SHAPE.ncol), values).unwrap()
}

fn head_file() -> Vec<u8> {
    let mut buf = Vec::new();
    for (s, &(kper, kstp, totim)) in STEPS.iter().enumerate() {
        for layer in 0..SHAPE.nlay {
            head_record(
                &mut buf,
                kstp,
                kper,
                totim - 5.0,
                // only the first layer's totim is kept
                if layer == 0 { totim } else { -1.0 },
                SHAPE.ncol as i32,
                SHAPE.nrow as i32,
                layer as i32 + 1,
                &layer_values(s, layer),
            );
        }
    }
    buf
}

const TERMS: &[&str] = &["STORAGE", "CONSTANT HEAD", "RIVER LEAKAGE", "WELLS"];

fn budget_values(step: usize, term: usize) -> Vec<f32> {
    ramp(SHAPE.cells(), -(step as f32) * 1000.0 - term as f32 * 7.0)
}

fn budget_file() -> Vec<u8> {
    let mut buf = Vec::new();
    for step in 0..2 {
        for (t, term) in TERMS.iter().enumerate() {
            budget_record(
                &mut buf,
                step as i32 + 1,
                1,
                term,
                SHAPE.ncol as i32,
                SHAPE.nrow as i32,
                SHAPE.nlay as i32,
                &budget_values(step, t),
            );
        }
    }
    buf
}

#[test]
fn heads_round_trip_bit_for_bit() {
    let bytes = head_file();
    let file = write_temp(&bytes);

    let hds = read_heads(file.path(), SHAPE).unwrap();

    let keys: Vec<_> = hds.heads.keys().copied().collect();
    assert_eq!(
        keys,
        vec![TimeStepKey::new(1, 1), TimeStepKey::new(1, 2), TimeStepKey::new(2, 1)]
    );
    for (s, &(kper, kstp, _)) in STEPS.iter().enumerate() {
        let got = hds.heads.get(&TimeStepKey::new(kper, kstp)).unwrap();
        assert_eq!(got.shape(), &[2, 3, 4]);
        let expected = expected_heads(s);
        for (a, b) in got.iter().zip(expected.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
    assert_eq!(hds.totim, vec![10.0, 20.0, 35.5]);
    assert_eq!(hds.stats.records, 6);
    assert_eq!(hds.stats.bytes_consumed, bytes.len() as u64);
}

#[test]
fn zero_dimension_short_circuits_without_io() {
    let missing = "/nonexistent/dir/model.hds";
    for shape in [
        GridShape::new(0, 3, 4),
        GridShape::new(2, 0, 4),
        GridShape::new(2, 3, 0),
    ] {
        let hds = read_heads(missing, shape).unwrap();
        assert!(hds.heads.is_empty());
        assert!(hds.totim.is_empty());

        let cbb = read_budget(missing, shape, &TermFilter::All).unwrap();
        assert!(cbb.terms.is_empty());
    }
}

#[test]
fn empty_path_short_circuits() {
    let hds = read_heads("", SHAPE).unwrap();
    assert!(hds.heads.is_empty());
    assert!(hds.totim.is_empty());
}

#[test]
fn missing_file_is_an_io_error() {
    let err = read_heads("/nonexistent/dir/model.hds", SHAPE).unwrap_err();
    assert!(matches!(err, ModflowError::Io(_)));
}

#[test]
fn truncated_head_file_fails() {
    let mut bytes = head_file();
    bytes.pop();
    let file = write_temp(&bytes);

    let err = read_heads(file.path(), SHAPE).unwrap_err();
    assert!(matches!(err, ModflowError::Truncated { .. }), "{:?}", err);
}

#[test]
fn incomplete_layer_group_fails() {
    let mut bytes = head_file();
    let layer_record = 44 + SHAPE.cells_per_layer() * 4;
    bytes.truncate(bytes.len() - layer_record);
    let file = write_temp(&bytes);

    let err = read_heads(file.path(), SHAPE).unwrap_err();
    match err {
        ModflowError::Truncated { needed, available, .. } => {
            assert_eq!(needed, layer_record as u64);
            assert_eq!(available, 0);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn partial_header_after_last_record_fails() {
    let mut bytes = head_file();
    bytes.extend_from_slice(&[0, 0, 0]);
    let file = write_temp(&bytes);

    let err = read_heads(file.path(), SHAPE).unwrap_err();
    assert!(
        matches!(err, ModflowError::Truncated { needed: 44, available: 3, .. }),
        "{:?}",
        err
    );
}

#[test]
fn file_cut_inside_a_header_fails() {
    let mut bytes = head_file();
    let layer_record = 44 + SHAPE.cells_per_layer() * 4;
    bytes.truncate(layer_record + 20);
    let file = write_temp(&bytes);

    let err = read_heads(file.path(), SHAPE).unwrap_err();
    match err {
        ModflowError::Truncated { offset, needed, available, .. } => {
            assert_eq!(offset, layer_record as u64);
            assert_eq!(needed, 44);
            assert_eq!(available, 20);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn oversized_layer_count_fails_without_allocating() {
    let mut bytes = Vec::new();
    head_record(&mut bytes, 1, 1, 1.0, 1.0, 2, 2, 1, &[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(bytes.len(), 60);

    let err = structured::heads(&bytes, GridShape::new(1 << 40, 2, 2)).unwrap_err();
    assert!(matches!(err, ModflowError::Truncated { available: 0, .. }), "{:?}", err);
}

#[test]
fn cell_counts_do_not_overflow() {
    let huge = GridShape::new(usize::MAX, 2, 2);
    assert_eq!(huge.checked_cells_per_layer(), Some(4));
    assert_eq!(huge.checked_cells(), None);
    assert_eq!(huge.cells(), usize::MAX);

    let max = i32::MAX;
    let mut bytes = Vec::new();
    budget_record(&mut bytes, 1, 1, "STORAGE", max, max, max, &[]);
    let shape = GridShape::new(max as usize, max as usize, max as usize);
    let err = structured::budget(&bytes, shape, &TermFilter::All).unwrap_err();
    assert!(matches!(err, ModflowError::InvalidRecord { offset: 0, .. }), "{:?}", err);
}

#[test]
fn extra_layers_are_detected() {
    let file = write_temp(&head_file());

    let err = read_heads(file.path(), GridShape::new(1, 3, 4)).unwrap_err();
    assert!(
        matches!(
            err,
            ModflowError::DimensionMismatch { context: "head record ilay", expected: 1, found: 2 }
        ),
        "{:?}",
        err
    );
}

#[test]
fn layers_from_different_steps_are_not_merged() {
    let mut bytes = Vec::new();
    head_record(&mut bytes, 1, 1, 1.0, 1.0, 4, 3, 1, &layer_values(0, 0));
    head_record(&mut bytes, 2, 1, 1.0, 1.0, 4, 3, 2, &layer_values(0, 1));
    let file = write_temp(&bytes);

    let err = read_heads(file.path(), SHAPE).unwrap_err();
    let layer_record = (44 + SHAPE.cells_per_layer() * 4) as u64;
    assert!(
        matches!(err, ModflowError::InvalidRecord { offset, .. } if offset == layer_record),
        "{:?}",
        err
    );
}

#[test]
fn wrong_dimensions_are_detected() {
    let file = write_temp(&head_file());

    let err = read_heads(file.path(), GridShape::new(2, 3, 5)).unwrap_err();
    assert!(
        matches!(err, ModflowError::DimensionMismatch { expected: 5, found: 4, .. }),
        "{:?}",
        err
    );

    let file = write_temp(&budget_file());
    let err = read_budget(file.path(), GridShape::new(3, 3, 4), &TermFilter::All).unwrap_err();
    assert!(matches!(err, ModflowError::DimensionMismatch { .. }), "{:?}", err);
}

#[test]
fn truncated_budget_file_fails() {
    let mut bytes = budget_file();
    bytes.pop();
    let file = write_temp(&bytes);

    let err = read_budget(file.path(), SHAPE, &TermFilter::All).unwrap_err();
    assert!(matches!(err, ModflowError::Truncated { .. }), "{:?}", err);
}

#[test]
fn iter_heads_matches_full_decode() {
    let file = write_temp(&head_file());
    let reader = OutputFile::open(file.path()).unwrap();

    let full = reader.heads(SHAPE).unwrap();
    let mut steps = reader.iter_heads(SHAPE);
    let collected: Vec<_> = steps.by_ref().collect::<Result<_, _>>().unwrap();

    assert_eq!(collected.len(), 3);
    for step in &collected {
        assert_eq!(full.heads.get(&step.key), Some(&step.data));
        assert_eq!(step.text, "HEAD");
    }
    assert_eq!(collected[2].pertim, 30.5);
    assert_eq!(steps.stats(), full.stats);
}

#[test]
fn raw_records_cover_the_file() {
    let bytes = head_file();
    let file = write_temp(&bytes);
    let reader = OutputFile::open(file.path()).unwrap();

    let records: Vec<_> = reader
        .iter_records::<StructuredHead>(SHAPE)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 6);
    assert_eq!(records.iter().map(|r| r.size()).sum::<u64>(), reader.len());
    assert_eq!(records[1].header.ilay, 2);
    assert_eq!(records[1].offset, records[0].size());
    assert_eq!(records[3].values(), layer_values(1, 1));

    let budget_bytes = budget_file();
    let budget = write_temp(&budget_bytes);
    let reader = OutputFile::open(budget.path()).unwrap();
    let sizes: u64 = reader
        .iter_records::<StructuredBudget>(SHAPE)
        .map(|r| r.unwrap().size())
        .sum();
    assert_eq!(sizes, budget_bytes.len() as u64);
}

#[test]
fn budget_unfiltered_keeps_every_term() {
    let bytes = budget_file();
    let file = write_temp(&bytes);

    let cbb = read_budget(file.path(), SHAPE, &TermFilter::All).unwrap();

    let labels: Vec<_> = cbb.terms.keys().cloned().collect();
    assert_eq!(labels, TERMS.iter().map(|t| t.to_string()).collect::<Vec<_>>());
    for (t, term) in TERMS.iter().enumerate() {
        let by_step = cbb.terms.get(*term).unwrap();
        assert_eq!(by_step.len(), 2);
        for step in 0..2 {
            let arr = by_step.get(&TimeStepKey::new(1, step as i32 + 1)).unwrap();
            assert_eq!(arr.shape(), &[2, 3, 4]);
            assert_eq!(arr.iter().copied().collect::<Vec<_>>(), budget_values(step, t));
        }
    }
    assert_eq!(cbb.stats.records, 8);
    assert_eq!(cbb.stats.bytes_consumed, bytes.len() as u64);
}

#[test]
fn budget_filter_keeps_only_the_intersection() {
    let bytes = budget_file();
    let file = write_temp(&bytes);

    let all = read_budget(file.path(), SHAPE, &TermFilter::All).unwrap();
    let filter = TermFilter::from_items(["WELLS", "RIVER LEAKAGE", "ET"]);
    let some = read_budget(file.path(), SHAPE, &filter).unwrap();

    let mut labels: Vec<_> = some.terms.keys().cloned().collect();
    labels.sort();
    assert_eq!(labels, vec!["RIVER LEAKAGE".to_string(), "WELLS".to_string()]);
    for label in &labels {
        assert_eq!(some.terms.get(label.as_str()), all.terms.get(label.as_str()));
    }
    // filtered records are still consumed
    assert_eq!(some.stats, all.stats);
}

#[test]
fn empty_item_list_means_no_filter() {
    let file = write_temp(&budget_file());
    let filter = TermFilter::from_items(Vec::<String>::new());
    assert_eq!(filter, TermFilter::All);

    let cbb = read_budget(file.path(), SHAPE, &filter).unwrap();
    assert_eq!(cbb.terms.len(), TERMS.len());
}

#[test]
fn decoding_twice_is_idempotent() {
    let heads = write_temp(&head_file());
    assert_eq!(
        read_heads(heads.path(), SHAPE).unwrap(),
        read_heads(heads.path(), SHAPE).unwrap()
    );

    let budget = write_temp(&budget_file());
    let reader = OutputFile::open(budget.path()).unwrap();
    let filter = TermFilter::from_items(["STORAGE"]);
    assert_eq!(
        reader.budget(SHAPE, &filter).unwrap(),
        reader.budget(SHAPE, &filter).unwrap()
    );
}

#[test]
fn empty_file_decodes_to_nothing() {
    let file = write_temp(&[]);
    let hds = read_heads(file.path(), SHAPE).unwrap();
    assert!(hds.heads.is_empty());
    assert_eq!(hds.stats.bytes_consumed, 0);
}
