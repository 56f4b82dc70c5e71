//! Property checks over randomly generated guillotine layouts.
//!
//! 1. Every tiled guillotine arrangement compiles to one leaf per label.
//! 2. Split ratios equal the children's spans along the split axis.
//! 3. Compiling the same art twice gives the same ids, shape and ratios.
//! 4. Replaying generated source places every axis where materialization does.

use ascii_layout::{
    Grid, LayoutConfig, Orientation, PartitionNode, PartitionTree, SceneBackend, compile,
    generate_source, materialize, replay_source,
};
use proptest::prelude::*;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

// ── Helpers ─────────────────────────────────────────────────────────────

/// At most 7 x 8 cells, so every leaf gets its own glyph from `ALPHABET`.
const MAX_ROWS: usize = 7;
const MAX_COLS: usize = 8;

/// Recursively cut a `rows` x `cols` grid using `choices`, labelling each
/// final rectangle with a fresh glyph or leaving it blank. The first
/// rectangle is always labelled.
fn guillotine_art(rows: usize, cols: usize, choices: &[u8]) -> (Vec<String>, usize) {
    let mut cells = vec![vec![' '; cols]; rows];
    let mut next_label = 0;
    let mut cursor = 0;
    fill(
        &mut cells,
        (0, 0, rows, cols),
        choices,
        &mut cursor,
        &mut next_label,
    );
    let lines: Vec<String> = cells
        .into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect();
    (lines, next_label)
}

fn fill(
    cells: &mut [Vec<char>],
    (top, left, height, width): (usize, usize, usize, usize),
    choices: &[u8],
    cursor: &mut usize,
    next_label: &mut usize,
) {
    let choice = choices.get(*cursor).copied().unwrap_or(0);
    *cursor += 1;
    let cut_cols = choice % 3 == 1 && width > 1;
    let cut_rows = choice % 3 == 2 && height > 1;

    if cut_cols {
        let at = 1 + (choice as usize / 3) % (width - 1);
        fill(cells, (top, left, height, at), choices, cursor, next_label);
        fill(cells, (top, left + at, height, width - at), choices, cursor, next_label);
    } else if cut_rows {
        let at = 1 + (choice as usize / 3) % (height - 1);
        fill(cells, (top, left, at, width), choices, cursor, next_label);
        fill(cells, (top + at, left, height - at, width), choices, cursor, next_label);
    } else {
        let glyph = if choice % 5 == 3 && *next_label > 0 {
            '.'
        } else {
            *next_label += 1;
            ALPHABET[*next_label - 1] as char
        };
        for row in cells.iter_mut().skip(top).take(height) {
            for cell in row.iter_mut().skip(left).take(width) {
                *cell = glyph;
            }
        }
    }
}

fn art_strategy() -> impl Strategy<Value = (Vec<String>, usize)> {
    (1usize..=MAX_ROWS, 1usize..=MAX_COLS, prop::collection::vec(any::<u8>(), 0..64))
        .prop_map(|(rows, cols, choices)| guillotine_art(rows, cols, &choices))
}

fn compile_lines(lines: &[String]) -> PartitionTree {
    let config = LayoutConfig::default();
    let grid = Grid::parse_lines(lines, config.blank).expect("generated art parses");
    compile(&grid, &config).expect("generated art is guillotine")
}

fn check_ratios(node: &PartitionNode) -> Result<(), TestCaseError> {
    if let PartitionNode::Split(split) = node {
        prop_assert_eq!(split.children.len(), split.ratios.len());
        prop_assert!(split.children.len() >= 2);
        let mut covered = 0;
        for (child, &ratio) in split.children.iter().zip(&split.ratios) {
            let region = child.region();
            let span = match split.orientation {
                Orientation::Columns => region.width(),
                Orientation::Rows => region.height(),
            };
            prop_assert!(ratio > 0);
            prop_assert_eq!(ratio, span);
            covered += span;
            check_ratios(child)?;
        }
        let parent_span = match split.orientation {
            Orientation::Columns => split.region.width(),
            Orientation::Rows => split.region.height(),
        };
        prop_assert_eq!(covered, parent_span);
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. One leaf per label
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn leaf_per_label((lines, labels) in art_strategy()) {
        let tree = compile_lines(&lines);
        prop_assert_eq!(tree.leaf_count(), labels, "art: {:?}", lines);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Ratios are proportional to child spans
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ratios_match_spans((lines, _labels) in art_strategy()) {
        let tree = compile_lines(&lines);
        check_ratios(&tree.root)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn compiling_twice_is_identical((lines, _labels) in art_strategy()) {
        let first = compile_lines(&lines);
        let second = compile_lines(&lines);
        prop_assert_eq!(first.fingerprint(), second.fingerprint());
        prop_assert_eq!(&first, &second);

        let mut ids: Vec<String> = first
            .root
            .descendants()
            .into_iter()
            .filter_map(|node| node.id().map(str::to_string))
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), total, "node ids collide");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Replay agrees with materialization
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn replay_matches_materialize((lines, labels) in art_strategy()) {
        let config = LayoutConfig::default().with_factors(Some(0.75), Some(0.5));
        let tree = compile_lines(&lines);
        let source = generate_source(&tree, &config).expect("source renders");

        let mut direct = SceneBackend::new();
        let materialized = materialize(&tree, &config, &mut direct).expect("materializes");
        let mut replayed = SceneBackend::new();
        let rebuilt = replay_source(&source, &mut replayed).expect("source replays");

        prop_assert_eq!(rebuilt.figure, materialized.figure);
        prop_assert_eq!(materialized.axes.len(), labels);
        prop_assert_eq!(
            rebuilt.grids.keys().collect::<Vec<_>>(),
            materialized.grids.keys().collect::<Vec<_>>()
        );
        prop_assert_eq!(
            rebuilt.axes.keys().collect::<Vec<_>>(),
            materialized.axes.keys().collect::<Vec<_>>()
        );
        for (label, axis) in &materialized.axes {
            prop_assert_eq!(
                replayed.axis_box(rebuilt.axes[label]),
                direct.axis_box(*axis),
                "axis {} in art {:?}", label, lines
            );
        }
    }
}
