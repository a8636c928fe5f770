use mirrorgrid::grid::{CellRect, DropOutcome, Grid, GridChange, GridOptions, Removal, WidgetAttr, WidgetSpec};

fn unit_grid() -> Grid {
    Grid::with_options(GridOptions {
        default_width: 1,
        default_height: 1,
        min_width: 1,
        min_height: 1,
        ..Default::default()
    })
    .unwrap()
}

fn assert_no_overlap(grid: &Grid) {
    let rects: Vec<CellRect> = grid.widgets().map(|w| w.rect()).collect();
    for (i, a) in rects.iter().enumerate() {
        assert!(a.right() <= grid.cols(), "{:?} is past the last column", a);
        for b in &rects[i + 1..] {
            assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
        }
    }
}

#[test]
fn test_filling_the_grid_grows_rows() {
    let mut grid = unit_grid();
    for _ in 0..36 {
        grid.add_widget(WidgetSpec::default()).unwrap();
    }

    assert_eq!(grid.rows(), 6);
    assert!(grid.occupancy().iter().flatten().all(|covered| *covered));
    assert_no_overlap(&grid);

    let placement = grid.add_widget(WidgetSpec::default()).unwrap();
    assert_eq!(grid.rows(), 7);
    assert_eq!(placement.rect, CellRect::new(0, 6, 1, 1));
    assert!(grid.drain_changes().contains(&GridChange::RowsAdded(1)));
}

#[test]
fn test_move_past_last_column_shrinks() {
    let mut grid = unit_grid();
    let placement = grid.add_widget(WidgetSpec::at(0, 0).sized(4, 1)).unwrap();

    let outcome = grid.move_or_resize(placement.id, WidgetAttr::X, 4).unwrap();

    assert_eq!(outcome, DropOutcome::Shrunk(CellRect::new(4, 0, 2, 1)));
    assert_no_overlap(&grid);
}

#[test]
fn test_move_below_minimum_reverts() {
    let mut grid = unit_grid();
    let placement = grid.add_widget(WidgetSpec::at(0, 0).sized(4, 1).with_min(3, 1)).unwrap();

    let outcome = grid.move_or_resize(placement.id, WidgetAttr::X, 4).unwrap();

    assert_eq!(outcome, DropOutcome::Reverted(CellRect::new(0, 0, 4, 1)));
    assert_eq!(grid.widget(placement.id).unwrap().rect(), CellRect::new(0, 0, 4, 1));
}

#[test]
fn test_adopted_widget_that_cannot_fit_is_returned() {
    let mut grid = unit_grid();

    let outcome = grid
        .adopt_widget(WidgetSpec::default().with_min(5, 1), "sidebar", 1000, 150, 3, 0)
        .unwrap();

    match outcome {
        DropOutcome::Returned(Removal::Returned {
            container,
            width_px,
            height_px,
            ..
        }) => {
            assert_eq!(container, "sidebar");
            assert_eq!((width_px, height_px), (1000, 150));
        }
        other => panic!("expected the widget back, got {:?}", other),
    }
    assert_eq!(grid.widget_count(), 0);
}

#[test]
fn test_adopted_widget_is_sized_in_cells() {
    let mut grid = unit_grid();

    // 200px per column and per row on the default 1200px zone.
    let outcome = grid.adopt_widget(WidgetSpec::default(), "sidebar", 300, 100, 1, 1).unwrap();

    assert_eq!(outcome, DropOutcome::Placed(CellRect::new(1, 1, 2, 1)));
    assert_eq!(grid.widget_count(), 1);
}

#[test]
fn test_save_and_restore_keep_occupancy() {
    let mut grid = unit_grid();
    grid.add_widget(WidgetSpec::at(0, 0).sized(2, 2).with_content("<p>clock</p>")).unwrap();
    grid.add_widget(WidgetSpec::at(3, 1).sized(3, 1)).unwrap();
    grid.add_widget(WidgetSpec::at(0, 5).sized(6, 2)).unwrap();

    let saved = grid.save_grid();
    assert_eq!(saved.len(), 1);
    let restored = Grid::restore(grid.options().clone(), &saved[0]).unwrap();

    assert_eq!(restored.occupancy(), grid.occupancy());
    assert_eq!(restored.widget_count(), 3);
    assert!(restored.widgets().any(|w| w.content == "<p>clock</p>"));
}

#[test]
fn test_clear_grid_returns_adopted_widgets() {
    let mut grid = unit_grid();
    grid.add_widget(WidgetSpec::default()).unwrap();
    grid.adopt_widget(WidgetSpec::default(), "sidebar", 200, 200, 3, 3).unwrap();

    let removals = grid.clear_grid();

    assert_eq!(removals.len(), 2);
    assert!(matches!(removals[0], Removal::Deleted(_)));
    assert!(matches!(&removals[1], Removal::Returned { container, .. } if container == "sidebar"));
    assert_eq!(grid.widget_count(), 0);
    assert!(grid.occupancy().iter().flatten().all(|covered| !covered));
}
