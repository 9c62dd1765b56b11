//! Tests for pixel indexing, window algebra and data-window detection.

use ndarray::{s, Array2, Array3};
use raster_core::{
    array_bounds, get_data_window, index, window, window_bounds, window_intersection,
    window_union, windows_intersect, Affine, Bounds, MaskedArray, RasterError, Validity, Window,
};

/// Georeferencing of a 791 x 718 three-band UTM scene.
const SCENE_WIDTH: usize = 791;
const SCENE_HEIGHT: usize = 718;

fn scene_transform() -> Affine {
    Affine::new(
        300.0379266750948,
        0.0,
        101985.0,
        0.0,
        -300.041782729805,
        2826915.0,
    )
}

fn scene_bounds() -> Bounds {
    array_bounds(SCENE_HEIGHT, SCENE_WIDTH, &scene_transform())
}

fn w(rows: (i64, i64), cols: (i64, i64)) -> Window {
    Window::new(rows, cols)
}

// ============================================================================
// index tests
// ============================================================================

#[test]
fn test_index_corners() {
    let t = scene_transform();
    let b = scene_bounds();
    let (h, wd) = (SCENE_HEIGHT as i64, SCENE_WIDTH as i64);

    assert_eq!(index(b.left, b.top, &t).unwrap(), (0, 0));
    assert_eq!(index(b.right, b.top, &t).unwrap(), (0, wd));
    assert_eq!(index(b.right, b.bottom, &t).unwrap(), (h, wd));
    assert_eq!(index(b.left, b.bottom, &t).unwrap(), (h, 0));
}

#[test]
fn test_index_values() {
    let t = scene_transform();
    assert_eq!(index(101985.0, 2826915.0, &t).unwrap(), (0, 0));
    assert_eq!(index(101985.0 + 400.0, 2826915.0, &t).unwrap(), (0, 1));
    assert_eq!(index(101985.0 + 400.0, 2826915.0 - 700.0, &t).unwrap(), (2, 1));
}

#[test]
fn test_index_one_pixel_past_edge() {
    let t = scene_transform();
    let b = scene_bounds();
    let (dx, dy) = t.res();
    let eps = 1.0e-8;

    assert_eq!(index(b.left + 400.0, b.top - 400.0, &t).unwrap(), (1, 1));
    assert_eq!(index(b.left + dx + eps, b.top - dy - eps, &t).unwrap(), (1, 1));
}

#[test]
fn test_index_degenerate_transform() {
    let t = Affine::new(0.0, 0.0, 10.0, 0.0, 0.0, 10.0);
    assert!(matches!(
        index(1.0, 1.0, &t),
        Err(RasterError::DegenerateTransform(_))
    ));
}

// ============================================================================
// window tests
// ============================================================================

#[test]
fn test_full_window() {
    let window_full = window(&scene_bounds(), &scene_transform()).unwrap();
    assert_eq!(window_full, Window::full(SCENE_HEIGHT, SCENE_WIDTH));
}

#[test]
fn test_window_inset_by_epsilon() {
    let t = scene_transform();
    let b = scene_bounds();
    let eps = 1.0e-8;
    let inset = Bounds::new(b.left + eps, b.bottom + eps, b.right - eps, b.top - eps);

    assert_eq!(
        window(&inset, &t).unwrap(),
        w((0, SCENE_HEIGHT as i64), (0, SCENE_WIDTH as i64))
    );
}

#[test]
fn test_window_partial_pixels() {
    let t = scene_transform();
    let b = scene_bounds();
    let (dx, dy) = t.res();
    let eps = 1.0e-8;

    let win = window(&Bounds::new(b.left, b.top - 400.0, b.left + 400.0, b.top), &t).unwrap();
    assert_eq!(win, w((0, 2), (0, 2)));

    let snapped = Bounds::new(b.left, b.top - 2.0 * dy - eps, b.left + 2.0 * dx - eps, b.top);
    assert_eq!(window(&snapped, &t).unwrap(), w((0, 2), (0, 2)));
}

#[test]
fn test_window_outside_extent_does_not_fail() {
    let t = scene_transform();
    let mut b = scene_bounds();
    b.left -= 1000.0;

    assert_eq!(
        window(&b, &t).unwrap(),
        w((0, SCENE_HEIGHT as i64), (-4, SCENE_WIDTH as i64))
    );
}

#[test]
fn test_window_bounds_roundtrip() {
    let t = scene_transform();
    let original = w((100, 200), (100, 200));
    let bounds = window_bounds(&original, &t);
    assert_eq!(window(&bounds, &t).unwrap(), original);
}

#[test]
fn test_window_bounds_roundtrip_boundless() {
    let t = scene_transform();
    let original = w((-10, 5), (780, 800));
    assert_eq!(window(&window_bounds(&original, &t), &t).unwrap(), original);
}

#[test]
fn test_window_full_cover() {
    let t = scene_transform();
    let mut bounds = window_bounds(&w((100, 200), (100, 200)), &t);
    bounds.bottom -= 10.0; // extend south
    bounds.right += 10.0; // extend east

    let win = window(&bounds, &t).unwrap();
    let calculated = window_bounds(&win, &t);
    assert!(calculated.covers(&bounds));
    assert_eq!(win, w((100, 201), (100, 201)));
}

// ============================================================================
// union / intersection tests
// ============================================================================

#[test]
fn test_window_union() {
    let union = window_union(&[w((0, 6), (3, 6)), w((2, 4), (1, 5))]).unwrap();
    assert_eq!(union, w((0, 6), (1, 6)));
}

#[test]
fn test_window_union_disjoint() {
    let union = window_union(&[w((0, 2), (0, 2)), w((8, 10), (7, 9))]).unwrap();
    assert_eq!(union, w((0, 10), (0, 9)));
}

#[test]
fn test_window_intersection() {
    assert_eq!(
        window_intersection(&[w((0, 6), (3, 6)), w((2, 4), (1, 5))]).unwrap(),
        w((2, 4), (3, 5))
    );

    assert_eq!(
        window_intersection(&[w((0, 6), (3, 6)), w((6, 10), (1, 5))]).unwrap(),
        w((6, 6), (3, 5))
    );

    assert_eq!(
        window_intersection(&[w((0, 6), (3, 6)), w((2, 4), (1, 5)), w((3, 6), (0, 6))]).unwrap(),
        w((3, 4), (3, 5))
    );
}

#[test]
fn test_window_intersection_disjunct() {
    let result = window_intersection(&[
        w((0, 6), (3, 6)),
        w((100, 200), (0, 12)),
        w((7, 12), (7, 12)),
    ]);
    assert_eq!(result, Err(RasterError::WindowsDisjoint));

    let result = window_intersection(&[
        w((0, 6), (3, 6)),
        w((2, 4), (1, 5)),
        w((100, 200), (0, 12)),
    ]);
    assert_eq!(result, Err(RasterError::WindowsDisjoint));
}

#[test]
fn test_windows_intersect() {
    assert!(windows_intersect(&[w((0, 6), (3, 6)), w((2, 4), (1, 5))]));
    assert!(windows_intersect(&[
        w((0, 6), (3, 6)),
        w((2, 4), (1, 5)),
        w((3, 6), (0, 6)),
    ]));
}

#[test]
fn test_windows_intersect_disjunct() {
    assert!(!windows_intersect(&[w((0, 6), (3, 6)), w((10, 20), (0, 6))]));
    assert!(!windows_intersect(&[
        w((0, 6), (3, 6)),
        w((2, 4), (1, 5)),
        w((5, 6), (0, 6)),
    ]));
    assert!(!windows_intersect(&[
        w((0, 6), (3, 6)),
        w((2, 4), (1, 3)),
        w((3, 6), (4, 6)),
    ]));
}

#[test]
fn test_windows_intersect_matches_intersection() {
    let cases: Vec<Vec<Window>> = vec![
        vec![w((0, 6), (3, 6)), w((2, 4), (1, 5))],
        vec![w((0, 6), (3, 6)), w((6, 10), (1, 5))],
        vec![w((0, 6), (3, 6)), w((10, 20), (0, 6))],
        vec![w((0, 6), (3, 6)), w((2, 4), (1, 3)), w((3, 6), (4, 6))],
        vec![w((-5, 0), (-5, 0)), w((0, 5), (0, 5))],
    ];

    for windows in cases {
        assert_eq!(
            windows_intersect(&windows),
            window_intersection(&windows).is_ok(),
            "inconsistent for {:?}",
            windows
        );
    }
}

// ============================================================================
// data window tests
// ============================================================================

/// 10 x 10 array with ones at rows 3..5, cols 2..6.
fn block_data() -> Array2<u8> {
    let mut data = Array2::<u8>::zeros((10, 10));
    data.slice_mut(s![3..5, 2..6]).fill(1);
    data
}

#[test]
fn test_data_window_unmasked() {
    let data = block_data();
    let window = get_data_window(data.view(), &Validity::All).unwrap();
    assert_eq!(window, Window::full(10, 10));
}

#[test]
fn test_data_window_masked() {
    let data = block_data();
    let mask = data.mapv(|v| v == 0);
    let window = get_data_window(data.view(), &Validity::Mask(mask.view().into_dyn())).unwrap();
    assert_eq!(window, w((3, 5), (2, 6)));
}

#[test]
fn test_data_window_nodata() {
    let data = block_data();
    let window = get_data_window(data.view(), &Validity::Nodata(0)).unwrap();
    assert_eq!(window, w((3, 5), (2, 6)));

    let ones = Array2::<u8>::ones((10, 10));
    let window = get_data_window(ones.view(), &Validity::Nodata(0)).unwrap();
    assert_eq!(window, Window::full(10, 10));
}

#[test]
fn test_data_window_nodata_disjunct() {
    let mut data = Array3::<u8>::zeros((3, 10, 10));
    data.slice_mut(s![0, ..4, 1..4]).fill(1);
    data.slice_mut(s![1, 2..5, 2..8]).fill(1);
    data.slice_mut(s![2, 1..6, 1..6]).fill(1);

    let window = get_data_window(data.view(), &Validity::Nodata(0)).unwrap();
    assert_eq!(window, w((0, 6), (1, 8)));
}

#[test]
fn test_data_window_masked_bands_union() {
    let data = Array3::<u8>::zeros((2, 8, 8));
    let mut mask = Array3::from_elem((2, 8, 8), true);
    mask.slice_mut(s![0, 1..2, 6..7]).fill(false);
    mask.slice_mut(s![1, 5..7, 2..3]).fill(false);

    let masked = MaskedArray::with_mask(data, mask).unwrap();
    assert_eq!(masked.data_window(), w((1, 7), (2, 7)));
}

#[test]
fn test_data_window_empty_result() {
    let data = Array3::<u8>::zeros((3, 10, 10));
    let window = get_data_window(data.view(), &Validity::Nodata(0)).unwrap();
    assert_eq!(window, Window::empty());
}

#[test]
fn test_window_serde() {
    let win = w((0, 6), (1, 6));
    let json = serde_json::to_string(&win).unwrap();
    let parsed: Window = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, win);
}
