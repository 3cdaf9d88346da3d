//! Assertions over launcher visuals.

use snapdock_launcher::{FloatingLauncher, LauncherVisual, SnapSide};

/// Panics unless the launcher rests exactly on one of its two edges.
pub fn assert_on_edge(launcher: &FloatingLauncher) {
    let x = launcher.position().x;
    let left = launcher.bounds().edge_x(SnapSide::Left);
    let right = launcher.bounds().edge_x(SnapSide::Right);
    assert!(
        x == left || x == right,
        "launcher x {x} is between edges {left} and {right}"
    );
    assert_eq!(
        x,
        launcher.bounds().edge_x(launcher.side()),
        "launcher x does not match its snap side {:?}",
        launcher.side()
    );
}

/// Panics unless y lies within the vertical clamp range.
pub fn assert_within_vertical_bounds(launcher: &FloatingLauncher) {
    let y = launcher.position().y;
    let (min_y, max_y) = launcher.bounds().vertical_range();
    assert!(
        (min_y..=max_y).contains(&y),
        "launcher y {y} outside [{min_y}, {max_y}]"
    );
}

/// Panics unless scale and opacity are back at rest.
pub fn assert_at_rest(visual: &LauncherVisual) {
    assert_eq!(visual.scale, 1.0, "scale not at rest");
    assert_eq!(visual.opacity, 1.0, "opacity not at rest");
}

/// Panics if any recorded frame moved the launcher.
pub fn assert_never_moved(frames: &[LauncherVisual], expected: snapdock_geometry::Point) {
    for (index, frame) in frames.iter().enumerate() {
        assert_eq!(frame.position, expected, "frame {index} moved the launcher");
    }
}
