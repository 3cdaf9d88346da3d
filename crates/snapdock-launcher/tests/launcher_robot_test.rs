//! End-to-end gesture scenarios driven through the robot harness.

use snapdock_foundation::HapticKind;
use snapdock_geometry::{EdgeInsets, Point};
use snapdock_launcher::{
    CollapseReason, GesturePhase, HostedSurface, LauncherSettings, PresentationState, SnapSide,
    SurfaceCallbacks, SurfaceSignal, Viewport,
};
use snapdock_testing::robot_assertions::{
    assert_at_rest, assert_never_moved, assert_on_edge, assert_within_vertical_bounds,
};
use snapdock_testing::LauncherRobot;
use std::cell::RefCell;
use std::rc::Rc;

fn phone() -> LauncherRobot {
    LauncherRobot::new(400.0, 800.0)
}

#[test]
fn launcher_starts_on_right_edge() {
    let robot = phone();
    let launcher = robot.launcher();
    assert_eq!(launcher.side(), SnapSide::Right);
    assert_eq!(launcher.position(), Point::new(320.0, 360.0));
    assert_eq!(launcher.phase(), GesturePhase::Idle);
    assert_on_edge(launcher);
}

#[test]
fn drag_left_of_midline_snaps_to_left_margin() {
    let mut robot = phone();
    let start = robot.button_center();
    // Launcher ends the drag at raw x = 150.
    robot.drag(start, start.offset(-170.0, 40.0), 12);
    assert_eq!(robot.launcher().phase(), GesturePhase::Settling);
    assert_eq!(robot.launcher().side(), SnapSide::Left);

    robot.wait_for_idle();
    let launcher = robot.launcher();
    assert_eq!(launcher.phase(), GesturePhase::Idle);
    assert_eq!(launcher.position(), Point::new(20.0, 400.0));
    assert_on_edge(launcher);
    assert_at_rest(&robot.visual());
    assert_eq!(launcher.presentation_state(), PresentationState::Collapsed);
}

#[test]
fn drag_right_of_midline_snaps_to_right_edge() {
    let mut robot = phone();
    let start = robot.button_center();
    // Raw x = 250.
    robot.drag(start, start.offset(-70.0, 0.0), 6);
    robot.wait_for_idle();

    assert_eq!(robot.launcher().side(), SnapSide::Right);
    assert_eq!(robot.launcher().position().x, 320.0);
}

#[test]
fn stiff_settle_spring_still_lands_on_edge() {
    let settings = LauncherSettings::default().with_settle_spring(5000.0, 20.0);
    assert_eq!(settings.validate(), Ok(()));
    let mut robot = LauncherRobot::with_viewport(Viewport::new(400.0, 800.0), settings);
    let start = robot.button_center();
    robot.drag(start, start.offset(-200.0, 0.0), 8);

    let frames = robot.wait_for_idle();
    assert!(frames < 120, "settle took {frames} frames");
    let launcher = robot.launcher();
    assert_eq!(launcher.phase(), GesturePhase::Idle);
    assert_eq!(launcher.side(), SnapSide::Left);
    assert_eq!(launcher.position(), Point::new(20.0, 360.0));
    assert_on_edge(launcher);
}

#[test]
fn settle_animates_instead_of_jumping() {
    let mut robot = phone();
    let start = robot.button_center();
    robot.drag(start, start.offset(-170.0, 0.0), 4);
    robot.clear_recorded_frames();
    robot.wait_for_idle();

    let xs: Vec<f32> = robot.recorded_frames().iter().map(|f| f.position.x).collect();
    assert!(xs.len() > 3);
    assert!(xs.iter().any(|x| *x > 20.0 && *x < 150.0), "no intermediate frame: {xs:?}");
    assert_eq!(*xs.last().unwrap(), 20.0);
}

#[test]
fn release_outside_vertical_range_is_clamped() {
    let viewport =
        Viewport::new(400.0, 800.0).with_insets(EdgeInsets::from_components(0.0, 44.0, 0.0, 34.0));
    let mut robot = LauncherRobot::with_viewport(viewport, LauncherSettings::default());

    let start = robot.button_center();
    robot.drag(start, start.offset(0.0, -2000.0), 8);
    robot.wait_for_idle();
    assert_eq!(robot.launcher().position().y, 104.0);
    assert_within_vertical_bounds(robot.launcher());

    let start = robot.button_center();
    robot.drag(start, start.offset(-10.0, 3000.0), 8);
    robot.wait_for_idle();
    assert_eq!(robot.launcher().position().y, 646.0);
    assert_on_edge(robot.launcher());
}

#[test]
fn tap_expands_without_moving() {
    let mut robot = phone();
    let rest = robot.launcher().position();

    assert!(robot.tap(robot.button_center()));
    assert_eq!(robot.launcher().presentation_state(), PresentationState::Expanded);
    assert_eq!(robot.launcher().phase(), GesturePhase::Idle);

    robot.clear_recorded_frames();
    robot.wait_for_idle();
    assert_never_moved(robot.recorded_frames(), rest);
    assert_eq!(robot.launcher().side(), SnapSide::Right);

    let lowest = robot
        .recorded_frames()
        .iter()
        .map(|frame| frame.scale)
        .fold(f32::MAX, f32::min);
    assert_eq!(lowest, 0.95);
    assert_at_rest(&robot.visual());

    assert_eq!(robot.haptics().count(HapticKind::DragStart), 1);
    assert_eq!(robot.haptics().count(HapticKind::Tap), 1);
}

#[test]
fn jitter_within_three_pixels_is_still_a_tap() {
    let mut robot = phone();
    let center = robot.button_center();
    robot.press(center);
    robot.move_to(center.offset(3.0, -3.0));
    robot.move_to(center.offset(-2.0, 1.0));
    assert_eq!(robot.launcher().phase(), GesturePhase::Pressed);
    robot.release(center.offset(3.0, 3.0));

    assert_eq!(robot.launcher().presentation_state(), PresentationState::Expanded);
    assert_eq!(robot.launcher().position(), Point::new(320.0, 360.0));
}

#[test]
fn four_pixel_drag_does_not_expand() {
    let mut robot = phone();
    let center = robot.button_center();
    robot.press(center);
    robot.move_to(center.offset(0.0, 4.0));
    assert_eq!(robot.launcher().phase(), GesturePhase::Dragging);
    robot.release(center.offset(0.0, 4.0));

    assert_eq!(robot.launcher().presentation_state(), PresentationState::Collapsed);
    assert_eq!(robot.launcher().phase(), GesturePhase::Settling);
    assert_eq!(robot.haptics().count(HapticKind::Tap), 0);
    robot.wait_for_idle();
    assert_eq!(robot.launcher().position(), Point::new(320.0, 364.0));
}

#[test]
fn press_emphasis_applies_while_held() {
    let mut robot = phone();
    robot.press(robot.button_center());
    assert_eq!(robot.haptics().count(HapticKind::DragStart), 1);
    robot.advance_millis(300);
    let visual = robot.visual();
    assert_eq!(visual.scale, 1.05);
    assert_eq!(visual.opacity, 0.9);
    assert_eq!(visual.phase, GesturePhase::Pressed);
}

#[test]
fn expand_while_expanded_is_a_no_op() {
    let mut robot = phone();
    robot.tap(robot.button_center());
    assert!(!robot.launcher().expand());
    assert_eq!(robot.launcher().presentation().presentations(), 1);

    // The overlay covers the button; presses do not reach it.
    assert!(!robot.press(robot.button_center()));
    assert_eq!(robot.launcher().phase(), GesturePhase::Idle);
}

#[derive(Default)]
struct OverlaySpy {
    callbacks: Option<SurfaceCallbacks>,
    dismissals: Vec<CollapseReason>,
}

impl HostedSurface for OverlaySpy {
    fn on_presented(&mut self, callbacks: SurfaceCallbacks) {
        self.callbacks = Some(callbacks);
    }

    fn on_dismissed(&mut self, reason: CollapseReason) {
        self.callbacks = None;
        self.dismissals.push(reason);
    }
}

#[test]
fn close_and_minimize_from_surface_collapse() {
    let spy = Rc::new(RefCell::new(OverlaySpy::default()));
    let mut robot = phone().with_surface(Rc::clone(&spy));

    robot.tap(robot.button_center());
    let callbacks = spy.borrow().callbacks.clone().expect("presented");
    callbacks.on_close();
    robot.advance_frame();
    assert_eq!(robot.launcher().presentation_state(), PresentationState::Collapsed);

    robot.wait_for_idle();
    robot.tap(robot.button_center());
    let callbacks = spy.borrow().callbacks.clone().expect("presented again");
    callbacks.on_minimize();
    robot.advance_frame();
    assert_eq!(robot.launcher().presentation_state(), PresentationState::Collapsed);

    robot.wait_for_idle();
    robot.tap(robot.button_center());
    assert!(robot.launcher().handle_surface_signal(SurfaceSignal::Close));
    assert!(!robot.launcher().handle_surface_signal(SurfaceSignal::Minimize));

    assert_eq!(
        spy.borrow().dismissals,
        vec![CollapseReason::Closed, CollapseReason::Minimized, CollapseReason::Closed]
    );
}

#[test]
fn grant_during_settle_starts_from_displayed_position() {
    let mut robot = phone();
    let start = robot.button_center();
    robot.drag(start, start.offset(-170.0, 0.0), 4);
    robot.advance_frames(3);
    assert_eq!(robot.launcher().phase(), GesturePhase::Settling);

    let displayed = robot.launcher().position();
    assert!(displayed.x > 20.0, "settle should still be in flight");
    robot.press(robot.button_center());
    assert_eq!(robot.launcher().position(), displayed);

    // The interrupted settle must not finish underneath the new gesture.
    robot.advance_frames(60);
    assert_eq!(robot.launcher().phase(), GesturePhase::Pressed);
    assert_eq!(robot.launcher().position(), displayed);

    let grab = robot.button_center();
    robot.move_to(grab.offset(200.0, 0.0));
    let dragged = robot.launcher().position();
    assert!((dragged.x - (displayed.x + 200.0)).abs() < 1e-3);
    assert_eq!(dragged.y, displayed.y);
    robot.release(grab.offset(200.0, 0.0));
    robot.wait_for_idle();

    assert_eq!(robot.launcher().side(), SnapSide::Right);
    assert_eq!(robot.launcher().position(), Point::new(320.0, 360.0));
    assert_eq!(robot.launcher().phase(), GesturePhase::Idle);
    assert_at_rest(&robot.visual());
}

#[test]
fn tap_during_settle_finishes_on_committed_edge() {
    let mut robot = phone();
    let start = robot.button_center();
    robot.drag(start, start.offset(-170.0, 0.0), 4);
    robot.advance_frames(2);

    robot.tap(robot.button_center());
    assert_eq!(robot.launcher().presentation_state(), PresentationState::Expanded);
    assert_eq!(robot.launcher().phase(), GesturePhase::Settling);

    robot.wait_for_idle();
    assert_eq!(robot.launcher().side(), SnapSide::Left);
    assert_eq!(robot.launcher().position(), Point::new(20.0, 360.0));
    assert_eq!(robot.launcher().phase(), GesturePhase::Idle);
}

#[test]
fn cancelled_drag_snaps_without_expanding() {
    let mut robot = phone();
    let start = robot.button_center();
    robot.press(start);
    robot.move_to(start.offset(-250.0, 0.0));
    assert!(robot.cancel());
    robot.wait_for_idle();

    assert_eq!(robot.launcher().side(), SnapSide::Left);
    assert_eq!(robot.launcher().presentation_state(), PresentationState::Collapsed);
    assert_on_edge(robot.launcher());
}

#[test]
fn cancelled_press_returns_to_rest() {
    let mut robot = phone();
    robot.press(robot.button_center());
    robot.advance_frames(4);
    robot.cancel();
    robot.wait_for_idle();

    assert_eq!(robot.launcher().presentation_state(), PresentationState::Collapsed);
    assert_eq!(robot.launcher().position(), Point::new(320.0, 360.0));
    assert_at_rest(&robot.visual());
}

#[test]
fn press_outside_button_is_not_handled() {
    let mut robot = phone();
    assert!(!robot.press(Point::new(10.0, 10.0)));
    assert!(!robot.move_to(Point::new(200.0, 200.0)));
    assert!(!robot.release(Point::new(200.0, 200.0)));
    assert_eq!(robot.launcher().phase(), GesturePhase::Idle);
    assert!(robot.haptics().pulses().is_empty());
}

#[test]
fn viewport_change_keeps_side_and_reclamps() {
    let mut robot = phone();
    let start = robot.button_center();
    robot.drag(start, start.offset(0.0, 300.0), 5);
    robot.wait_for_idle();
    assert_eq!(robot.launcher().position(), Point::new(320.0, 660.0));

    // Rotate to landscape.
    robot.launcher_mut().set_viewport(Viewport::new(800.0, 400.0));
    assert_eq!(robot.launcher().side(), SnapSide::Right);
    assert_eq!(robot.launcher().position(), Point::new(720.0, 280.0));
    assert_on_edge(robot.launcher());
    assert_within_vertical_bounds(robot.launcher());
}

#[test]
fn viewport_change_while_settling_retargets() {
    let mut robot = phone();
    let start = robot.button_center();
    robot.drag(start, start.offset(-20.0, 0.0), 4);
    robot.advance_frame();
    robot.launcher_mut().set_viewport(Viewport::new(600.0, 800.0));
    robot.wait_for_idle();

    assert_eq!(robot.launcher().position().x, 520.0);
    assert_eq!(robot.launcher().phase(), GesturePhase::Idle);
}
