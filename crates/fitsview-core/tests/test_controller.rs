mod common;

use approx::assert_relative_eq;
use common::*;

use fitsview_core::config::{ViewConfig, ZoomLimits};
use fitsview_core::controller::{InputEvent, InteractionController, Response, ScrollDirection};
use fitsview_core::stretch::Stretch;
use fitsview_core::view::{Origin, ScreenSize, ViewState};

fn setup(config: &ViewConfig, width: usize, height: usize) -> (ViewState, InteractionController) {
    let state = make_state_with(make_ramp_image(100, 120), config);
    let controller = InteractionController::new(config, ScreenSize::new(width, height));
    (state, controller)
}

fn image_point(state: &ViewState, controller: &InteractionController, x: f64, y: f64) -> (f64, f64) {
    state.transform(controller.screen()).screen_to_image(x, y)
}

fn scroll(x: f64, y: f64, direction: ScrollDirection) -> InputEvent {
    InputEvent::Scroll { x, y, direction }
}

#[test]
fn test_scroll_keeps_point_under_cursor() {
    for origin in [Origin::Lower, Origin::Upper] {
        let config = ViewConfig {
            origin,
            ..ViewConfig::default()
        };
        let (mut state, mut controller) = setup(&config, 300, 200);

        let cursors = [(37.0, 140.0), (299.0, 1.0), (150.0, 100.0), (5.5, 190.25)];
        for (i, &(x, y)) in cursors.iter().enumerate() {
            let direction = if i % 2 == 0 {
                ScrollDirection::Up
            } else {
                ScrollDirection::Down
            };
            let before = image_point(&state, &controller, x, y);
            let response = controller.handle(&scroll(x, y, direction), &mut state);
            assert_eq!(response, Response::Render);
            let after = image_point(&state, &controller, x, y);

            let scale = state.transform(controller.screen()).scale;
            assert!(
                (before.0 - after.0).abs() * scale < 1.0 && (before.1 - after.1).abs() * scale < 1.0,
                "{origin:?}: point drifted from {before:?} to {after:?}"
            );
        }
    }
}

#[test]
fn test_scroll_direction_sets_zoom() {
    let (mut state, mut controller) = setup(&ViewConfig::default(), 100, 100);
    controller.handle(&scroll(10.0, 10.0, ScrollDirection::Up), &mut state);
    assert_relative_eq!(state.zoom(), 1.1);
    controller.handle(&scroll(10.0, 10.0, ScrollDirection::Down), &mut state);
    controller.handle(&scroll(10.0, 10.0, ScrollDirection::Down), &mut state);
    assert_relative_eq!(state.zoom(), 1.0 / 1.1, epsilon = 1e-12);
}

#[test]
fn test_scroll_at_zoom_limit_does_not_pan() {
    let config = ViewConfig {
        zoom_limits: ZoomLimits { min: 1.0, max: 2.0 },
        ..ViewConfig::default()
    };
    let (mut state, mut controller) = setup(&config, 100, 100);

    for _ in 0..50 {
        controller.handle(&scroll(3.0, 97.0, ScrollDirection::Up), &mut state);
    }
    assert_eq!(state.zoom(), 2.0);
    let center = state.pan_center();
    controller.handle(&scroll(3.0, 97.0, ScrollDirection::Up), &mut state);
    assert_eq!(state.pan_center(), center);
}

#[test]
fn test_drag_moves_image_with_pointer() {
    for origin in [Origin::Lower, Origin::Upper] {
        let config = ViewConfig {
            origin,
            ..ViewConfig::default()
        };
        let (mut state, mut controller) = setup(&config, 240, 200);
        controller.handle(&scroll(80.0, 60.0, ScrollDirection::Up), &mut state);

        let grabbed = image_point(&state, &controller, 50.0, 70.0);
        controller.handle(&InputEvent::Drag { dx: 12.0, dy: -7.5 }, &mut state);
        let now = image_point(&state, &controller, 62.0, 62.5);

        assert_relative_eq!(now.0, grabbed.0, epsilon = 1e-9);
        assert_relative_eq!(now.1, grabbed.1, epsilon = 1e-9);
    }
}

#[test]
fn test_drag_direction_per_origin() {
    // 120x100 image on a 120x100 screen: scale 1.
    let upper = ViewConfig {
        origin: Origin::Upper,
        ..ViewConfig::default()
    };
    let (mut state, mut controller) = setup(&upper, 120, 100);
    controller.handle(&InputEvent::Drag { dx: 10.0, dy: 10.0 }, &mut state);
    assert_eq!(state.pan_center(), (50.0, 40.0));

    let (mut state, mut controller) = setup(&ViewConfig::default(), 120, 100);
    controller.handle(&InputEvent::Drag { dx: 10.0, dy: 10.0 }, &mut state);
    assert_eq!(state.pan_center(), (50.0, 60.0));
}

#[test]
fn test_key_bindings() {
    let (mut state, mut controller) = setup(&ViewConfig::default(), 100, 100);

    controller.handle(&InputEvent::Key('i'), &mut state);
    assert!(state.invert());

    controller.handle(&InputEvent::Key('s'), &mut state);
    assert_eq!(state.stretch(), Stretch::Log);
    for _ in 0..3 {
        controller.handle(&InputEvent::Key('S'), &mut state);
    }
    assert_eq!(state.stretch(), Stretch::Linear);

    controller.handle(&InputEvent::Key(']'), &mut state);
    assert_relative_eq!(state.contrast(), 1.1);
    controller.handle(&InputEvent::Key('['), &mut state);
    controller.handle(&InputEvent::Key('['), &mut state);
    assert_relative_eq!(state.contrast(), 1.0 / 1.1, epsilon = 1e-12);

    state.set_limits(1.0, 2.0);
    controller.handle(&InputEvent::Key('a'), &mut state);
    assert_eq!(state.limits(), (None, None));
}

#[test]
fn test_keyboard_zoom_about_center() {
    let (mut state, mut controller) = setup(&ViewConfig::default(), 100, 100);
    let center = state.pan_center();

    controller.handle(&InputEvent::Key('+'), &mut state);
    assert_relative_eq!(state.zoom(), 1.1);
    controller.handle(&InputEvent::Key('='), &mut state);
    assert_relative_eq!(state.zoom(), 1.21, epsilon = 1e-12);
    controller.handle(&InputEvent::Key('-'), &mut state);
    assert_relative_eq!(state.zoom(), 1.1, epsilon = 1e-12);

    let now = state.pan_center();
    assert_relative_eq!(now.0, center.0, epsilon = 1e-9);
    assert_relative_eq!(now.1, center.1, epsilon = 1e-9);
}

#[test]
fn test_quit_key() {
    let (mut state, mut controller) = setup(&ViewConfig::default(), 100, 100);
    let before = state.params().clone();
    assert_eq!(controller.handle(&InputEvent::Key('q'), &mut state), Response::Quit);
    assert_eq!(controller.handle(&InputEvent::Key('Q'), &mut state), Response::Quit);
    assert_eq!(state.params(), &before);
}

#[test]
fn test_unknown_key_leaves_state() {
    let (mut state, mut controller) = setup(&ViewConfig::default(), 100, 100);
    let before = state.params().clone();
    for key in ['x', '7', ' ', 'é'] {
        assert_eq!(controller.handle(&InputEvent::Key(key), &mut state), Response::Render);
    }
    assert_eq!(state.params(), &before);
}

#[test]
fn test_reset_event_and_key() {
    let (mut state, mut controller) = setup(&ViewConfig::default(), 100, 100);
    let initial = state.params().clone();

    controller.handle(&scroll(20.0, 30.0, ScrollDirection::Up), &mut state);
    controller.handle(&InputEvent::Drag { dx: 5.0, dy: 3.0 }, &mut state);
    controller.handle(&InputEvent::Key('i'), &mut state);
    controller.handle(&InputEvent::Reset, &mut state);
    assert_eq!(state.params(), &initial);

    controller.handle(&InputEvent::Key('s'), &mut state);
    controller.handle(&InputEvent::Key('r'), &mut state);
    assert_eq!(state.params(), &initial);
}

#[test]
fn test_resize_updates_screen() {
    let (mut state, mut controller) = setup(&ViewConfig::default(), 100, 100);
    let response = controller.handle(
        &InputEvent::Resize {
            width: 640,
            height: 0,
        },
        &mut state,
    );
    assert_eq!(response, Response::Render);
    let screen = controller.screen();
    assert_eq!((screen.width, screen.height), (640, 1));
}
