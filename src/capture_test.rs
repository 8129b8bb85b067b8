use super::*;

#[test]
fn begin_activates_capture() {
    let mut controller = CaptureController::new();
    assert!(!controller.is_active());
    let token = controller.begin().unwrap();
    assert!(controller.is_active());
    controller.end(token);
}

#[test]
fn end_releases_capture() {
    let mut controller = CaptureController::new();
    let token = controller.begin().unwrap();
    controller.end(token);
    assert!(!controller.is_active());
}

#[test]
fn captures_do_not_nest() {
    let mut controller = CaptureController::new();
    let token = controller.begin().unwrap();
    assert!(controller.begin().is_none());
    controller.end(token);
    let token = controller.begin().unwrap();
    controller.end(token);
}

#[test]
fn dropping_a_token_does_not_end_the_capture() {
    let mut controller = CaptureController::new();
    let token = controller.begin().unwrap();
    drop(token);
    // A leaked token is logged, not silently recovered; the controller
    // still reports an active capture.
    assert!(controller.is_active());
}

#[test]
fn release_then_begin_again() {
    let mut controller = CaptureController::new();
    for _ in 0..3 {
        let token = controller.begin().unwrap();
        controller.end(token);
    }
    assert!(!controller.is_active());
}
