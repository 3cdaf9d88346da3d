use super::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn frame_callbacks_run_once_with_frame_time() {
    let runtime = Runtime::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let clock = runtime.frame_clock();

    let registration = {
        let seen = Rc::clone(&seen);
        clock.with_frame_nanos(move |nanos| seen.borrow_mut().push(nanos))
    };
    assert!(registration.is_active());
    assert!(runtime.needs_frame());

    runtime.drain_frame_callbacks(16_000_000);
    runtime.drain_frame_callbacks(32_000_000);

    assert_eq!(seen.borrow().as_slice(), &[16_000_000]);
    assert!(!runtime.needs_frame());
    assert_eq!(runtime.last_frame_nanos(), Some(32_000_000));
    registration.release();
}

#[test]
fn dropping_registration_cancels_callback() {
    let runtime = Runtime::new();
    let fired = Rc::new(Cell::new(false));
    {
        let fired = Rc::clone(&fired);
        let _registration = runtime.frame_clock().with_frame_millis(move |_| fired.set(true));
    }
    assert!(!runtime.has_frame_callbacks());
    runtime.drain_frame_callbacks(1);
    assert!(!fired.get());
}

#[test]
fn callbacks_registered_during_drain_wait_for_next_frame() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let frames = Rc::new(RefCell::new(Vec::new()));

    {
        let frames = Rc::clone(&frames);
        let inner_handle = handle.clone();
        handle.register_frame_callback(move |first| {
            frames.borrow_mut().push(first);
            let frames = Rc::clone(&frames);
            inner_handle.register_frame_callback(move |second| frames.borrow_mut().push(second));
        });
    }

    runtime.drain_frame_callbacks(10);
    assert_eq!(frames.borrow().as_slice(), &[10]);
    runtime.drain_frame_callbacks(20);
    assert_eq!(frames.borrow().as_slice(), &[10, 20]);
}

#[test]
fn ui_tasks_drain_in_order_including_reposts() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let order = Rc::new(RefCell::new(Vec::new()));

    {
        let order = Rc::clone(&order);
        let repost = handle.clone();
        handle.post_ui(move || {
            order.borrow_mut().push("first");
            let order = Rc::clone(&order);
            repost.post_ui(move || order.borrow_mut().push("reposted"));
        });
    }
    {
        let order = Rc::clone(&order);
        handle.post_ui(move || order.borrow_mut().push("second"));
    }

    runtime.drain_ui();
    assert_eq!(order.borrow().as_slice(), &["first", "second", "reposted"]);
    assert!(!runtime.has_pending_ui());
}

#[test]
fn handle_outliving_runtime_is_inert() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    drop(runtime);

    assert!(!handle.is_alive());
    assert_eq!(handle.register_frame_callback(|_| {}), None);
    assert!(!handle.frame_clock().with_frame_nanos(|_| {}).is_active());
    handle.post_ui(|| panic!("must not run"));
}
