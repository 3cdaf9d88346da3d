use std::cell::RefCell;
use std::rc::{Rc, Weak};

use snapdock_core::{FrameCallbackRegistration, RuntimeHandle, NANOS_PER_MILLI};

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

impl Lerp for f64 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction as f64
    }
}

/// Trait for values that can participate in spring animations.
pub trait SpringScalar: Lerp + Clone {
    /// Convert the value to `f32` for physics calculations.
    fn to_f32(&self) -> f32;

    /// Compute the current progress between the start and target values.
    fn spring_progress(start: &Self, target: &Self, current: &Self) -> f32 {
        let start_val = start.to_f32();
        let target_val = target.to_f32();
        let current_val = current.to_f32();

        if (target_val - start_val).abs() < f32::EPSILON {
            1.0
        } else {
            (current_val - start_val) / (target_val - start_val)
        }
    }

    /// Determine whether the current value is close enough to the target to
    /// consider the spring finished.
    fn is_near_target(current: &Self, target: &Self, threshold: f32) -> bool {
        (current.to_f32() - target.to_f32()).abs() < threshold
    }
}

impl SpringScalar for f32 {
    fn to_f32(&self) -> f32 {
        *self
    }
}

impl SpringScalar for f64 {
    fn to_f32(&self) -> f32 {
        *self as f32
    }
}

/// Easing curves for tween animations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Material standard curve.
    FastOutSlowIn,
}

impl Easing {
    /// Apply the easing function to a linear fraction [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::Linear => fraction.clamp(0.0, 1.0),
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
        }
    }
}

/// Cubic bezier curve approximation for easing.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    fn sample_curve(a: f32, b: f32, c: f32, t: f32) -> f32 {
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(a: f32, b: f32, c: f32, t: f32) -> f32 {
        (3.0 * a * t + 2.0 * b) * t + c
    }

    // Newton-Raphson for the parametric t matching the x fraction.
    let mut t = fraction;
    let mut newton_success = false;
    for _ in 0..8 {
        let x = sample_curve(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            newton_success = true;
            break;
        }
        let dx = sample_derivative(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !newton_success {
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t = fraction;
        for _ in 0..16 {
            let delta = sample_curve(ax, bx, cx, t) - fraction;
            if delta.abs() < 1e-6 {
                break;
            }
            if delta > 0.0 {
                t1 = t;
            } else {
                t0 = t;
            }
            t = 0.5 * (t0 + t1);
        }
    }

    sample_curve(ay, by, cy, t)
}

/// Tween configuration: duration, easing and optional start delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub duration_millis: u64,
    pub easing: Easing,
    pub delay_millis: u64,
}

impl AnimationSpec {
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
            delay_millis: 0,
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::Linear)
    }

    pub fn with_delay(mut self, delay_millis: u64) -> Self {
        self.delay_millis = delay_millis;
        self
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::FastOutSlowIn)
    }
}

/// Spring animation configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// 1.0 = critically damped, < 1.0 = bouncy, > 1.0 = over-damped.
    pub damping_ratio: f32,
    /// Higher values settle faster.
    pub stiffness: f32,
    /// Velocity threshold to stop animation.
    pub velocity_threshold: f32,
    /// Position threshold to stop animation.
    pub position_threshold: f32,
}

impl SpringSpec {
    pub fn default_spring() -> Self {
        Self {
            damping_ratio: 1.0,
            stiffness: 1500.0,
            velocity_threshold: 0.01,
            position_threshold: 0.001,
        }
    }

    pub fn bouncy() -> Self {
        Self {
            damping_ratio: 0.5,
            ..Self::default_spring()
        }
    }

    /// Build a spring from Origami-style tension and friction values.
    ///
    /// Tension 40 / friction 7 is the classic default; the launcher settles
    /// with tension 300 / friction 20.
    pub fn from_tension_friction(tension: f32, friction: f32) -> Self {
        let stiffness = (tension - 30.0) * 3.62 + 194.0;
        let damping = (friction - 8.0) * 3.0 + 25.0;
        Self {
            damping_ratio: damping / (2.0 * stiffness.sqrt()),
            stiffness,
            ..Self::default_spring()
        }
    }

    /// Viscous damping coefficient for a unit mass.
    pub fn damping(&self) -> f32 {
        2.0 * self.damping_ratio * self.stiffness.sqrt()
    }
}

/// Longest sub-step, in seconds.
pub(crate) const MAX_SPRING_TIMESTEP: f32 = 0.016;

pub(crate) fn spring_timestep(stiffness: f32, damping: f32) -> f32 {
    let mut timestep = MAX_SPRING_TIMESTEP;
    if stiffness > 0.0 {
        timestep = timestep.min(1.0 / stiffness.sqrt());
    }
    if damping > 0.0 {
        timestep = timestep.min(1.0 / damping);
    }
    timestep
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::default_spring()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationType {
    Tween(AnimationSpec),
    Spring(SpringSpec),
}

impl Default for AnimationType {
    fn default() -> Self {
        AnimationType::Tween(AnimationSpec::default())
    }
}

/// Why an animation stopped driving its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEndReason {
    /// Reached the target; the value equals the target exactly.
    Finished,
    /// Superseded by another `animate_to`, `snap_to` or `stop`.
    Interrupted,
}

type EndListener<T> = Box<dyn FnOnce(AnimationEndReason, T) + 'static>;

/// Frame-driven animated value.
///
/// Clones share the same underlying value.
pub struct Animatable<T: SpringScalar + 'static> {
    inner: Rc<RefCell<AnimatableInner<T>>>,
}

struct AnimatableInner<T: SpringScalar + 'static> {
    runtime: RuntimeHandle,
    current: T,
    velocity: f32,
    start: T,
    target: T,
    animation_type: AnimationType,
    start_time_nanos: Option<u64>,
    last_frame_nanos: Option<u64>,
    running: bool,
    registration: Option<FrameCallbackRegistration>,
    listener: Option<EndListener<T>>,
}

impl<T: SpringScalar + 'static> AnimatableInner<T> {
    /// Stops the running animation, returning its listener if any.
    fn halt(&mut self) -> Option<EndListener<T>> {
        if let Some(registration) = self.registration.take() {
            registration.cancel();
        }
        let was_running = std::mem::replace(&mut self.running, false);
        self.start = self.current.clone();
        self.start_time_nanos = None;
        self.last_frame_nanos = None;
        self.velocity = 0.0;
        let listener = self.listener.take();
        if was_running {
            listener
        } else {
            None
        }
    }

    fn finish(&mut self) -> Option<EndListener<T>> {
        self.current = self.target.clone();
        self.start = self.target.clone();
        self.start_time_nanos = None;
        self.last_frame_nanos = None;
        self.velocity = 0.0;
        self.running = false;
        self.listener.take()
    }
}

impl<T: SpringScalar + 'static> Animatable<T> {
    pub fn new(initial: T, runtime: RuntimeHandle) -> Self {
        let inner = AnimatableInner {
            runtime,
            current: initial.clone(),
            velocity: 0.0,
            start: initial.clone(),
            target: initial,
            animation_type: AnimationType::default(),
            start_time_nanos: None,
            last_frame_nanos: None,
            running: false,
            registration: None,
            listener: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Animate from the current value to `target`.
    pub fn animate_to(&self, target: T, animation: AnimationType) {
        self.start_animation(target, animation, None);
    }

    /// Animate to `target`, calling `on_end` once the animation finishes or is interrupted.
    pub fn animate_to_with_listener(
        &self,
        target: T,
        animation: AnimationType,
        on_end: impl FnOnce(AnimationEndReason, T) + 'static,
    ) {
        self.start_animation(target, animation, Some(Box::new(on_end)));
    }

    fn start_animation(&self, target: T, animation: AnimationType, listener: Option<EndListener<T>>) {
        self.interrupt();
        {
            let mut inner = self.inner.borrow_mut();
            inner.start = inner.current.clone();
            inner.target = target;
            inner.animation_type = animation;
            inner.running = true;
            inner.listener = listener;
        }
        Self::schedule_frame(&self.inner);
    }

    /// Jump to `value` without animating.
    pub fn snap_to(&self, value: T) {
        self.interrupt();
        let mut inner = self.inner.borrow_mut();
        inner.current = value.clone();
        inner.start = value.clone();
        inner.target = value;
    }

    /// Stop at the current value. The target becomes the current value.
    pub fn stop(&self) {
        self.interrupt();
        let mut inner = self.inner.borrow_mut();
        inner.target = inner.current.clone();
    }

    fn interrupt(&self) {
        let (listener, value) = {
            let mut inner = self.inner.borrow_mut();
            (inner.halt(), inner.current.clone())
        };
        if let Some(listener) = listener {
            listener(AnimationEndReason::Interrupted, value);
        }
    }

    pub fn value(&self) -> T {
        self.inner.borrow().current.clone()
    }

    pub fn target(&self) -> T {
        self.inner.borrow().target.clone()
    }

    pub fn downgrade(&self) -> WeakAnimatable<T> {
        WeakAnimatable {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn velocity(&self) -> f32 {
        self.inner.borrow().velocity
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    pub fn animation_type(&self) -> AnimationType {
        self.inner.borrow().animation_type
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner<T>>>) {
        let clock = {
            let inner = this.borrow();
            if inner.registration.is_some() || !inner.running {
                return;
            }
            inner.runtime.frame_clock()
        };
        let weak = Rc::downgrade(this);
        let registration = clock.with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, time);
            }
        });
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner<T>>>, frame_time_nanos: u64) {
        let mut schedule_next = false;
        let mut finished = None;
        {
            let mut inner = this.borrow_mut();
            // The callback has already been drained from the runtime.
            if let Some(registration) = inner.registration.take() {
                registration.release();
            }
            if !inner.running {
                return;
            }

            match inner.animation_type {
                AnimationType::Tween(spec) => {
                    let start_time = *inner.start_time_nanos.get_or_insert(frame_time_nanos);
                    let elapsed_nanos = frame_time_nanos.saturating_sub(start_time);
                    let delay_nanos = spec.delay_millis * NANOS_PER_MILLI;

                    if elapsed_nanos < delay_nanos {
                        schedule_next = true;
                    } else {
                        let duration_nanos = (spec.duration_millis * NANOS_PER_MILLI).max(1);
                        let linear_progress = ((elapsed_nanos - delay_nanos) as f32
                            / duration_nanos as f32)
                            .clamp(0.0, 1.0);
                        let progress = spec.easing.transform(linear_progress);
                        inner.current = inner.start.lerp(&inner.target, progress);

                        if linear_progress >= 1.0 {
                            finished = Some(inner.finish());
                        } else {
                            schedule_next = true;
                        }
                    }
                }
                AnimationType::Spring(spec) => {
                    inner.start_time_nanos.get_or_insert(frame_time_nanos);
                    let last = *inner.last_frame_nanos.get_or_insert(frame_time_nanos);
                    inner.last_frame_nanos = Some(frame_time_nanos);
                    let dt = frame_time_nanos.saturating_sub(last) as f32 / 1_000_000_000.0;

                    if dt > 0.0 {
                        let stiffness = spec.stiffness;
                        let damping = spec.damping();

                        // Semi-implicit Euler in progress units where the target sits
                        // at 1.0. The sub-step must stay under 1/omega and 1/damping.
                        let timestep = spring_timestep(stiffness, damping);
                        let mut simulated = 0.0f32;
                        while simulated < dt {
                            let step = timestep.min(dt - simulated);
                            let current_progress = <T as SpringScalar>::spring_progress(
                                &inner.start,
                                &inner.target,
                                &inner.current,
                            );
                            let displacement = current_progress - 1.0;
                            let spring_force = -stiffness * displacement - damping * inner.velocity;
                            inner.velocity += spring_force * step;
                            let new_progress = current_progress + inner.velocity * step;
                            inner.current = inner
                                .start
                                .lerp(&inner.target, new_progress.clamp(-1.0, 2.0));
                            simulated += step;
                        }
                        log::trace!(
                            "spring progress velocity={:.4} value={:.3}",
                            inner.velocity,
                            inner.current.to_f32()
                        );
                    }

                    let at_rest = inner.velocity.abs() < spec.velocity_threshold;
                    let near_target = <T as SpringScalar>::is_near_target(
                        &inner.current,
                        &inner.target,
                        spec.position_threshold,
                    );
                    if dt > 0.0 && at_rest && near_target {
                        finished = Some(inner.finish());
                    } else {
                        schedule_next = true;
                    }
                }
            }
        }

        if let Some(listener) = finished {
            let value = this.borrow().current.clone();
            if let Some(listener) = listener {
                listener(AnimationEndReason::Finished, value);
            }
        }

        if schedule_next {
            Self::schedule_frame(this);
        }
    }
}

impl<T: SpringScalar + 'static> Clone for Animatable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Non-owning handle to an [`Animatable`].
///
/// End listeners that restart their own animation hold one of these; a
/// strong clone stored in the listener would keep the value alive forever.
pub struct WeakAnimatable<T: SpringScalar + 'static> {
    inner: Weak<RefCell<AnimatableInner<T>>>,
}

impl<T: SpringScalar + 'static> WeakAnimatable<T> {
    pub fn upgrade(&self) -> Option<Animatable<T>> {
        self.inner.upgrade().map(|inner| Animatable { inner })
    }
}

impl<T: SpringScalar + 'static> Clone for WeakAnimatable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
