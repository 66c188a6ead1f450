use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::time::{TickId, TickScheduler, Tickable};

/// Effect driven by an `Animator`.
pub trait Animation {
    /// Called after every progress change with `progress ∈ [0, 1]`.
    fn apply(&mut self, progress: f32);
}

/// No effect; the animator only keeps time.
impl Animation for () {
    fn apply(&mut self, _progress: f32) {}
}

type FinishHandler = Box<dyn FnMut()>;

/// Time-based progress driver for a single `Animation`.
///
/// Registered with the scheduler while running. The finish handler runs once
/// per completed run, from inside `tick`; it must not borrow the animator.
pub struct Animator<A: Animation + 'static = ()> {
    this: Weak<RefCell<Animator<A>>>,
    scheduler: Rc<TickScheduler>,
    tick_id: Option<TickId>,

    length: f32,
    current_time: f32,
    progress: f32,
    running: bool,
    done: bool,

    finish_handler: Option<FinishHandler>,
    animation: A,
}

impl<A: Animation + 'static> Animator<A> {
    /// Creates a stopped animator lasting `length` seconds.
    pub fn new(length: f32, animation: A, scheduler: &Rc<TickScheduler>) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|this| {
            RefCell::new(Animator {
                this: this.clone(),
                scheduler: Rc::clone(scheduler),
                tick_id: None,
                length,
                current_time: 0.0,
                progress: 0.0,
                running: false,
                done: false,
                finish_handler: None,
                animation,
            })
        })
    }

    /// Runs from the beginning.
    pub fn start(&mut self) {
        self.reset();
        self.running = true;
        self.schedule();
    }

    /// Continues from the current time. A finished animator stays finished.
    pub fn resume(&mut self) {
        if !self.running && !self.done {
            self.running = true;
            self.schedule();
        }
    }

    pub fn stop(&mut self, reset_animation: bool) {
        if self.running {
            self.running = false;
            self.unschedule();
        }

        if reset_animation {
            self.reset();
        }
    }

    /// Rewinds to progress 0 without changing the running state.
    pub fn reset(&mut self) {
        self.done = false;
        self.current_time = 0.0;
        self.set_progress(0.0);
    }

    /// Seeks to `progress` (clamped to `[0, 1]`).
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        self.current_time = self.progress * self.length;
        self.animation.apply(self.progress);
    }

    pub fn set_finish_handler(&mut self, handler: impl FnMut() + 'static) {
        self.finish_handler = Some(Box::new(handler));
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn is_scheduled(&self) -> bool {
        self.tick_id.is_some()
    }

    pub fn animation(&self) -> &A {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut A {
        &mut self.animation
    }

    fn schedule(&mut self) {
        if self.tick_id.is_none() {
            let target: Weak<RefCell<dyn Tickable>> = self.this.clone();
            self.tick_id = Some(self.scheduler.schedule(target));
        }
    }

    fn unschedule(&mut self) {
        if let Some(id) = self.tick_id.take() {
            self.scheduler.unschedule(id);
        }
    }
}

impl<A: Animation + 'static> Tickable for Animator<A> {
    fn tick(&mut self, dt: f32) {
        if !self.running {
            return;
        }

        if self.current_time + dt >= self.length {
            self.done = true;
            self.running = false;
            self.progress = 1.0;
            self.current_time = self.length;
            self.unschedule();
            self.animation.apply(self.progress);

            if let Some(handler) = self.finish_handler.as_mut() {
                handler();
            }
        } else {
            self.current_time += dt;
            self.progress = self.current_time / self.length;
            self.animation.apply(self.progress);
        }
    }
}

impl<A: Animation + 'static> Drop for Animator<A> {
    fn drop(&mut self) {
        self.unschedule();
    }
}
