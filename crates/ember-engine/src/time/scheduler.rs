use std::cell::{Cell, RefCell};
use std::rc::Weak;

/// Something advanced once per frame by a `TickScheduler`.
pub trait Tickable {
    /// `dt` is the elapsed time since the previous tick, in seconds.
    fn tick(&mut self, dt: f32);
}

/// Registration handle returned by `TickScheduler::schedule`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TickId(u64);

#[derive(Clone)]
struct Entry {
    id: TickId,
    target: Weak<RefCell<dyn Tickable>>,
}

/// Per-frame update fan-out for the logic thread.
///
/// Targets are held weakly: a dropped owner is skipped and pruned, but owners
/// are still expected to `unschedule` in their teardown path. Targets may
/// schedule or unschedule (themselves or others) from inside `tick`; changes
/// made during an update apply to the rest of that update.
#[derive(Default)]
pub struct TickScheduler {
    entries: RefCell<Vec<Entry>>,
    next_id: Cell<u64>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `target`. Registering the same target twice returns the
    /// existing id.
    pub fn schedule(&self, target: Weak<RefCell<dyn Tickable>>) -> TickId {
        let mut entries = self.entries.borrow_mut();

        if let Some(existing) = entries.iter().find(|e| Weak::ptr_eq(&e.target, &target)) {
            return existing.id;
        }

        let id = TickId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        entries.push(Entry { id, target });
        id
    }

    /// Removes a registration. Returns `false` if `id` was not registered.
    pub fn unschedule(&self, id: TickId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    pub fn is_scheduled(&self, id: TickId) -> bool {
        self.entries.borrow().iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ticks every registered target in registration order.
    pub fn update(&self, dt: f32) {
        let snapshot: Vec<Entry> = self.entries.borrow().clone();
        let mut pruned = false;

        for entry in snapshot {
            if !self.is_scheduled(entry.id) {
                continue;
            }

            let Some(rc) = entry.target.upgrade() else {
                pruned = true;
                continue;
            };

            let Ok(mut target) = rc.try_borrow_mut() else {
                log::warn!("tick target {:?} already borrowed; skipped this frame", entry.id);
                continue;
            };

            target.tick(dt);
        }

        if pruned {
            self.entries.borrow_mut().retain(|e| e.target.strong_count() > 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counter {
        ticks: u32,
        total: f32,
    }

    impl Tickable for Counter {
        fn tick(&mut self, dt: f32) {
            self.ticks += 1;
            self.total += dt;
        }
    }

    fn counter() -> (Rc<RefCell<Counter>>, Weak<RefCell<dyn Tickable>>) {
        let rc = Rc::new(RefCell::new(Counter::default()));
        let dyn_rc: Rc<RefCell<dyn Tickable>> = rc.clone();
        let weak = Rc::downgrade(&dyn_rc);
        (rc, weak)
    }

    #[test]
    fn update_ticks_registered_targets() {
        let scheduler = TickScheduler::new();
        let (c, weak) = counter();
        scheduler.schedule(weak);
        scheduler.update(0.5);
        scheduler.update(0.25);
        assert_eq!(c.borrow().ticks, 2);
        assert_eq!(c.borrow().total, 0.75);
    }

    #[test]
    fn schedule_is_idempotent_per_target() {
        let scheduler = TickScheduler::new();
        let (_c, weak) = counter();
        let a = scheduler.schedule(weak.clone());
        let b = scheduler.schedule(weak);
        assert_eq!(a, b);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn unscheduled_targets_are_not_ticked() {
        let scheduler = TickScheduler::new();
        let (c, weak) = counter();
        let id = scheduler.schedule(weak);
        assert!(scheduler.unschedule(id));
        assert!(!scheduler.unschedule(id));
        scheduler.update(1.0);
        assert_eq!(c.borrow().ticks, 0);
    }

    #[test]
    fn dropped_targets_are_pruned() {
        let scheduler = TickScheduler::new();
        let (c, weak) = counter();
        scheduler.schedule(weak);
        drop(c);
        scheduler.update(1.0);
        assert!(scheduler.is_empty());
    }

    struct SelfRemoving {
        scheduler: Rc<TickScheduler>,
        id: Option<TickId>,
        ticks: u32,
    }

    impl Tickable for SelfRemoving {
        fn tick(&mut self, _dt: f32) {
            self.ticks += 1;
            if let Some(id) = self.id.take() {
                self.scheduler.unschedule(id);
            }
        }
    }

    #[test]
    fn target_can_unschedule_itself_while_ticking() {
        let scheduler = Rc::new(TickScheduler::new());
        let target = Rc::new(RefCell::new(SelfRemoving {
            scheduler: Rc::clone(&scheduler),
            id: None,
            ticks: 0,
        }));
        let dyn_target: Rc<RefCell<dyn Tickable>> = target.clone();
        let id = scheduler.schedule(Rc::downgrade(&dyn_target));
        target.borrow_mut().id = Some(id);

        scheduler.update(0.1);
        scheduler.update(0.1);
        assert_eq!(target.borrow().ticks, 1);
        assert!(scheduler.is_empty());
    }
}
