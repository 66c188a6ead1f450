use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::resource::{Resource, ResourceId};

/// Resources waiting for a backend upload.
///
/// Deduplicated by `ResourceId`: a resource sits in the queue at most once
/// until the backend drains it, after which it can be scheduled again.
/// Producers (resources staging new data) and the consumer (backend) may live
/// on different threads.
#[derive(Default)]
pub struct UpdateQueue {
    inner: Mutex<UpdateState>,
}

#[derive(Default)]
struct UpdateState {
    pending: HashSet<ResourceId>,
    queue: VecDeque<Arc<dyn Resource>>,
}

impl UpdateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, UpdateState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Schedules `resource` for upload.
    ///
    /// Returns `false` when it is already waiting.
    pub fn schedule(&self, resource: Arc<dyn Resource>) -> bool {
        let mut state = self.lock();
        if !state.pending.insert(resource.id()) {
            return false;
        }
        state.queue.push_back(resource);
        true
    }

    /// Takes every waiting resource in first-scheduled order.
    pub fn drain(&self) -> Vec<Arc<dyn Resource>> {
        let mut state = self.lock();
        state.pending.clear();
        state.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.lock().pending.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy(ResourceId);

    impl Resource for Dummy {
        fn id(&self) -> ResourceId {
            self.0
        }
    }

    fn dummy() -> Arc<Dummy> {
        Arc::new(Dummy(ResourceId::next()))
    }

    #[test]
    fn double_schedule_yields_one_entry() {
        let q = UpdateQueue::new();
        let r = dummy();
        assert!(q.schedule(r.clone()));
        assert!(!q.schedule(r.clone()));
        let drained = q.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].id(), r.id());
    }

    #[test]
    fn drain_preserves_first_insertion_order() {
        let q = UpdateQueue::new();
        let (a, b, c) = (dummy(), dummy(), dummy());
        q.schedule(a.clone());
        q.schedule(b.clone());
        q.schedule(a.clone());
        q.schedule(c.clone());
        let ids: Vec<_> = q.drain().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![a.id(), b.id(), c.id()]);
    }

    #[test]
    fn drained_resource_can_be_scheduled_again() {
        let q = UpdateQueue::new();
        let r = dummy();
        q.schedule(r.clone());
        q.drain();
        assert!(q.is_empty());
        assert!(!q.contains(r.id()));
        assert!(q.schedule(r.clone()));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn schedule_from_other_threads() {
        let q = Arc::new(UpdateQueue::new());
        let r = dummy();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let q = Arc::clone(&q);
                let r = Arc::clone(&r);
                std::thread::spawn(move || {
                    q.schedule(r);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(q.drain().len(), 1);
    }
}
