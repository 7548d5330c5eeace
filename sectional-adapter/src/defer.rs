use std::collections::VecDeque;
use std::sync::{Arc, Weak};

/// A liveness token owned by the party whose work may be deferred
/// (typically a wrapper cell hosting an embedded grid).
///
/// Drop it when the owner is recycled or detached: tasks registered
/// against it become no-ops.
#[derive(Debug, Default)]
pub struct Liveness(Arc<()>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(()))
    }

    fn handle(&self) -> Weak<()> {
        Arc::downgrade(&self.0)
    }
}

struct Task {
    alive: Weak<()>,
    run: Box<dyn FnOnce() + Send>,
}

/// A FIFO queue of "run soon, but not now" callbacks.
///
/// Models the one asynchronous boundary of the engine: the host defers
/// configuring an embedded grid to its next scheduling tick so it never
/// mutates a cell the outer widget is still laying out. Tasks have no
/// ordering guarantee relative to anything else, only FIFO among
/// themselves; each task's liveness is validated at execution time, not
/// enqueue time.
#[derive(Default)]
pub struct DeferQueue {
    tasks: VecDeque<Task>,
}

impl DeferQueue {
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Enqueues `task` to run on the next [`DeferQueue::drain`], provided
    /// `owner` is still alive by then.
    pub fn push(&mut self, owner: &Liveness, task: impl FnOnce() + Send + 'static) {
        self.tasks.push_back(Task {
            alive: owner.handle(),
            run: Box::new(task),
        });
    }

    /// Runs the queued tasks in FIFO order, skipping any whose owner has
    /// been dropped. Returns how many actually ran.
    pub fn drain(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.tasks.pop_front() {
            if task.alive.upgrade().is_some() {
                (task.run)();
                ran += 1;
            }
        }
        ran
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

impl core::fmt::Debug for DeferQueue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DeferQueue")
            .field("tasks", &self.tasks.len())
            .finish()
    }
}
