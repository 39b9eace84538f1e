use std::collections::VecDeque;

/// Work the host loop runs when it goes idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleTask {
    /// Apply the pending visual change.
    VisualChange,
}

/// Return value of an idle callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleControl {
    /// Run again on the next idle pass.
    Continue,
    /// One-shot: drop the callback.
    Remove,
}

/// Seam to the host's cooperative event loop.
pub trait IdleQueue {
    fn add_idle(&mut self, task: IdleTask);
}

/// Single-threaded FIFO of idle tasks, drained by the editor.
#[derive(Debug, Default)]
pub struct LocalIdleQueue {
    tasks: VecDeque<IdleTask>,
}

impl LocalIdleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop(&mut self) -> Option<IdleTask> {
        self.tasks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl IdleQueue for LocalIdleQueue {
    fn add_idle(&mut self, task: IdleTask) {
        self.tasks.push_back(task);
    }
}
