//! Completion cell for resources that finish loading later.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::EngineError;

type Waiter<T> = Box<dyn FnOnce(&T)>;

/// A value that becomes available once loading completes.
///
/// Callers either check [`LoadTask::is_finished`] before reading or register
/// a callback with [`LoadTask::on_finished`].
pub struct LoadTask<T> {
    value: Option<T>,
    waiters: Vec<Waiter<T>>,
}

impl<T> LoadTask<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            waiters: Vec::new(),
        }
    }

    /// A task that is already complete.
    pub fn finished(value: T) -> Self {
        Self {
            value: Some(value),
            waiters: Vec::new(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.value.is_some()
    }

    /// Store the value and run every waiting callback in registration order.
    ///
    /// Finishing twice replaces the value; callbacks only ever run once.
    pub fn finish(&mut self, value: T) {
        let value = &*self.value.insert(value);
        for waiter in self.waiters.drain(..) {
            waiter(value);
        }
    }

    /// Run `callback` on completion, or right away if already complete.
    pub fn on_finished(&mut self, callback: impl FnOnce(&T) + 'static) {
        match &self.value {
            Some(value) => callback(value),
            None => self.waiters.push(Box::new(callback)),
        }
    }

    pub fn value(&self) -> Result<&T, EngineError> {
        self.value.as_ref().ok_or(EngineError::NotReady)
    }

    pub fn value_or<'a>(&'a self, default: &'a T) -> &'a T {
        self.value.as_ref().unwrap_or(default)
    }
}

impl<T> Default for LoadTask<T> {
    fn default() -> Self {
        Self::new()
    }
}
