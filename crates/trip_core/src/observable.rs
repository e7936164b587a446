//! Minimal synchronous publish/subscribe primitive.

use anyhow::Result;
use shared::domain::UpdateKind;

pub type Handler<T> = Box<dyn FnMut(UpdateKind, Option<&T>) -> Result<()> + Send>;

/// Ordered list of subscribers notified with an update kind and an optional
/// payload.
///
/// Handlers run in registration order. The first handler error aborts the
/// sweep and is returned from [`Observable::notify`].
pub struct Observable<T> {
    handlers: Vec<Handler<T>>,
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<T> Observable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: FnMut(UpdateKind, Option<&T>) -> Result<()> + Send + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn notify(&mut self, kind: UpdateKind, payload: Option<&T>) -> Result<()> {
        for handler in &mut self.handlers {
            handler(kind, payload)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/observable_tests.rs"]
mod tests;
