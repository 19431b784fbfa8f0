// core/src/pipeline/context_data.rs

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, lock-protected state threaded through every step of a pipeline run.
///
/// Handlers receive a clone (an `Arc` bump) and lock it for as long as they need.
/// Guards are blocking and MUST be dropped before any `.await`.
#[derive(Debug)]
pub struct ContextData<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> ContextData<T> {
  pub fn new(data: T) -> Self {
    ContextData(Arc::new(RwLock::new(data)))
  }

  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  /// Read guard narrowed to one part of the context, e.g. `ctx.map_read(|c| &c.plan)`.
  pub fn map_read<F, U: ?Sized>(&self, f: F) -> MappedRwLockReadGuard<'_, U>
  where
    F: FnOnce(&T) -> &U,
  {
    RwLockReadGuard::map(self.read(), f)
  }

  /// Unwraps the context once the pipeline and all handler clones are gone.
  /// Returns the shared handle back if other clones are still alive.
  pub fn try_into_inner(self) -> Result<T, Self> {
    Arc::try_unwrap(self.0).map(RwLock::into_inner).map_err(ContextData)
  }
}

impl<T: Send + Sync + 'static> Clone for ContextData<T> {
  fn clone(&self) -> Self {
    ContextData(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + 'static + Default> Default for ContextData<T> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clones_share_state() {
    let ctx = ContextData::new(vec![1, 2]);
    let other = ctx.clone();
    other.write().push(3);
    assert_eq!(*ctx.read(), vec![1, 2, 3]);
    assert_eq!(*ctx.map_read(|v| &v[2]), 3);
  }

  #[test]
  fn into_inner_requires_sole_owner() {
    let ctx = ContextData::new(String::from("cart"));
    let held = ctx.clone();
    let ctx = ctx.try_into_inner().unwrap_err();
    drop(held);
    assert_eq!(ctx.try_into_inner().unwrap(), "cart");
  }
}
