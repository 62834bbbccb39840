//! Optimistic in-memory state with snapshot rollback.

use std::future::Future;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;
use tokio::sync::Mutex;

use crate::errors::{Error, Result};

/// State that is mutated locally before an external collaborator confirms the change.
///
/// [`OptimisticState::apply`] snapshots the state, applies the mutation, then awaits
/// the confirmation. If either step fails the snapshot is restored and the error is
/// returned, so every optimistic mutation has a matching rollback path.
///
/// Mutations are serialized: an `apply` or `replace` waits until the previous one
/// has committed or rolled back, so a rollback only ever undoes its own change.
/// Reads do not wait and see pending mutations.
pub struct OptimisticState<T> {
    state: RwLock<T>,
    mutations: Mutex<()>,
}

impl<T: Clone> OptimisticState<T> {
    pub fn new(initial: T) -> Self {
        Self {
            state: RwLock::new(initial),
            mutations: Mutex::new(()),
        }
    }

    /// Runs `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        let guard = self.read_guard()?;
        Ok(f(&guard))
    }

    /// Replaces the whole state without any confirmation step.
    pub async fn replace(&self, next: T) -> Result<()> {
        let _mutation = self.mutations.lock().await;
        *self.write_guard()? = next;
        Ok(())
    }

    /// Applies `mutate` locally, then awaits `confirm` with the mutation's outcome.
    ///
    /// The state lock is released before `confirm` runs; the mutation gate is not.
    pub async fn apply<R, M, C, Fut>(&self, mutate: M, confirm: C) -> Result<R>
    where
        R: Clone,
        M: FnOnce(&mut T) -> Result<R>,
        C: FnOnce(R) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let _mutation = self.mutations.lock().await;
        let (snapshot, outcome) = {
            let mut guard = self.write_guard()?;
            let snapshot = guard.clone();
            match mutate(&mut guard) {
                Ok(outcome) => (snapshot, outcome),
                Err(err) => {
                    *guard = snapshot;
                    return Err(err);
                }
            }
        };

        match confirm(outcome.clone()).await {
            Ok(()) => Ok(outcome),
            Err(err) => {
                warn!("Rolling back optimistic update: {}", err);
                *self.write_guard()? = snapshot;
                Err(err)
            }
        }
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, T>> {
        self.state
            .read()
            .map_err(|_| Error::Unexpected("optimistic state lock poisoned".to_string()))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, T>> {
        self.state
            .write()
            .map_err(|_| Error::Unexpected("optimistic state lock poisoned".to_string()))
    }
}
