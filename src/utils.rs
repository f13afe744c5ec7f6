//! Utility functions

use std::sync::{Mutex, MutexGuard};

/// Lock a mutex, tolerating poisoning.
///
/// All guarded state in this crate stays consistent across panics (plain
/// flags and `Option` swaps), so a poisoned lock is recovered by taking
/// the inner guard instead of propagating the panic to the host.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
