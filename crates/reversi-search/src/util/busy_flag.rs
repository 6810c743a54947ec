//! A lock for data that is never worth waiting for.

use std::{
    hint::spin_loop,
    sync::atomic::{AtomicBool, Ordering},
};

use lock_api::{GuardSend, RawMutex};

/// Raw lock meant to be used through `try_lock`.
///
/// Callers that find the flag set skip the protected data instead of waiting.
/// `lock` is still provided for maintenance operations such as clearing a
/// table, and simply spins.
pub struct RawBusyFlag {
    busy: AtomicBool,
}

unsafe impl RawMutex for RawBusyFlag {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawBusyFlag {
        busy: AtomicBool::new(false),
    };

    type GuardMarker = GuardSend;

    #[inline]
    fn lock(&self) {
        while !self.try_lock() {
            while self.busy.load(Ordering::Relaxed) {
                spin_loop();
            }
        }
    }

    #[inline]
    fn try_lock(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    #[inline]
    unsafe fn unlock(&self) {
        self.busy.store(false, Ordering::Release);
    }

    #[inline]
    fn is_locked(&self) -> bool {
        self.busy.load(Ordering::Relaxed)
    }
}

/// Data guarded by a [`RawBusyFlag`].
pub type BusyFlag<T> = lock_api::Mutex<RawBusyFlag, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_lock_fails_while_held() {
        let slot: BusyFlag<u32> = BusyFlag::new(1);
        let guard = slot.try_lock();
        assert!(guard.is_some());
        assert!(slot.try_lock().is_none());
        drop(guard);

        let mut guard = slot.try_lock().unwrap();
        *guard = 2;
        drop(guard);
        assert_eq!(*slot.lock(), 2);
    }
}
