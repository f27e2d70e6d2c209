//! Spin lock used where robust process-shared mutexes are unavailable
//!
//! Never reports owner death: a holder that dies leaves the lock taken.

use std::sync::atomic::{AtomicU32, Ordering};

use super::LockStatus;
use crate::Result;

pub(super) struct RawMutex;

impl RawMutex {
    pub(super) const SIZE: usize = std::mem::size_of::<AtomicU32>();

    unsafe fn word<'a>(raw: *mut u8) -> &'a AtomicU32 {
        &*(raw as *const AtomicU32)
    }

    pub(super) unsafe fn init(raw: *mut u8) -> Result<()> {
        Self::word(raw).store(0, Ordering::Release);
        Ok(())
    }

    pub(super) unsafe fn lock(raw: *mut u8) -> Result<LockStatus> {
        let word = Self::word(raw);
        while word
            .compare_exchange_weak(0, 1, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            std::thread::yield_now();
        }
        Ok(LockStatus::Acquired)
    }

    pub(super) unsafe fn unlock(raw: *mut u8) -> Result<()> {
        Self::word(raw).store(0, Ordering::Release);
        Ok(())
    }

    pub(super) unsafe fn mark_consistent(_raw: *mut u8) -> Result<()> {
        Ok(())
    }
}
