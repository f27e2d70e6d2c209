//! Process-shared mutex embedded in a grid file's lock region
//!
//! The lock region is [`LOCK_REGION_SIZE`] bytes inside the header. Its
//! layout is:
//!
//! | offset | content                                   |
//! |--------|-------------------------------------------|
//! | 0      | `u32` init status (uninit / busy / ready) |
//! | 8      | platform mutex                            |
//!
//! A freshly created file is zero filled, so the status starts out
//! uninitialised. The first process to win the status CAS initialises the
//! mutex; everyone else waits for the ready flag.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

use mmgrid_core::LOCK_REGION_SIZE;

use crate::Result;

#[cfg(target_os = "linux")]
mod robust;
#[cfg(target_os = "linux")]
use robust::RawMutex;

#[cfg(not(target_os = "linux"))]
mod fallback;
#[cfg(not(target_os = "linux"))]
use fallback::RawMutex;

const STATUS_UNINIT: u32 = 0;
const STATUS_INITIALIZING: u32 = 1;
const STATUS_READY: u32 = 2;

/// Offset of the platform mutex inside the lock region
pub(crate) const MUTEX_OFFSET: usize = 8;

const _: () = assert!(MUTEX_OFFSET + RawMutex::SIZE <= LOCK_REGION_SIZE);

/// Outcome of a successful `lock`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LockStatus {
    /// The mutex was free or released normally
    Acquired,
    /// The previous holder died while holding the mutex. The caller now
    /// owns it and should repair the protected data, then call
    /// `mark_consistent` before unlocking.
    OwnerDied,
}

/// Handle to the mutex living in a mapped lock region
///
/// Holds a raw pointer into the mapping. The owner of the mapping must
/// outlive the handle.
#[derive(Clone, Copy)]
pub(crate) struct SharedMutex {
    region: *mut u8,
}

impl SharedMutex {
    /// # Safety
    ///
    /// `region` must point to [`LOCK_REGION_SIZE`] writable, 8-byte aligned
    /// bytes that stay mapped for the lifetime of the returned value.
    pub(crate) unsafe fn from_region(region: *mut u8) -> Self {
        debug_assert_eq!(region as usize % 8, 0);
        Self { region }
    }

    fn status(&self) -> &AtomicU32 {
        // SAFETY: region is 8-aligned, mapped and valid for the handle lifetime
        unsafe { &*(self.region as *const AtomicU32) }
    }

    fn raw(&self) -> *mut u8 {
        // SAFETY: MUTEX_OFFSET + RawMutex::SIZE fits in the region (const assert)
        unsafe { self.region.add(MUTEX_OFFSET) }
    }

    /// Initialise the mutex unless another handle already did
    pub(crate) fn ensure_init(&self) -> Result<()> {
        let status = self.status();
        loop {
            match status.compare_exchange(
                STATUS_UNINIT,
                STATUS_INITIALIZING,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    // SAFETY: we won the CAS, nobody else touches the mutex bytes
                    let result = unsafe { RawMutex::init(self.raw()) };
                    let next = if result.is_ok() {
                        STATUS_READY
                    } else {
                        STATUS_UNINIT
                    };
                    status.store(next, Ordering::Release);
                    if result.is_ok() {
                        log::trace!("initialised shared mutex at {:p}", self.region);
                    }
                    return result;
                }
                Err(STATUS_READY) => return Ok(()),
                Err(_) => std::thread::yield_now(),
            }
        }
    }

    pub(crate) fn lock(&self) -> Result<LockStatus> {
        self.ensure_init()?;
        // SAFETY: initialised above, region stays mapped
        unsafe { RawMutex::lock(self.raw()) }
    }

    pub(crate) fn unlock(&self) -> Result<()> {
        self.ensure_init()?;
        // SAFETY: initialised above, region stays mapped
        unsafe { RawMutex::unlock(self.raw()) }
    }

    pub(crate) fn mark_consistent(&self) -> Result<()> {
        self.ensure_init()?;
        // SAFETY: initialised above, region stays mapped
        unsafe { RawMutex::mark_consistent(self.raw()) }
    }
}

/// Unlocks the grid mutex when dropped
///
/// Returned by `Matrix::lock_guard` and `Matrix3d::lock_guard`. Leaking the
/// guard (or the process dying) leaves the mutex held; the next locker is
/// then told [`LockStatus::OwnerDied`].
pub struct LockGuard<'a> {
    mutex: SharedMutex,
    status: LockStatus,
    _grid: PhantomData<&'a ()>,
}

impl<'a> LockGuard<'a> {
    /// The caller ties `'a` to the borrow of the grid owning the mapping
    pub(crate) fn acquire(mutex: SharedMutex) -> Result<Self> {
        let status = mutex.lock()?;
        Ok(Self {
            mutex,
            status,
            _grid: PhantomData,
        })
    }

    /// How the lock was obtained
    pub fn status(&self) -> LockStatus {
        self.status
    }

    /// Declare the protected data repaired after [`LockStatus::OwnerDied`]
    pub fn mark_consistent(&mut self) -> Result<()> {
        self.mutex.mark_consistent()?;
        self.status = LockStatus::Acquired;
        Ok(())
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.mutex.unlock() {
            log::warn!("failed to release grid mutex: {e}");
        }
    }
}
