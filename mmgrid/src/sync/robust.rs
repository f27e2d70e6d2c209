//! Robust, process-shared pthread mutex

use std::mem::{size_of, MaybeUninit};

use super::LockStatus;
use crate::{Error, Result};

pub(super) struct RawMutex;

fn check(code: libc::c_int) -> Result<()> {
    match code {
        0 => Ok(()),
        code => Err(Error::Lock(code)),
    }
}

impl RawMutex {
    pub(super) const SIZE: usize = size_of::<libc::pthread_mutex_t>();

    /// # Safety
    ///
    /// `raw` must point to `SIZE` writable, suitably aligned bytes not in use
    /// by another thread.
    pub(super) unsafe fn init(raw: *mut u8) -> Result<()> {
        let mutex = raw as *mut libc::pthread_mutex_t;
        let mut attr = MaybeUninit::<libc::pthread_mutexattr_t>::uninit();
        check(libc::pthread_mutexattr_init(attr.as_mut_ptr()))?;
        let attr = attr.as_mut_ptr();

        let result = check(libc::pthread_mutexattr_setpshared(
            attr,
            libc::PTHREAD_PROCESS_SHARED,
        ))
        .and_then(|_| check(libc::pthread_mutexattr_setrobust(attr, libc::PTHREAD_MUTEX_ROBUST)))
        .and_then(|_| check(libc::pthread_mutex_init(mutex, attr)));

        libc::pthread_mutexattr_destroy(attr);
        result
    }

    /// # Safety
    ///
    /// `raw` must point to an initialised mutex.
    pub(super) unsafe fn lock(raw: *mut u8) -> Result<LockStatus> {
        match libc::pthread_mutex_lock(raw as *mut libc::pthread_mutex_t) {
            0 => Ok(LockStatus::Acquired),
            libc::EOWNERDEAD => {
                log::warn!("grid mutex owner died; caller must restore consistency");
                Ok(LockStatus::OwnerDied)
            }
            libc::ENOTRECOVERABLE => Err(Error::NotRecoverable),
            code => Err(Error::Lock(code)),
        }
    }

    /// # Safety
    ///
    /// `raw` must point to an initialised mutex.
    pub(super) unsafe fn unlock(raw: *mut u8) -> Result<()> {
        check(libc::pthread_mutex_unlock(raw as *mut libc::pthread_mutex_t))
    }

    /// # Safety
    ///
    /// `raw` must point to an initialised mutex held by the caller.
    pub(super) unsafe fn mark_consistent(raw: *mut u8) -> Result<()> {
        check(libc::pthread_mutex_consistent(raw as *mut libc::pthread_mutex_t))
    }
}
