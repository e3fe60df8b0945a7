//! Mutual exclusion for stream state.
//!
//! Each stream owns exactly one lock, taken at the top of every public
//! operation and released on all paths. The `unsync` feature replaces
//! the mutex with a borrow-checked guard for single-threaded targets.

#[cfg(not(feature = "unsync"))]
mod imp {
    use std::sync::{Mutex, MutexGuard, PoisonError};

    #[derive(Debug, Default)]
    pub struct Lock<T>(Mutex<T>);

    impl<T> Lock<T> {
        pub fn new(value: T) -> Self {
            Self(Mutex::new(value))
        }

        pub fn lock(&self) -> MutexGuard<'_, T> {
            // A poisoned stream is still just bytes and a cursor.
            self.0.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }
}

#[cfg(feature = "unsync")]
mod imp {
    use core::cell::{RefCell, RefMut};

    #[derive(Debug, Default)]
    pub struct Lock<T>(RefCell<T>);

    impl<T> Lock<T> {
        pub fn new(value: T) -> Self {
            Self(RefCell::new(value))
        }

        pub fn lock(&self) -> RefMut<'_, T> {
            self.0.borrow_mut()
        }
    }
}

pub(crate) use imp::Lock;
