//! Abstract storage operations.

use std::marker::PhantomData;

use crate::Handler;

/// Inserts a new value.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Overwrites an existing value.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Removes a value.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Reads a value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Takes an exclusive lock on a value until the end of a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Lock<T>(pub T);

/// Opens a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// Handle of a [`Transact`]ion opened by `T`.
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Commits a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Selector of `W` by `B`.
///
/// `W` only disambiguates operations selecting different values by the same
/// key, e.g. a hotel and its room types by a hotel ID.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the selected value.
    _what: PhantomData<W>,

    /// Key to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] selector with the provided key.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Returns the key of this [`By`] selector.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
