//! [`Handler`] trait and the operations it is parametrized with.
//!
//! Commands, queries, database accesses and background tasks are all
//! expressed as `impl Handler<Operation> for Executor`, so the executor type
//! describes statically which operations it supports.

use std::{future::Future, marker::PhantomData};

/// Something able to execute an operation of type `Args`.
pub trait Handler<Args = ()> {
    /// Successful outcome of the execution.
    type Ok;

    /// Error of the execution.
    type Err;

    /// Executes the operation described by `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}

/// Inserts a new value.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Stores the new state of an existing value.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Removes a value.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Reads a value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Counts values.
#[derive(Clone, Copy, Debug)]
pub struct Count<T>(pub T);

/// Starts a long-running value (a background task, for example).
#[derive(Clone, Copy, Debug)]
pub struct Start<T>(pub T);

/// Performs a single iteration of a value.
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Locks a value until the end of the current transaction.
#[derive(Clone, Copy, Debug)]
pub struct Lock<T>(pub T);

/// Begins a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// Executor returned by [`Transact`]ing the `T` executor.
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Commits a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Selector of a `W`hat by a `B` value.
///
/// `W` only participates in the type, so different operations over the same
/// `B` may coexist on a single executor.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Marker of the selected type.
    _what: PhantomData<W>,

    /// Value the selection is performed by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Wraps the provided `by` value.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Unwraps the value this [`By`] selects by.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
