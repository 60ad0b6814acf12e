//! [`Handler`] abstractions.

use std::future::Future;

/// Asynchronous handler of `Args`.
///
/// Commands, queries and storage operations are all expressed as
/// [`Handler`]s of their argument type, so a single type may handle many
/// different operations.
pub trait Handler<Args = ()> {
    /// Successful outcome of this [`Handler`].
    type Ok;

    /// Failure of this [`Handler`].
    type Err;

    /// Handles the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
