//! Postgres database clients.

use std::{mem, sync::Arc};

use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tokio_postgres::{Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{
        self,
        connection::{self, Params},
        Connection,
    },
};

/// Non-transactional Postgres database client.
///
/// Every statement runs on a [`connection::Pooled`] connection taken from
/// the [`connection::Pool`] for that statement only.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to take connections from.
    pub(crate) pool: connection::Pool,
}

impl NonTx {
    /// Creates a new [`NonTx`] client from the provided [`connection::Pool`].
    #[must_use]
    pub(crate) const fn from_pool(pool: connection::Pool) -> Self {
        Self { pool }
    }

    /// Takes a [`connection::Pooled`] connection from the pool.
    pub(crate) async fn pooled(
        &self,
    ) -> Result<connection::Pooled, Traced<database::Error>> {
        self.pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

impl Connection for NonTx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &Params<'_>,
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.pooled()
            .await
            .map_err(tracerr::wrap!())?
            .query(stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &Params<'_>,
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.pooled()
            .await
            .map_err(tracerr::wrap!())?
            .query_opt(stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &Params<'_>,
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.pooled()
            .await
            .map_err(tracerr::wrap!())?
            .exec(stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Transactional Postgres database client.
///
/// The transaction is opened lazily on the first statement, and all the
/// statements of this client and its clones run within it. Once committed,
/// the client rejects any further statement.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`NonTx`] client to take a connection for the transaction from.
    non_tx: NonTx,

    /// [`TxState`] shared by the clones of this client.
    state: Arc<Mutex<TxState>>,
}

/// State of the transaction of a [`Tx`] client.
#[derive(Debug, Default)]
enum TxState {
    /// No statement has been run yet.
    #[default]
    Idle,

    /// Transaction is opened.
    Open(connection::Tx),

    /// Transaction is committed.
    Committed,
}

impl Tx {
    /// Creates a new [`Tx`] client from the provided [`NonTx`] client.
    #[must_use]
    pub fn from_non_tx(non_tx: NonTx) -> Self {
        Self {
            non_tx,
            state: Arc::default(),
        }
    }

    /// Returns the [`connection::Tx`] of this [`Tx`] client, opening it if
    /// it's not opened yet.
    async fn connection(
        &self,
    ) -> Result<MappedMutexGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        let mut state = self.state.lock().await;
        if matches!(*state, TxState::Idle) {
            let pooled =
                self.non_tx.pooled().await.map_err(tracerr::wrap!())?;
            *state = TxState::Open(
                connection::Tx::begin(pooled)
                    .await
                    .map_err(tracerr::wrap!())?,
            );
        }
        MutexGuard::try_map(state, |s| match s {
            TxState::Open(tx) => Some(tx),
            TxState::Idle | TxState::Committed => None,
        })
        .map_err(|_| postgres::Error::Committed)
        .map_err(tracerr::from_and_wrap!())
    }

    /// Commits this [`Tx`] client.
    ///
    /// Doesn't touch the database if no statement has been run.
    ///
    /// # Errors
    ///
    /// If failed to commit the transaction of this [`Tx`] client.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let state =
            mem::replace(&mut *self.state.lock().await, TxState::Committed);
        match state {
            TxState::Open(tx) => tx.commit().await.map_err(tracerr::wrap!()),
            TxState::Idle | TxState::Committed => Ok(()),
        }
    }
}

impl Connection for Tx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &Params<'_>,
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.connection()
            .await
            .map_err(tracerr::wrap!())?
            .query(stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &Params<'_>,
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.connection()
            .await
            .map_err(tracerr::wrap!())?
            .query_opt(stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &Params<'_>,
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.connection()
            .await
            .map_err(tracerr::wrap!())?
            .exec(stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }
}
