//! One in-memory collection mirrored to one JSON array file.

use std::collections::BTreeMap;
use std::path::Path;

use action_bank_core::bank::{Deposit, DepositAction, Exchange, Withdrawal, WithdrawalAction};
use action_bank_core::error::CoreError;
use action_bank_core::types::EntityId;
use action_bank_core::user::User;
use serde_json::Value;
use tokio::sync::RwLock;

use super::writer::CoalescingWriter;
use crate::error::RepoError;

/// A record that can live in a [`Collection`].
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
    fn to_json(&self) -> Result<Value, CoreError>;
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Record for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn to_json(&self) -> Result<Value, CoreError> {
                    <$ty>::to_json(self)
                }
            }
        )*
    };
}

impl_record!(User, Exchange, DepositAction, WithdrawalAction, Deposit, Withdrawal);

pub struct Collection<T: Record> {
    entity: &'static str,
    records: RwLock<BTreeMap<EntityId, T>>,
    writer: CoalescingWriter,
}

impl<T: Record> Collection<T> {
    /// Load `file_name` from `dir`, parsing each entry with `parse`.
    ///
    /// A missing or empty file is an empty collection. Entries that fail to
    /// parse are skipped with a warning; a file that is not a JSON array at
    /// all is an error.
    pub async fn load<P>(
        dir: &Path,
        file_name: &str,
        entity: &'static str,
        parse: P,
    ) -> Result<Self, RepoError>
    where
        P: Fn(Value) -> Result<T, CoreError>,
    {
        let path = dir.join(file_name);
        let records = read_records(&path, entity, parse).await?;

        tracing::debug!(
            path = %path.display(),
            count = records.len(),
            "Loaded {entity} records"
        );

        Ok(Self {
            entity,
            records: RwLock::new(records),
            writer: CoalescingWriter::new(path),
        })
    }

    pub async fn get(&self, id: &str) -> Result<T, RepoError> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(RepoError::does_not_exist(self.entity))
    }

    pub async fn find<F>(&self, pred: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.records.read().await.values().find(|r| pred(r)).cloned()
    }

    pub async fn filter<F>(&self, pred: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.records
            .read()
            .await
            .values()
            .filter(|r| pred(r))
            .cloned()
            .collect()
    }

    pub async fn all(&self) -> Vec<T> {
        self.records.read().await.values().cloned().collect()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Run `f` against the records under the write lock, then flush.
    ///
    /// If `f` fails nothing is written and the collection is left as `f`
    /// left it, so `f` must check before it mutates.
    pub async fn update<R, F>(&self, f: F) -> Result<R, RepoError>
    where
        F: FnOnce(&mut BTreeMap<EntityId, T>) -> Result<R, RepoError>,
    {
        let out = {
            let mut records = self.records.write().await;
            f(&mut records)?
        };
        self.flush().await?;
        Ok(out)
    }

    pub async fn insert(&self, record: T) -> Result<T, RepoError> {
        self.update(|records| {
            records.insert(record.id().to_string(), record.clone());
            Ok(record)
        })
        .await
    }

    /// Replace an existing record. Fails if the id is unknown.
    pub async fn replace(&self, record: T) -> Result<T, RepoError> {
        let entity = self.entity;
        self.update(|records| match records.get_mut(record.id()) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(RepoError::does_not_exist(entity)),
        })
        .await
    }

    pub async fn remove(&self, id: &str) -> Result<EntityId, RepoError> {
        let entity = self.entity;
        self.update(|records| {
            records
                .remove(id)
                .map(|_| id.to_string())
                .ok_or(RepoError::does_not_exist(entity))
        })
        .await
    }

    /// Remove every record matching `pred`, returning how many went.
    pub async fn remove_where<F>(&self, pred: F) -> Result<usize, RepoError>
    where
        F: Fn(&T) -> bool,
    {
        self.update(|records| {
            let before = records.len();
            records.retain(|_, r| !pred(r));
            Ok(before - records.len())
        })
        .await
    }

    /// Apply `f` to every record matching `pred`, returning how many changed.
    pub async fn modify_where<P, F>(&self, pred: P, f: F) -> Result<usize, RepoError>
    where
        P: Fn(&T) -> bool,
        F: Fn(&mut T),
    {
        self.update(|records| {
            let mut changed = 0;
            for record in records.values_mut().filter(|r| pred(r)) {
                f(record);
                changed += 1;
            }
            Ok(changed)
        })
        .await
    }

    async fn flush(&self) -> Result<(), RepoError> {
        self.writer.flush(|| self.snapshot()).await
    }

    async fn snapshot(&self) -> Result<Vec<u8>, RepoError> {
        let records = self.records.read().await;
        let values = records
            .values()
            .map(Record::to_json)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(serde_json::to_vec_pretty(&values)?)
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        self.writer.path()
    }
}

async fn read_records<T, P>(
    path: &Path,
    entity: &'static str,
    parse: P,
) -> Result<BTreeMap<EntityId, T>, RepoError>
where
    T: Record,
    P: Fn(Value) -> Result<T, CoreError>,
{
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e.into()),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(BTreeMap::new());
    }

    let raw: Value = serde_json::from_slice(&bytes)?;
    let Value::Array(entries) = raw else {
        return Err(RepoError::InvalidData(format!(
            "{} is not a JSON array",
            path.display()
        )));
    };

    let mut records = BTreeMap::new();
    for (index, entry) in entries.into_iter().enumerate() {
        match parse(entry) {
            Ok(record) => {
                records.insert(record.id().to_string(), record);
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed {entity} record");
            }
        }
    }
    Ok(records)
}
