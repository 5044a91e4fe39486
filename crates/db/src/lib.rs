use std::path::Path;
use std::sync::Arc;

use action_bank_core::roles::UserTypeMap;

pub mod error;
pub mod file;
pub mod repositories;

pub use error::RepoError;
pub use repositories::{BankRepo, UserRepo};

/// The two storage handles every resolver works against.
#[derive(Clone)]
pub struct DataStore {
    pub users: Arc<dyn UserRepo>,
    pub bank: Arc<dyn BankRepo>,
}

/// Open the JSON-file store under `data_location`, creating the directory if
/// it does not exist yet.
pub async fn open_data_store(
    data_location: impl AsRef<Path>,
    user_types: Arc<UserTypeMap>,
) -> Result<DataStore, RepoError> {
    let dir = data_location.as_ref();
    tokio::fs::create_dir_all(dir).await?;

    let users = file::FileUserRepo::open(dir, user_types).await?;
    let bank = file::FileBankRepo::open(dir).await?;

    tracing::info!(data_location = %dir.display(), "Data store opened");

    Ok(DataStore {
        users: Arc::new(users),
        bank: Arc::new(bank),
    })
}
