//! JSON-file storage backend.
//!
//! Every collection is held in memory and mirrored to one JSON array file
//! under the data directory. Mutations flush through a per-file
//! [`writer::CoalescingWriter`]; a crash between a mutation and its flush
//! loses that mutation.

pub mod bank_repo;
pub mod collection;
pub mod user_repo;
pub mod writer;

pub use bank_repo::FileBankRepo;
pub use user_repo::FileUserRepo;
