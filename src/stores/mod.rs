//! The client-side copies of the user's records.
//!
//! Each store owns one collection and the [RequestStatus] of its latest
//! request. Operations await the [FinanceApi](crate::FinanceApi) and then
//! reconcile the collection with the server's response:
//!
//! - fetch replaces the collection,
//! - create appends the server's record,
//! - update replaces the record with the same ID,
//! - delete removes the record.
//!
//! Records are validated on the way in, so a store only ever holds well-formed
//! data.

mod account;
mod auth;
mod category;
mod status;
mod transaction;

#[cfg(test)]
pub(crate) mod test_utils;

pub use account::AccountStore;
pub use auth::AuthStore;
pub use category::CategoryStore;
pub use status::RequestStatus;
pub use transaction::TransactionStore;
