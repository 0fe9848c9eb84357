//! Repository layer for data access.
//!
//! Every repository borrows the transaction of the unit of work that handed
//! it out, so reads and writes of one operation share a single snapshot.

mod catalog_repository;
pub mod entities;
mod order_repository;
mod payment_repository;
mod repair_repository;

pub use catalog_repository::TxCatalog;
pub use order_repository::TxOrderRepository;
pub use payment_repository::TxPaymentRepository;
pub use repair_repository::TxRepairRepository;
