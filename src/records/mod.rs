pub mod index;
pub mod storage;
pub mod types;

pub use index::{CustomerIndex, DuplicatePolicy, IndexError};
pub use storage::{load_banks, load_customers};
pub use types::{BankRecord, Customer, CustomerUser, ScoringView};
