pub mod config;
pub mod credentials;
pub mod external;
pub mod output;
pub mod reconcile;
pub mod records;
pub mod scoring;
