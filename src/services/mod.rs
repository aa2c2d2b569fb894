pub mod access;
pub mod aggregation;
pub mod directory;
pub mod identity;
pub mod lifecycle;
pub mod notifications;
