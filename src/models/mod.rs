pub mod employee;
pub mod notification;
pub mod session;
pub mod stats;
