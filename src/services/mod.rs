pub mod notification_service;
pub mod sendgrid_service;

pub use notification_service::*;
pub use sendgrid_service::*;
