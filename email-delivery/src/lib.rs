pub mod error;
pub mod smtp;

pub use error::DeliveryError;
pub use smtp::{SmtpDelivery, SmtpSettings};
