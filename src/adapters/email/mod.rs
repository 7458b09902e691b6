//! Email adapters implementing the ReceiptSender port.

mod resend_sender;

pub use resend_sender::{LogOnlyReceiptSender, ResendConfig, ResendReceiptSender};
