/*!
 * Signals Module
 * Single-slot enclave mailboxes and handle-addressed signal delivery
 */

pub mod delivery;
pub mod mailbox;
pub mod types;

pub use delivery::SignalDelivery;
pub use mailbox::Mailbox;
pub use types::{Signal, SignalError, SignalResult};
