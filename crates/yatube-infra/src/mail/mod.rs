//! Mail backends - console output and an in-memory outbox.

mod console;
mod memory;

pub use console::ConsoleMailer;
pub use memory::InMemoryMailer;
