//! Durable storage backends for the quote book.

mod file;

pub use file::FileStore;
