//! Request handlers for the quote widget.

mod quotes;
mod transfer;
pub mod websocket;

pub use quotes::*;
pub use transfer::*;
