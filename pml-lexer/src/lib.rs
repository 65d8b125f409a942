//! Scanner for PML text.
//!
//! The [`Cursor`] walks a shared source buffer, skipping whitespace and `#`
//! comments before every token attempt, and consumes the fixed PML token
//! alphabet described by [`Token`]. There is no separate tokenization pass:
//! the grammar asks the cursor for exactly the token it expects next.

pub mod cursor;
#[cfg(feature = "streaming")]
pub mod streaming;
pub mod token;

pub use cursor::Cursor;
pub use pml_common::{Checkpoint, Position, TextSlice};
#[cfg(feature = "streaming")]
pub use streaming::LineBuffer;
pub use token::{Token, TokenPattern};
