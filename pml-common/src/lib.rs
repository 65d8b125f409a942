//! Common building blocks shared by the PML scanner and parser.
//!
//! Positions, checkpoints and text slices are produced by the cursor in
//! `pml-lexer` and carried through the grammar in `pml-parser`; the source
//! excerpt is what parse errors render under the offending column.

pub mod checkpoint;
pub mod excerpt;
pub mod position;
pub mod text_slice;

pub use checkpoint::Checkpoint;
pub use excerpt::SourceExcerpt;
pub use position::Position;
pub use text_slice::TextSlice;
