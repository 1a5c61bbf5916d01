//! Chat transcript domain module.
//!
//! # Module Structure
//!
//! - `block`: Typed content units (`Block`, `BlockKind`)
//! - `turn`: Speaker turns (`Turn`, `MessageRole`)
//! - `transcript`: Ordered turn history with structural sharing (`Transcript`)
//! - `parser`: Stream chunk to block conversion
//! - `merger`: Same-kind block merging
//! - `assembler`: Folding blocks into a transcript

mod assembler;
mod block;
mod merger;
mod parser;
mod transcript;
mod turn;

pub use assembler::{AppendOutcome, append_block, open_turn};
pub use block::{Block, BlockKind};
pub use merger::{MergeOutcome, try_merge};
pub use parser::{ChunkPayload, parse};
pub use transcript::Transcript;
pub use turn::{MessageRole, Turn};
