//! The page analysis pipeline.
//!
//! ```text
//! RawTextItem[] -> Token[] -> Line[] -> Vec<Line>[] -> Block[]
//!                normalize   cluster    segment      classify (+ grid)
//! ```

pub mod classify;
pub mod layout;
pub mod normalize;
pub mod table;
