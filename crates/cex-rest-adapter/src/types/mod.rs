/*
[INPUT]:  Exchange schema conventions shared across venues
[OUTPUT]: Typed Rust structs/enums with serialization support
[POS]:    Data layer - shared type definitions
[UPDATE]: When shared types are added
*/

pub mod enums;
pub mod models;

pub use enums::*;
pub use models::*;
