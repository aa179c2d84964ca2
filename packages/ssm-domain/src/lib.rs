//! Pure decisions behind a map export: which documents qualify, what they are named, and how
//! they are rendered to bytes.

pub mod artifact;
pub mod filename;
pub mod filter;
pub mod role;
