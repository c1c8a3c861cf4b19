//! Shared utility types used across the analyses and passes.

mod bitset;

pub use bitset::BitSet;
