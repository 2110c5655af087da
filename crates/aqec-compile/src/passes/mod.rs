//! Built-in rewrite passes.

pub mod cancel;
pub mod commute;
pub mod fuse;
pub mod layout;
pub mod unroll;

pub use cancel::CancelInverses;
pub use commute::CommutativeCancellation;
pub use fuse::FuseRotations;
pub use layout::NoiseAwareLayout;
pub use unroll::BasisUnroll;
