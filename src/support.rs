//! Supporting utilities used by the resolver.

pub mod brent;
pub mod constraint;
pub mod expr;
