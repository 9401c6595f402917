//! Token model issued by the Next Engine auth host.

pub mod token;

pub use token::*;
