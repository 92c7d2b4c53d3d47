pub mod check;
pub mod rules;

pub use check::*;
pub use rules::*;
