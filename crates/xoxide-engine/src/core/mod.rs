pub use self::{board::*, cell::*, lines::*, position::*};

pub(crate) mod board;
pub(crate) mod cell;
pub(crate) mod lines;
pub(crate) mod position;
