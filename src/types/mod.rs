pub mod advice;
pub mod coin;
pub mod indicators;
pub mod price;
pub mod signals;

pub use advice::*;
pub use coin::*;
pub use indicators::*;
pub use price::*;
pub use signals::*;
