mod book;
mod category;
mod invoice;

pub use book::*;
pub use category::*;
pub use invoice::*;
