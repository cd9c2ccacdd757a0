mod coin;
mod search;

pub use coin::{Coin, PriceDirection};
pub use search::SearchHit;
