mod exchange_world;
mod setups;

pub use exchange_world::ExchangeWorld;
