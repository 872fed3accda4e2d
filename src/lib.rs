/// mtg-query - Natural-Language Card Search Translation
///
/// Core library that turns free-form card descriptions into card-search
/// grammar queries, validates hand-written queries, and orchestrates
/// translation under timeouts, rate limits and superseded requests.

pub mod config;
pub mod core;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
