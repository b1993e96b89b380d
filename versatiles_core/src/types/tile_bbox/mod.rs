mod constructors;
mod convert;
mod fmt;
mod iter;
mod iter_zorder;
mod mutate;
mod queries;
#[cfg(test)]
mod tests;

pub use constructors::*;
