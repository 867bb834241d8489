pub mod pool;
pub mod store;

#[cfg(test)]
pub mod memory;
