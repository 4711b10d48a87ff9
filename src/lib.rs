//! Hadith reader library: core reading logic, platform ports, and the host driver.

pub mod core;
pub mod platform;
pub mod runtime;

#[cfg(test)]
pub mod test_support;
