// Library exports for testing
// The binary (main.rs) imports these as well

pub mod error;
pub mod host;
pub mod logger;
pub mod paths;
pub mod report;
pub mod session;
pub mod settings;

#[cfg(test)]
mod tests;
