mod error;
mod paths;
mod report;
mod settings;
