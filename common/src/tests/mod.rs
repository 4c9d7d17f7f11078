mod credentials;
mod error_location;
