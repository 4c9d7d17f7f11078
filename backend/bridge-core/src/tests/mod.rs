mod channel;
mod config;
mod error;
mod exchange;
mod interception;
mod outbound;
mod state;
