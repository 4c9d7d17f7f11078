mod host;
mod session;
