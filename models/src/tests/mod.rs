mod command;
mod headers;
