mod commands;
mod context;
mod events;
mod helpers;
mod launch;
