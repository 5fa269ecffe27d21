mod parameters;
mod timeouts;
mod upgrade;
