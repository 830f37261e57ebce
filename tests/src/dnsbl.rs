mod engine;
mod providers;
