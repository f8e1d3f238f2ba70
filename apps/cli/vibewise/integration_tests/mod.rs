mod helpers;
mod repl;
