mod cli;
mod dynamic;
mod runners;
mod splitter;
