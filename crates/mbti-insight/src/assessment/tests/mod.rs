mod common;

mod classifier;
