mod common;
mod navigator;
mod submission;
