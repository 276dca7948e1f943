mod common;
mod policy;
mod status;
