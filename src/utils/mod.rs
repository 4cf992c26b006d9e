//! Utility modules for the prober

pub mod limits;
pub mod port_parser;
