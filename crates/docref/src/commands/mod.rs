//! Command implementations

pub mod branch;

pub mod doctor;

pub mod env;

pub mod exec;

pub mod info;

pub mod links;

pub mod range;
