pub mod domain;
pub mod parsers;
pub mod policies;
pub mod services;
