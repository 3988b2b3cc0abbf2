pub mod mapping;
pub mod resolver;

pub use mapping::{IdentityMapping, MappingEntry};
pub use resolver::IdentityResolver;
