pub mod companies;
pub mod extraction;

pub use extraction::{EntityExtractor, TokenInfo, BREAKTHROUGH_TEMPLATE_ID};

// Module-level constants
pub const TARGET_ENTITY: &str = "entity";
