pub mod company;
pub mod core;
pub mod similarity;
pub mod template;

// Re-export key functions for convenience
pub use company::regroup_by_company;
pub use core::merge_singleton_buckets;
pub use similarity::merge_similar_titles;
pub use template::merge_template_buckets;
