//! Trailmark SEO: structured data, meta tags and on-page heuristics for blog posts.

pub mod analysis;
pub mod local;
pub mod meta;
pub mod optimize;
pub mod schema;
pub mod sitemap;
pub mod titles;
pub mod validate;

pub use analysis::{analyze_post, ContentAnalysis};
pub use local::LocalSeoOptimizer;
pub use meta::{MetaTagBuilder, SeoMetaTags};
pub use optimize::{OptimizationResult, PostOptimizer};
pub use schema::SchemaGenerator;
pub use sitemap::{Sitemap, SitemapEntry};
pub use titles::{optimize_description, optimize_title, DESCRIPTION_MAX, TITLE_MAX};
pub use validate::{validate_schema, ValidationResult};
