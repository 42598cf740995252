pub mod browse;
pub mod detail;
pub mod features;
pub mod listing;
pub mod ranking;
pub mod slug;

use features::Taxonomy;

/// Everything the assemblers need besides the records themselves.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub taxonomy: Taxonomy,
    pub page_size: usize,
    pub review_threshold: i64,
}

impl Default for PipelineContext {
    fn default() -> Self {
        PipelineContext {
            taxonomy: Taxonomy::default(),
            page_size: ranking::DEFAULT_PAGE_SIZE,
            review_threshold: ranking::DEFAULT_REVIEW_THRESHOLD,
        }
    }
}

pub(crate) const DESCRIPTION_PLACEHOLDER: &str =
    "This restaurant has not added a description yet.";
