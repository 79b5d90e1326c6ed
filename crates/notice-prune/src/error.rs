use notice_model::PruneCategory;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PruneError {
    #[error("visual model root has {children} children, expected the data subtree at index {index}")]
    MissingDataSubtree { children: usize, index: usize },

    #[error("visual model root has no noticeSubType")]
    MissingSubType,

    #[error("{category} rule set for subtype {sub_type} has no field paths")]
    EmptyRuleSet {
        category: PruneCategory,
        sub_type: String,
    },
}

pub type Result<T> = std::result::Result<T, PruneError>;
