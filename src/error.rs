//! Error and diagnostic types.

use thiserror::Error;

/// Why a part swap was rejected. A rejected swap leaves every slot and the
/// current selection untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("category '{0}' is not declared")]
    UnknownCategory(String),
    #[error("category '{0}' has no parts")]
    EmptyCategory(String),
    #[error("no part '{category}_{code}' and no suitable alternative")]
    NoMatchingVariant { category: String, code: String },
    #[error("category '{0}' has no slot on the target")]
    SlotMissing(String),
}

/// A non-fatal problem found while building the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogIssue {
    #[error("no donor asset was provided")]
    MissingDonor,
    #[error("no target asset was provided")]
    MissingTarget,
    #[error("donor has no '{0}' container")]
    MissingDonorContainer(String),
    #[error("target has no '{container}' container, slot for '{category}' skipped")]
    MissingTargetContainer { container: String, category: String },
    #[error("duplicate part '{0}', keeping the first one")]
    DuplicatePart(String),
    #[error("part '{0}' has an empty variant code")]
    EmptyVariantCode(String),
}
