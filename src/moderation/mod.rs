//! Price moderation
//!
//! Deviation classification of submitted prices and the moderator review
//! queue built on top of it.

mod annotator;
mod classifier;
mod flow;
mod queue;
mod types;
mod validator;

pub use annotator::{
    build_annotator, render_prompt, HttpAnnotator, NarrativeAnnotator, PlainAnnotator,
    TemplateAnnotator,
};
pub use classifier::{classify, deviation_ratio, format_percentage};
pub use flow::{flag_suspicious_price, PriceModerator};
pub use queue::{Decision, ModerationQueue, ReviewedSubmission, SUBMISSIONS_PER_PAGE};
pub use types::{
    ClassificationRequest, ClassificationResult, FlagPriceInput, FlagPriceOutput, RawNumber,
    DEFAULT_DEVIATION_THRESHOLD,
};
pub use validator::{validate, validate_with_default};
