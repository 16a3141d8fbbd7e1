pub mod config;
pub mod error;
pub mod filter;
pub mod repository;
pub mod store;
pub mod tags;
pub mod templating;
pub mod types;

pub use config::Config;
pub use error::{Result, TemplateError};
pub use filter::{Filterable, TemplateFilter};
pub use repository::{
    CaseReply, CaseReplyPatch, CaseReplyRepository, CaseResolution, CaseResolutionPatch,
    CaseResolutionRepository, ChatTemplate, ChatTemplatePatch, ChatTemplateRepository,
    EmailTemplate, EmailTemplatePatch, EmailTemplateRepository, NewCaseReply, NewCaseResolution,
    NewChatTemplate, NewEmailTemplate, ResolutionStep, TextAlign, bootstrap,
};
pub use store::{
    DocId, Document, DocumentStore, Direction, FieldOp, MemoryStore, OrderBy, Predicate,
    StoreError, StoreResult,
};
pub use templating::{PLACEHOLDER_IMAGE, StepLink, extract_links, refresh_links, substitute};
pub use types::{Language, VALID_LANGUAGES, Viewer};
