//! The review workflow: pairs, session state machine and command dispatch.
pub mod action;
pub mod controller;
pub mod export;
pub mod extract;
pub mod keymap;
pub mod language;
pub mod pair;
pub mod progress;
pub mod session;
pub mod view;

pub use action::Action;
pub use controller::{
    LoadedSources,
    ReviewController,
};
pub use export::build_export;
pub use extract::{
    Extraction,
    extract_pairs,
};
pub use keymap::{
    InputMode,
    KeyPress,
    action_for_key,
};
pub use pair::{
    HistoryEntry,
    ReviewStatus,
    SectionFilter,
    TranslationPair,
};
pub use progress::{
    PreviewEntry,
    PreviewGroup,
    Progress,
    SectionState,
    SectionStats,
};
pub use session::{
    CorrectionDraft,
    ReviewSession,
};
pub use view::{
    Notice,
    NoticeLevel,
    Overlay,
    ReviewView,
};
