mod response_draft;

pub use response_draft::ResponseDraft;
