pub mod database;
pub mod openai;
pub mod session;
pub mod storage;

pub use database::Database;
pub use openai::{
    ChatMessage, ChatOutcome, ContentPart, ImageUrl, OpenAiClient, TranscribeOutcome,
    extract_json_object, sanitize_suggestions, shape_string_items,
};
pub use session::{SESSION_COOKIE, SessionClaims, SessionService};
pub use storage::{DOCS_BUCKET, PHOTOS_BUCKET, SignedUpload, StorageClient};
