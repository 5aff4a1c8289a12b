mod cookies;
mod extractor;
mod model;
mod store;

pub use cookies::{SESSION_COOKIE, create_session_cookie, session_token};
pub use extractor::ActiveSession;
pub use model::{AnswerResult, Progress, Session, SessionResults};
pub use store::{SessionHandle, SessionStore};
