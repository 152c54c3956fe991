pub mod auth;
pub mod encoding;
pub mod http;
pub mod session;
pub mod thread;
pub mod upload;

pub use auth::extract_bearer_token;
pub use encoding::quote_payload;
pub use http::ThreadsClient;
pub use session::{Credentials, Session};
pub use thread::ThreadAttachment;
pub use upload::{ImageSource, UploadDescriptor};
