pub mod headless;
pub mod http;
pub mod local_file;
pub mod session_store;

pub use headless::{DialogEvent, HeadlessDialogs, RecordingNavigator, SnapshotView};
pub use http::ReqwestTransport;
pub use local_file::read_upload;
pub use session_store::{FileSessionStore, MemorySessionStore};
