pub mod fetch;
pub mod flows;
pub mod format;
pub mod loaders;
pub mod nav;
pub mod pages;
pub mod records;
pub mod render;
pub mod sequence;
pub mod session;
pub mod state;
pub mod stats;

// Re-export the page entry points so the binary and tests can build pages
// without reaching into submodules.
pub use flows::{FlowOutcome, UploadRejection};
pub use loaders::{LoadOutcome, Scope};
pub use pages::{AdminPage, AuthPage, MemberPage};
pub use state::AppState;
