pub mod app;
pub mod config;
pub mod error;
pub mod forms;
pub mod modal;
pub mod models;
pub mod notifications;
pub mod render;
pub mod state;
pub mod store;

pub use app::{App, SyncOutcome, Transition};
pub use config::Config;
pub use error::{LookupError, ParseError, StoreError, ValidationError};
pub use forms::{EditForm, LibraryForm, ReviewForm};
pub use modal::{Modal, ModalHost, ModalTarget};
pub use models::*;
pub use notifications::{ConsoleNotifier, Notification, Notifier, RecordingNotifier, Severity};
pub use state::AppState;
pub use store::{HttpStore, MemoryStore, RemoteStore};
