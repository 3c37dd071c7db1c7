//! Action dispatch and status reporting for the storage tiering console.
//!
//! The [`ActionDispatcher`] reads the operator's form, validates it, posts one
//! action to the backend, renders the outcome into a shared [`StatusDisplay`]
//! and refreshes the [`LogBuffer`] afterwards. Front ends subscribe to those
//! cells instead of being called back.

pub mod control;
pub mod dispatcher;
pub mod display;
pub mod form;
pub mod transport;

pub use control::{BusyGuard, Control};
pub use dispatcher::{ActionDispatcher, DispatchOutcome};
pub use display::{LogBuffer, PanelView, StatusDisplay};
pub use form::{FormFields, FormStateReader};
pub use transport::{ActionResponse, BackendTransport, HttpTransport, TransportError};
