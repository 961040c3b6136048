//! Request extractors shared by handlers.
//!
//! - [`session::WizardSession`] -- Reads the wizard session id from the `smoothie_session` cookie.

pub mod session;
