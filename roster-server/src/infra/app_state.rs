use std::{fmt, sync::Arc};

use roster_core::{mailer::Mailer, store::UserStore};

use crate::users::auth::tokens::TokenKeys;

/// Shared request-handling state. Cheap to clone; everything inside is
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub mailer: Arc<dyn Mailer>,
    pub token_keys: TokenKeys,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        store: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
        token_keys: TokenKeys,
    ) -> Self {
        Self {
            store,
            mailer,
            token_keys,
        }
    }
}
