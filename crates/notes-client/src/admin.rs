//! Administrator view of all accounts.

use notes_core::{User, UsersResponse};

use crate::client::ApiClient;
use crate::error::{StoreError, StoreResult};
use crate::transport::Transport;

#[derive(Debug)]
pub struct AdminStore<T> {
    api: ApiClient<T>,
    users: Vec<User>,
    loading: bool,
    error: Option<String>,
}

impl<T: Transport> AdminStore<T> {
    pub fn new(api: ApiClient<T>) -> Self {
        Self {
            api,
            users: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the local list with every account on the server.
    pub async fn fetch_users(&mut self) -> StoreResult<&[User]> {
        self.error = None;
        self.loading = true;
        let result = self.api.get::<UsersResponse>("/admin/users").await;
        self.loading = false;

        match result {
            Ok(response) => {
                self.users = response.users;
                Ok(&self.users)
            }
            Err(e) => {
                let err = StoreError::new(e, "Failed to fetch users");
                self.error = Some(err.message.clone());
                Err(err)
            }
        }
    }
}
