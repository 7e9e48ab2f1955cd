use app_api::AppContext;
use betslip_app::Result;

use crate::errors::HttpError;

#[derive(Clone)]
pub struct HttpState {
    pub context: AppContext,
}

impl HttpState {
    pub fn new(context: AppContext) -> Self {
        Self { context }
    }

    /// Runs a synchronous app call on the blocking pool.
    pub async fn run<T, F>(&self, call: F) -> std::result::Result<T, HttpError>
    where
        T: Send + 'static,
        F: FnOnce(&AppContext) -> Result<T> + Send + 'static,
    {
        let context = self.context.clone();
        match tokio::task::spawn_blocking(move || call(&context)).await {
            Ok(result) => result.map_err(HttpError::from),
            Err(err) => {
                tracing::error!(error = %err, "blocking task failed");
                Err(HttpError::internal())
            }
        }
    }
}
