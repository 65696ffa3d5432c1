//! CLI route: single route table and run context. Dispatches to the workflow,
//! backend client and presentation.

use crate::auth::{StoredCredentials, TokenStore};
use crate::backend::BackendClient;
use crate::cli::parse::{Commands, FavoritesCommands, HistoryCommands, ShareCommands};
use crate::cli::presentation::{
    format_favorites_json, format_favorites_text, format_history_json, format_history_text,
    format_outcome_json, format_outcome_text, format_saved_json, format_saved_text,
    format_share_reference, format_shared_json, format_shared_text, format_user,
    format_workflow_event,
};
use crate::config::TripgenConfig;
use crate::error::{ApiError, ServiceError};
use crate::request::GenerationRequest;
use crate::workflow::{FailureReason, GenerationWorkflow, Outcome};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Runtime context for CLI execution: configuration, backend client, token store.
pub struct RunContext {
    config: TripgenConfig,
    backend: Arc<BackendClient>,
    tokens: TokenStore,
}

impl RunContext {
    pub fn new(config: TripgenConfig, tokens: TokenStore) -> Result<Self, ApiError> {
        let backend = Arc::new(BackendClient::new(&config.backend)?);
        Ok(Self {
            config,
            backend,
            tokens,
        })
    }

    pub fn config(&self) -> &TripgenConfig {
        &self.config
    }

    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Plan {
                destination,
                days,
                travelers,
                budget,
                preferences,
                extra,
                name,
                anonymous,
                format,
            } => {
                let mut request = GenerationRequest::new(destination.clone())
                    .days(*days)
                    .travelers(*travelers)
                    .preferences(preferences.iter().copied());
                if let Some(budget) = budget {
                    request = request.budget(budget.clone());
                }
                if let Some(extra) = extra {
                    request = request.extra_requirements(extra.clone());
                }
                if let Some(name) = name {
                    request = request.display_name(name.clone());
                }
                self.run_plan(request, *anonymous, format).await
            }
            Commands::Login { email, password } => {
                let password = resolve_password(password.as_deref(), false)?;
                let session = self.backend.login(email, &password).await?;
                self.remember(&session.access_token, &session.user.email)?;
                Ok(format!("Logged in as {}", session.user.email))
            }
            Commands::Register { email, password } => {
                let password = resolve_password(password.as_deref(), true)?;
                let session = self.backend.register(email, &password).await?;
                self.remember(&session.access_token, &session.user.email)?;
                Ok(format!("Registered and logged in as {}", session.user.email))
            }
            Commands::Logout => {
                if self.tokens.clear()? {
                    Ok("Logged out.".to_string())
                } else {
                    Ok("Not logged in.".to_string())
                }
            }
            Commands::Whoami => {
                let token = self.require_token()?;
                let user = self.clear_on_unauthorized(self.backend.current_user(&token).await)?;
                Ok(format_user(&user))
            }
            Commands::History { command } => self.execute_history(command).await,
            Commands::Share { command } => self.execute_share(command).await,
            Commands::Favorites { command } => self.execute_favorites(command).await,
        }
    }

    async fn execute_history(&self, command: &HistoryCommands) -> Result<String, ApiError> {
        let token = self.require_token()?;
        match command {
            HistoryCommands::List {
                limit,
                offset,
                format,
            } => {
                let page =
                    self.clear_on_unauthorized(self.backend.history(&token, *limit, *offset).await)?;
                Ok(if format == "json" {
                    format_history_json(&page)
                } else {
                    format_history_text(&page)
                })
            }
            HistoryCommands::Show { id, format } => {
                let saved =
                    self.clear_on_unauthorized(self.backend.history_detail(&token, *id).await)?;
                Ok(if format == "json" {
                    format_saved_json(&saved)
                } else {
                    format_saved_text(&saved)
                })
            }
            HistoryCommands::Delete { id, force } => {
                if !*force {
                    use dialoguer::Confirm;
                    let confirmed = Confirm::new()
                        .with_prompt(format!("Delete itinerary {}?", id))
                        .interact()
                        .map_err(|e| {
                            ApiError::ConfigError(format!("Failed to get user input: {}", e))
                        })?;
                    if !confirmed {
                        return Ok("Deletion cancelled".to_string());
                    }
                }
                self.clear_on_unauthorized(self.backend.delete_history(&token, *id).await)?;
                info!(itinerary_id = *id, "Deleted itinerary");
                Ok(format!("Deleted itinerary {}", id))
            }
        }
    }

    async fn execute_share(&self, command: &ShareCommands) -> Result<String, ApiError> {
        match command {
            ShareCommands::View { token, format } => {
                let shared = self.backend.get_shared(token).await?;
                Ok(if format == "json" {
                    format_shared_json(&shared)
                } else {
                    format_shared_text(&shared)
                })
            }
            ShareCommands::Create {
                id,
                private,
                expires_days,
            } => {
                let token = self.require_token()?;
                let reference = self.clear_on_unauthorized(
                    self.backend
                        .create_share_link(&token, *id, !*private, *expires_days)
                        .await,
                )?;
                Ok(format_share_reference(&reference))
            }
        }
    }

    async fn execute_favorites(&self, command: &FavoritesCommands) -> Result<String, ApiError> {
        let token = self.require_token()?;
        match command {
            FavoritesCommands::List {
                limit,
                offset,
                format,
            } => {
                let page = self
                    .clear_on_unauthorized(self.backend.favorites(&token, *limit, *offset).await)?;
                Ok(if format == "json" {
                    format_favorites_json(&page)
                } else {
                    format_favorites_text(&page)
                })
            }
            FavoritesCommands::Add { id } => {
                self.clear_on_unauthorized(self.backend.add_favorite(&token, *id).await)?;
                Ok(format!("Added itinerary {} to favorites", id))
            }
            FavoritesCommands::Remove { id } => {
                self.clear_on_unauthorized(self.backend.remove_favorite(&token, *id).await)?;
                Ok(format!("Removed itinerary {} from favorites", id))
            }
            FavoritesCommands::Status { id } => {
                let status =
                    self.clear_on_unauthorized(self.backend.favorite_status(&token, *id).await)?;
                Ok(if status.is_favorite {
                    format!("Itinerary {} is a favorite", id)
                } else {
                    format!("Itinerary {} is not a favorite", id)
                })
            }
        }
    }

    /// Run one generation attempt, rendering progress to stderr. Ctrl-C cancels.
    async fn run_plan(
        &self,
        request: GenerationRequest,
        anonymous: bool,
        format: &str,
    ) -> Result<String, ApiError> {
        let token = if anonymous {
            None
        } else {
            self.tokens.load()?.map(|c| c.access_token)
        };
        let authenticated = token.is_some();

        let (sender, mut events) = mpsc::unbounded_channel();
        let workflow = GenerationWorkflow::new(
            self.backend.clone(),
            self.backend.clone(),
            self.config.workflow.clone(),
        )
        .with_events(sender);

        let submit = workflow.submit(request, token);
        let interrupt = tokio::signal::ctrl_c();
        tokio::pin!(submit, interrupt);
        let mut cancel_requested = false;
        let outcome = loop {
            tokio::select! {
                result = &mut submit => break result?,
                Some(event) = events.recv() => {
                    if let Some(line) = format_workflow_event(&event) {
                        eprintln!("{}", line);
                    }
                }
                signal = &mut interrupt, if !cancel_requested => {
                    cancel_requested = true;
                    match signal {
                        Ok(()) => {
                            eprintln!("Cancelling...");
                            workflow.cancel();
                        }
                        Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
                    }
                }
            }
        };

        match &outcome {
            Outcome::Failed {
                reason: FailureReason::Submission(err),
            } if err.is_unauthorized() && authenticated => {
                self.forget_credentials();
                Err(ApiError::Service(err.clone()))
            }
            Outcome::Failed { reason } => Err(ApiError::GenerationFailed(reason.to_string())),
            _ if format == "json" => Ok(format_outcome_json(&outcome)),
            _ => Ok(format_outcome_text(&outcome)),
        }
    }

    fn remember(&self, access_token: &str, email: &str) -> Result<(), ApiError> {
        self.tokens.save(&StoredCredentials::new(
            access_token,
            Some(email.to_string()),
        ))?;
        info!(email = %email, "Stored credentials");
        Ok(())
    }

    fn require_token(&self) -> Result<String, ApiError> {
        self.tokens
            .load()?
            .map(|c| c.access_token)
            .ok_or(ApiError::NotLoggedIn)
    }

    /// A rejected token is forgotten so the next command starts clean.
    fn clear_on_unauthorized<T>(&self, result: Result<T, ServiceError>) -> Result<T, ApiError> {
        result.map_err(|err| {
            if err.is_unauthorized() {
                self.forget_credentials();
            }
            err.into()
        })
    }

    fn forget_credentials(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to clear stored credentials");
        }
    }
}

fn resolve_password(given: Option<&str>, confirm: bool) -> Result<String, ApiError> {
    if let Some(password) = given {
        return Ok(password.to_string());
    }
    let mut prompt = dialoguer::Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt
        .interact()
        .map_err(|e| ApiError::ConfigError(format!("Failed to read password: {}", e)))
}
