use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use jobwatch_core::domain::alert::UserId;
use jobwatch_core::wizard::{actions, apply, prompts, WizardCommand, WizardError, WizardInput};
use jobwatch_db::AlertRepository;

use crate::events::{
    CallbackQueryEvent, CommandEvent, EventContext, EventHandlerError, TextMessageEvent,
    WizardEventService,
};
use crate::keyboards::{message_for, message_with_notice, OutboundMessage};
use crate::sessions::{Session, SessionStore};

const EXPIRED_NOTICE: &str = "Your session expired. Starting over.";
const TRANSIENT_NOTICE: &str =
    "Something went wrong on our side. Please try again in a moment.";
const SAVED_TEXT: &str = "Alert saved. You will hear about matching jobs.";
const DELETED_TEXT: &str = "Alert deleted.";
const CANCELLED_TEXT: &str = "Cancelled. Send /start when you need me again.";

/// The chat-facing alert wizard: owns the session map and drives the pure
/// transition engine, executing store side effects per transition.
pub struct AlertWizard<R> {
    sessions: SessionStore,
    repository: Arc<R>,
}

impl<R> AlertWizard<R>
where
    R: AlertRepository,
{
    pub fn new(repository: Arc<R>, idle_timeout: Duration) -> Self {
        Self { sessions: SessionStore::new(idle_timeout), repository }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    async fn restart(&self, chat_id: i64, user_id: &str, notice: &str) -> OutboundMessage {
        let slot = self.sessions.begin(user_id).await;
        let session = slot.lock().await;
        message_with_notice(chat_id, notice, &prompts::prompt_for(session.step, &session.draft))
    }

    /// Applies one input under the user's session lock. Side effects run
    /// while the lock is held so a user's transitions stay serialized end
    /// to end.
    async fn advance(
        &self,
        chat_id: i64,
        user_id: &UserId,
        slot: Arc<Mutex<Session>>,
        input: WizardInput,
        ctx: &EventContext,
    ) -> Result<Option<OutboundMessage>, EventHandlerError> {
        let mut session = slot.lock().await;

        let transition = match apply(session.step, &session.draft, &input) {
            Ok(transition) => transition,
            Err(WizardError::Validation(message)) => {
                session.touch();
                return Ok(Some(message_with_notice(
                    chat_id,
                    &message,
                    &prompts::prompt_for(session.step, &session.draft),
                )));
            }
            Err(error @ WizardError::InvalidTransition { .. }) => {
                warn!(
                    event_name = "wizard.input.rejected",
                    correlation_id = %ctx.correlation_id,
                    user_id = %user_id.0,
                    step = ?session.step,
                    error = %error,
                    "input is not legal for the current step"
                );
                if matches!(input, WizardInput::Text(_)) {
                    // Stray chatter at a button step is dropped silently.
                    return Ok(None);
                }
                session.touch();
                return Ok(Some(message_with_notice(
                    chat_id,
                    "That option is not available right now.",
                    &prompts::prompt_for(session.step, &session.draft),
                )));
            }
        };

        match transition.command {
            None => {
                session.step = transition.to;
                session.draft = transition.draft;
                session.touch();
                Ok(Some(message_for(
                    chat_id,
                    &prompts::prompt_for(session.step, &session.draft),
                )))
            }
            Some(WizardCommand::SaveAlert) => {
                match self.repository.create(user_id, transition.draft.clone()).await {
                    Ok(alert) => {
                        info!(
                            event_name = "wizard.alert.saved",
                            correlation_id = %ctx.correlation_id,
                            user_id = %user_id.0,
                            alert_id = %alert.id.0,
                            "alert saved"
                        );
                        drop(session);
                        self.sessions.end(&user_id.0).await;
                        Ok(Some(OutboundMessage::text_only(
                            chat_id,
                            format!("{SAVED_TEXT}\n\n{}", prompts::summary(&alert.filters)),
                        )))
                    }
                    Err(error) => {
                        warn!(
                            event_name = "wizard.alert.save_failed",
                            correlation_id = %ctx.correlation_id,
                            user_id = %user_id.0,
                            error = %error,
                            "alert store rejected the save; session preserved"
                        );
                        session.touch();
                        Ok(Some(message_with_notice(
                            chat_id,
                            TRANSIENT_NOTICE,
                            &prompts::prompt_for(session.step, &session.draft),
                        )))
                    }
                }
            }
            Some(WizardCommand::ListAlerts) => {
                match self.repository.list_by_user(user_id).await {
                    Ok(alerts) => {
                        session.touch();
                        Ok(Some(message_for(chat_id, &prompts::alert_list(&alerts))))
                    }
                    Err(error) => {
                        warn!(
                            event_name = "wizard.alert.list_failed",
                            correlation_id = %ctx.correlation_id,
                            user_id = %user_id.0,
                            error = %error,
                            "alert store read failed"
                        );
                        session.touch();
                        Ok(Some(message_with_notice(
                            chat_id,
                            TRANSIENT_NOTICE,
                            &prompts::prompt_for(session.step, &session.draft),
                        )))
                    }
                }
            }
            Some(WizardCommand::ShowDeleteMenu) => {
                match self.repository.list_by_user(user_id).await {
                    Ok(alerts) => {
                        session.touch();
                        Ok(Some(message_for(chat_id, &prompts::delete_menu(&alerts))))
                    }
                    Err(error) => {
                        warn!(
                            event_name = "wizard.alert.list_failed",
                            correlation_id = %ctx.correlation_id,
                            user_id = %user_id.0,
                            error = %error,
                            "alert store read failed"
                        );
                        session.touch();
                        Ok(Some(message_with_notice(
                            chat_id,
                            TRANSIENT_NOTICE,
                            &prompts::prompt_for(session.step, &session.draft),
                        )))
                    }
                }
            }
            Some(WizardCommand::DeleteAlert(alert_id)) => {
                let alert_id = jobwatch_core::domain::alert::AlertId(alert_id);
                match self.repository.delete_by_id(&alert_id).await {
                    // Deleting an id that is already gone reads the same to
                    // the user as deleting a live one.
                    Ok(removed) => {
                        info!(
                            event_name = "wizard.alert.deleted",
                            correlation_id = %ctx.correlation_id,
                            user_id = %user_id.0,
                            alert_id = %alert_id.0,
                            removed,
                            "alert delete processed"
                        );
                        session.touch();
                        Ok(Some(message_with_notice(
                            chat_id,
                            DELETED_TEXT,
                            &prompts::prompt_for(session.step, &session.draft),
                        )))
                    }
                    Err(error) => {
                        warn!(
                            event_name = "wizard.alert.delete_failed",
                            correlation_id = %ctx.correlation_id,
                            user_id = %user_id.0,
                            alert_id = %alert_id.0,
                            error = %error,
                            "alert store rejected the delete"
                        );
                        session.touch();
                        Ok(Some(message_with_notice(
                            chat_id,
                            TRANSIENT_NOTICE,
                            &prompts::prompt_for(session.step, &session.draft),
                        )))
                    }
                }
            }
            Some(WizardCommand::EndSession) => {
                drop(session);
                self.sessions.end(&user_id.0).await;
                Ok(Some(OutboundMessage::text_only(chat_id, CANCELLED_TEXT)))
            }
        }
    }
}

#[async_trait]
impl<R> WizardEventService for AlertWizard<R>
where
    R: AlertRepository + 'static,
{
    async fn handle_command(
        &self,
        event: &CommandEvent,
        ctx: &EventContext,
    ) -> Result<Option<OutboundMessage>, EventHandlerError> {
        match event.command.as_str() {
            "start" | "menu" => {
                info!(
                    event_name = "wizard.session.started",
                    correlation_id = %ctx.correlation_id,
                    user_id = %event.user_id,
                    "session started from command"
                );
                let slot = self.sessions.begin(&event.user_id).await;
                let session = slot.lock().await;
                Ok(Some(message_for(
                    event.chat_id,
                    &prompts::prompt_for(session.step, &session.draft),
                )))
            }
            "cancel" => {
                self.sessions.end(&event.user_id).await;
                Ok(Some(OutboundMessage::text_only(event.chat_id, CANCELLED_TEXT)))
            }
            other => {
                warn!(
                    event_name = "wizard.command.unknown",
                    correlation_id = %ctx.correlation_id,
                    user_id = %event.user_id,
                    command = other,
                    "unknown command dropped"
                );
                Ok(None)
            }
        }
    }

    async fn handle_callback(
        &self,
        event: &CallbackQueryEvent,
        ctx: &EventContext,
    ) -> Result<Option<OutboundMessage>, EventHandlerError> {
        let Some(action) = actions::parse(&event.token) else {
            warn!(
                event_name = "wizard.token.unmatched",
                correlation_id = %ctx.correlation_id,
                user_id = %event.user_id,
                token = %event.token,
                "callback token outside the action grammar; dropped"
            );
            return Ok(None);
        };

        let Some(slot) = self.sessions.get(&event.user_id).await else {
            return Ok(Some(self.restart(event.chat_id, &event.user_id, EXPIRED_NOTICE).await));
        };

        let user_id = UserId(event.user_id.clone());
        self.advance(event.chat_id, &user_id, slot, WizardInput::Action(action), ctx).await
    }

    async fn handle_text(
        &self,
        event: &TextMessageEvent,
        ctx: &EventContext,
    ) -> Result<Option<OutboundMessage>, EventHandlerError> {
        // Text without a session is ordinary chatter, not wizard input.
        let Some(slot) = self.sessions.get(&event.user_id).await else {
            return Ok(None);
        };

        let user_id = UserId(event.user_id.clone());
        self.advance(event.chat_id, &user_id, slot, WizardInput::Text(event.text.clone()), ctx)
            .await
    }
}
