pub mod events;
pub mod keyboards;
pub mod poller;
pub mod service;
pub mod sessions;

pub use events::{
    wizard_dispatcher, CallbackQueryEvent, CommandEvent, EventContext, EventDispatcher,
    EventHandler, EventHandlerError, HandlerResult, TelegramEvent, TelegramEventType,
    TextMessageEvent, UpdateEnvelope, WizardEventService,
};
pub use keyboards::{InlineKeyboardButton, InlineKeyboardMarkup, OutboundMessage};
pub use poller::{
    HttpUpdateTransport, NoopUpdateTransport, PollRunner, ReconnectPolicy, TransportError,
    UpdateTransport,
};
pub use service::AlertWizard;
pub use sessions::{Session, SessionStore};
