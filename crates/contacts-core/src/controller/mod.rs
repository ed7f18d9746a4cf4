//! Directory controller
//!
//! The DirectoryController is responsible for:
//! - Owning the edit session and form state
//! - Validating input before it reaches the repository
//! - Calling the ContactRepository
//! - Emitting a render model after every state-changing event
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ Presentation │─── Intent ────────┐
//! └──────────────┘                   │
//!        ▲                           ▼
//!        │                 ┌────────────────────┐
//!        │                 │ DirectoryController│
//!        │                 └────────────────────┘
//!        │                           │
//!        │                           ▼
//!        │                 ┌────────────────────┐      ┌─────────┐
//!        │                 │ ContactRepository  │─────▶│ KvStore │
//!        │                 └────────────────────┘      └─────────┘
//!        │                           │
//!        └──────── RenderModel ──────┘
//! ```
//!
//! ## Edit Session
//!
//! ```text
//! Idle --begin_edit(id), id exists--> Editing(id)
//! Editing(id) --submit success--> Idle
//! Editing(id) --cancel_edit--> Idle
//! Editing(id) --reconciliation, id gone--> Idle
//! Idle --submit success--> Idle
//! ```
//!
//! Every load reconciles the session against the freshly read directory, so
//! a contact deleted by anyone while it is being edited drops the session
//! back to `Idle`.

use crate::config::ControllerConfig;
use crate::error::Result;
use crate::model::{Contact, ContactId, Directory};
use crate::repository::ContactRepository;
use crate::validation::validate;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, error, info, warn};

/// Message shown when an edit target is not in the directory
pub const CONTACT_NOT_FOUND: &str = "contact not found";

/// Whether the form represents a new contact or an edit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    /// Form adds a new contact
    #[default]
    Idle,
    /// Form edits the contact with this id
    Editing(ContactId),
}

impl EditSession {
    /// Id being edited, if any
    pub fn target(&self) -> Option<&ContactId> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing(id) => Some(id),
        }
    }
}

/// Contents the presentation layer should put in the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Name field contents, as typed or prefilled
    pub name: String,
    /// Phone field contents, as typed or prefilled
    pub phone: String,
}

impl FormState {
    fn of(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            phone: contact.phone.clone(),
        }
    }
}

/// Snapshot handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderModel {
    /// Directory in canonical order
    pub contacts: Directory,
    /// Message to show, if the last event failed
    pub error_message: Option<String>,
    /// Current edit session
    pub editing: EditSession,
    /// Form contents
    pub form: FormState,
}

impl RenderModel {
    /// Whether the form is editing an existing contact
    pub fn is_editing(&self) -> bool {
        matches!(self.editing, EditSession::Editing(_))
    }

    /// Label for the form's submit action
    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() { "save" } else { "add a contact" }
    }
}

/// One user action for the controller loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Re-read the directory
    Load,
    /// Submit the form
    Submit { name: String, phone: String },
    /// Start editing a contact
    BeginEdit(ContactId),
    /// Leave edit mode
    CancelEdit,
    /// Delete a contact; `confirmed` is the user's answer to "are you sure"
    Delete { id: ContactId, confirmed: bool },
}

/// UI-facing state machine over a [`ContactRepository`]
///
/// ## Serialization
///
/// Every operation takes `&mut self`, and [`DirectoryController::run`]
/// consumes intents one at a time, so a mutation in flight always completes
/// before the next one starts. Later intents wait in the stream.
pub struct DirectoryController {
    repository: Arc<ContactRepository>,

    /// Last directory read from the repository
    contacts: Directory,

    session: EditSession,

    form: FormState,

    error_message: Option<String>,

    /// Render model sender for the presentation layer
    render_tx: mpsc::Sender<RenderModel>,
}

impl DirectoryController {
    /// Create a new controller
    ///
    /// # Returns
    ///
    /// A tuple of (controller, render_receiver) where render_receiver yields
    /// a model after every event
    pub fn new(
        repository: Arc<ContactRepository>,
        config: &ControllerConfig,
    ) -> Result<(Self, mpsc::Receiver<RenderModel>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.render_channel_capacity);

        let controller = Self {
            repository,
            contacts: Directory::new(),
            session: EditSession::Idle,
            form: FormState::default(),
            error_message: None,
            render_tx: tx,
        };

        Ok((controller, rx))
    }

    /// Current edit session
    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Current model, without emitting it
    pub fn render_model(&self) -> RenderModel {
        RenderModel {
            contacts: self.contacts.clone(),
            error_message: self.error_message.clone(),
            editing: self.session.clone(),
            form: self.form.clone(),
        }
    }

    /// Re-read the directory, reconcile the session and clear the error
    pub async fn load_and_render(&mut self) -> RenderModel {
        self.refresh().await;
        self.error_message = None;
        self.emit()
    }

    /// Validate and save the form
    ///
    /// Adds a contact when idle, updates the target when editing. Invalid
    /// input never reaches the repository.
    pub async fn submit(&mut self, name_raw: &str, phone_raw: &str) -> RenderModel {
        let draft = match validate(name_raw, phone_raw) {
            Ok(draft) => draft,
            Err(e) => {
                debug!("Rejected form input: {}", e);
                self.form = FormState {
                    name: name_raw.to_string(),
                    phone: phone_raw.to_string(),
                };
                self.error_message = Some(e.to_string());
                return self.emit();
            }
        };

        let outcome = match &self.session {
            EditSession::Editing(id) => self
                .repository
                .update(id, &draft.name, &draft.phone)
                .await
                .map(|_| ()),
            EditSession::Idle => self
                .repository
                .add(&draft.name, &draft.phone)
                .await
                .map(|_| ()),
        };

        match outcome {
            Ok(()) => {
                self.session = EditSession::Idle;
                self.form = FormState::default();
                self.load_and_render().await
            }
            Err(e) => {
                if e.is_persistence() {
                    error!("Failed to save contact: {}", e);
                } else {
                    warn!("Contact not saved: {}", e);
                }
                self.form = FormState {
                    name: name_raw.to_string(),
                    phone: phone_raw.to_string(),
                };
                // A vanished edit target resets the session here
                self.refresh().await;
                self.error_message = Some(format!("save failed: {}", e));
                self.emit()
            }
        }
    }

    /// Start editing a contact from the last-known directory
    pub fn begin_edit(&mut self, id: &ContactId) -> RenderModel {
        match self.contacts.iter().find(|c| &c.id == id) {
            Some(contact) => {
                debug!("Editing contact {}", id);
                self.form = FormState::of(contact);
                self.session = EditSession::Editing(contact.id.clone());
                self.error_message = None;
            }
            None => {
                warn!("Cannot edit unknown contact {}", id);
                self.error_message = Some(CONTACT_NOT_FOUND.to_string());
            }
        }
        self.emit()
    }

    /// Leave edit mode and empty the form
    pub fn cancel_edit(&mut self) -> RenderModel {
        self.session = EditSession::Idle;
        self.form = FormState::default();
        self.error_message = None;
        self.emit()
    }

    /// Delete a contact once the user confirmed
    pub async fn request_delete(&mut self, id: &ContactId, confirmed: bool) -> RenderModel {
        if !confirmed {
            debug!("Delete of {} not confirmed", id);
            return self.emit();
        }

        match self.repository.remove(id).await {
            Ok(()) => self.load_and_render().await,
            Err(e) => {
                error!("Failed to delete contact {}: {}", id, e);
                self.error_message = Some(format!("delete failed: {}", e));
                self.emit()
            }
        }
    }

    /// Apply one intent
    pub async fn handle(&mut self, intent: Intent) -> RenderModel {
        match intent {
            Intent::Load => self.load_and_render().await,
            Intent::Submit { name, phone } => self.submit(&name, &phone).await,
            Intent::BeginEdit(id) => self.begin_edit(&id),
            Intent::CancelEdit => self.cancel_edit(),
            Intent::Delete { id, confirmed } => self.request_delete(&id, confirmed).await,
        }
    }

    /// Run the intent loop
    ///
    /// Renders once at startup, then applies intents in arrival order until
    /// the stream ends or `shutdown` fires (or its sender is dropped). An
    /// intent that has started always runs to completion.
    pub async fn run<S>(&mut self, mut intents: S, mut shutdown: oneshot::Receiver<()>)
    where
        S: Stream<Item = Intent> + Unpin,
    {
        info!("Controller loop started");
        self.load_and_render().await;

        loop {
            tokio::select! {
                next = intents.next() => match next {
                    Some(intent) => {
                        debug!("Handling intent {:?}", intent);
                        self.handle(intent).await;
                    }
                    None => {
                        info!("Intent stream closed");
                        break;
                    }
                },

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!("Controller loop stopped");
    }

    async fn refresh(&mut self) {
        self.contacts = self.repository.list().await;
        self.reconcile();
    }

    fn reconcile(&mut self) {
        if let EditSession::Editing(id) = &self.session
            && !self.contacts.iter().any(|c| &c.id == id)
        {
            info!("Contact {} no longer exists, leaving edit mode", id);
            self.session = EditSession::Idle;
            self.form = FormState::default();
        }
    }

    /// Emit the current model and return it
    fn emit(&self) -> RenderModel {
        let model = self.render_model();

        if let Err(mpsc::error::TrySendError::Full(_)) = self.render_tx.try_send(model.clone()) {
            // The model is still returned to the caller
            warn!("Render channel full, dropping render model. Consider increasing render_channel_capacity.");
        }

        model
    }
}
