//! # Application Context
//!
//! Everything a command works with: settings, the editor, the local store,
//! the blog client, the converter and the event queue. Built once at
//! start-up and passed by mutable reference to every command.

use std::rc::Rc;

use crate::config::Settings;
use crate::convert::Converter;
use crate::editor::Editor;
use crate::error::{Result, UbError};
use crate::events::{listeners, EventQueue};
use crate::remote::{BlogApi, XmlRpcBlogApi};
use crate::store::{init_default_template, JsonFileStore, Session, Store};

pub struct AppContext {
    pub settings: Settings,
    pub editor: Box<dyn Editor>,
    pub store: Option<Rc<dyn Store>>,
    pub api: Option<Rc<dyn BlogApi>>,
    pub converter: Converter,
    pub events: EventQueue,
}

impl AppContext {
    /// Context without store or blog client, with the default listeners.
    pub fn new(settings: Settings, editor: Box<dyn Editor>) -> Self {
        let converter = Converter::from_options(&settings.options);
        let mut events = EventQueue::new();
        listeners::register_defaults(&mut events);
        Self {
            settings,
            editor,
            store: None,
            api: None,
            converter,
            events,
        }
    }

    pub fn with_store(mut self, store: Rc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_api(mut self, api: Rc<dyn BlogApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Wire up the file store and the XML-RPC client from the profile.
    /// Without a blog account neither is available.
    pub fn from_settings(settings: Settings, editor: Box<dyn Editor>) -> Result<Self> {
        let Some(blog) = settings.blog.clone() else {
            tracing::warn!("No blog configured, store and remote commands are unavailable");
            return Ok(Self::new(settings, editor));
        };

        let store: Rc<dyn Store> = Rc::new(JsonFileStore::new(blog.db_path.clone()));
        init_default_template(store.as_ref())?;
        let api: Rc<dyn BlogApi> =
            Rc::new(XmlRpcBlogApi::new(&blog, settings.options.socket_timeout)?);

        Ok(Self::new(settings, editor).with_store(store).with_api(api))
    }

    pub fn store(&self) -> Result<Rc<dyn Store>> {
        self.store
            .clone()
            .ok_or(UbError::MissingCollaborator("Local store"))
    }

    pub fn api(&self) -> Result<Rc<dyn BlogApi>> {
        self.api
            .clone()
            .ok_or(UbError::MissingCollaborator("Blog API"))
    }

    pub fn open_session(&self) -> Result<Session> {
        Session::open(self.store()?)
    }
}
