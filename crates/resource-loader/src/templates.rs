//! Bootstrap of a template builder from remote resources.

use crate::barrier::LoaderBarrier;
use crate::error::LoaderResult;
use crate::loader::{TextLoader, XmlLoader};
use crate::transport::Transport;
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use template_fields::MessageBundle;
use template_panel::TemplatePanelBuilder;

/// Loads a message bundle and a template document into a
/// [`TemplatePanelBuilder`].
#[derive(Debug)]
pub struct TemplateLoader<T> {
    transport: Arc<T>,
    base: String,
}

impl<T: Transport> TemplateLoader<T> {
    /// Create a loader fetching through `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            base: String::new(),
        }
    }

    /// Prefix prepended to every requested path.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    /// The transport resources are fetched with.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch both resources concurrently and install what loaded.
    ///
    /// The bundle replaces the messages of `builder`; the templates are
    /// added to it. Both loads always run to completion; the first failure
    /// is returned afterwards.
    pub async fn load(
        &self,
        builder: &mut TemplatePanelBuilder,
        messages: Option<&str>,
        templates: &str,
    ) -> LoaderResult<()> {
        let builder = RefCell::new(builder);
        let mut barrier = LoaderBarrier::new(self.transport.clone());
        if let Some(path) = messages {
            barrier.add_with(TextLoader::with_base(&self.base, path), |result| {
                if let Ok(text) = result {
                    let bundle = MessageBundle::parse(text);
                    debug!("installing {} messages", bundle.len());
                    builder.borrow_mut().set_messages(Rc::new(bundle));
                }
            });
        }
        barrier.add_with(XmlLoader::with_base(&self.base, templates), |result| {
            if let Ok(document) = result {
                let added = builder.borrow_mut().add_templates(document);
                debug!("installed {} templates", added);
            }
        });

        let outcome = barrier.activate().await;
        drop(barrier);
        let mut failures = outcome.failures.into_iter();
        match failures.next() {
            Some(first) => {
                for other in failures {
                    warn!("{}", other);
                }
                Err(first)
            }
            None => Ok(()),
        }
    }
}
