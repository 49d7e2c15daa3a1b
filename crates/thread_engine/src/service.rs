//! Comment service
//!
//! One call to `CommentService::handle` is one request: the document is
//! fetched once, its thread decoded, the command applied, the response
//! rendered, and the document written back once if the thread changed.
//! The service keeps no thread state between requests.

use crate::{Clock, CommandKind, CommentCommand, EngineSettings, IdentityProvider, Result, SystemClock};
use std::sync::Arc;
use thread_model::{CommentSource, DocumentRef, ModelError, Thread, Viewer};
use thread_render::{RichText, ThreadRenderer};
use thread_store::DocumentStore;

/// Result of handling one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub body: ResponseBody,
    /// Whether the host document was written back
    pub written: bool,
}

/// What a command hands back to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// HTML fragment
    Markup(String),
    /// Raw comment fields for an edit form
    Source(CommentSource),
}

impl ResponseBody {
    pub fn content_type(&self) -> &'static str {
        match self {
            ResponseBody::Markup(_) => "text/html; charset=utf-8",
            ResponseBody::Source(_) => "application/json",
        }
    }

    pub fn as_markup(&self) -> Option<&str> {
        match self {
            ResponseBody::Markup(markup) => Some(markup),
            ResponseBody::Source(_) => None,
        }
    }

    /// Response text as sent to the client; sources are encoded as JSON
    pub fn into_payload(self) -> Result<String> {
        match self {
            ResponseBody::Markup(markup) => Ok(markup),
            ResponseBody::Source(source) => Ok(serde_json::to_string(&source)?),
        }
    }
}

/// Handles comment commands against documents in a `DocumentStore`
pub struct CommentService {
    documents: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    rich_text: Arc<dyn RichText>,
    clock: Arc<dyn Clock>,
    settings: EngineSettings,
}

impl CommentService {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        rich_text: Arc<dyn RichText>,
    ) -> Self {
        Self {
            documents,
            identity,
            rich_text,
            clock: Arc::new(SystemClock),
            settings: EngineSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Handle one command against the thread stored in `document`
    ///
    /// Failed commands never write. A rejected write-back is returned as an
    /// error and the change is lost; the caller may retry the whole request.
    pub fn handle(&self, document: &DocumentRef, command: CommentCommand) -> Result<CommandResponse> {
        let kind = command.kind();
        tracing::debug!("Handling '{}' on {}", kind, document);

        let raw = self.documents.fetch(document)?.unwrap_or_default();
        let mut thread = thread_store::decode(&raw);
        if self.settings.check_integrity {
            self.report_integrity(&thread, document);
        }

        let viewer = self.viewer();
        let body = self.apply(&mut thread, &command, &viewer, document)?;

        let written = if thread.is_dirty() {
            self.write_back(document, &thread, &raw, kind)?;
            true
        } else {
            false
        };

        Ok(CommandResponse { body, written })
    }

    /// Apply `command` to an already decoded thread and render the response
    ///
    /// New comments are attributed to `viewer`. Capability checks are left
    /// to the caller; the renderer only gates which actions are offered.
    pub fn apply(
        &self,
        thread: &mut Thread,
        command: &CommentCommand,
        viewer: &Viewer,
        context: &DocumentRef,
    ) -> Result<ResponseBody> {
        let renderer = ThreadRenderer::new(
            self.rich_text.as_ref(),
            &self.settings.messages,
            &self.settings.render,
        );

        let body = match command {
            CommentCommand::Add { text } => {
                let id = thread.add(text.as_str(), viewer.name.as_str(), self.clock.now());
                ResponseBody::Markup(renderer.render_comment(thread, &id, viewer, context)?)
            }
            CommentCommand::Reply { id, text } => {
                let id = thread.reply(id, text.as_str(), viewer.name.as_str(), self.clock.now())?;
                ResponseBody::Markup(renderer.render_comment(thread, &id, viewer, context)?)
            }
            CommentCommand::Edit { id, text } => {
                let id = thread.edit(id, text.as_str())?;
                ResponseBody::Markup(renderer.render_comment(thread, &id, viewer, context)?)
            }
            CommentCommand::Delete { id } => {
                let removed = thread.delete(id);
                tracing::debug!("Deleted {} comment(s) under {}", removed, id);
                if thread.is_empty() {
                    ResponseBody::Markup(renderer.no_comments())
                } else {
                    ResponseBody::Markup(String::new())
                }
            }
            CommentCommand::Source { id } => {
                let comment = thread
                    .get(id)
                    .ok_or_else(|| ModelError::UnknownComment(id.clone()))?;
                ResponseBody::Source(comment.source())
            }
            CommentCommand::View => ResponseBody::Markup(
                renderer.heading() + &renderer.render_thread(thread, viewer, context),
            ),
        };

        Ok(body)
    }

    fn viewer(&self) -> Viewer {
        match self.identity.current_viewer() {
            Ok(viewer) => viewer,
            Err(e) => {
                tracing::warn!("{}, continuing as anonymous viewer", e);
                Viewer::default()
            }
        }
    }

    fn report_integrity(&self, thread: &Thread, document: &DocumentRef) {
        for issue in thread.integrity_issues() {
            tracing::warn!("Comment thread on {} is inconsistent: {}", document, issue);
        }
    }

    fn write_back(
        &self,
        document: &DocumentRef,
        thread: &Thread,
        raw: &str,
        kind: CommandKind,
    ) -> Result<()> {
        let merged = thread_store::encode(thread, raw)?;
        let summary = self.settings.summaries.for_command(kind);
        self.documents.write(document, &merged, summary)?;
        tracing::debug!("Wrote {} comment(s) back to {}", thread.len(), document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedClock, StaticIdentity};
    use chrono::{TimeZone, Utc};
    use thread_model::CommentId;
    use thread_render::PlainText;
    use thread_store::MemoryDocumentStore;

    fn service(store: Arc<MemoryDocumentStore>, viewer: Viewer) -> CommentService {
        CommentService::new(store, Arc::new(StaticIdentity(viewer)), Arc::new(PlainText))
            .with_clock(Arc::new(FixedClock(Utc.timestamp_opt(1_700_000_000, 0).unwrap())))
    }

    #[test]
    fn test_apply_add_renders_new_comment() {
        let store = Arc::new(MemoryDocumentStore::new());
        let service = service(store, Viewer::member("alice"));
        let mut thread = Thread::new();
        let viewer = Viewer::member("alice");

        let body = service
            .apply(
                &mut thread,
                &CommentCommand::Add {
                    text: "Hello".to_string(),
                },
                &viewer,
                &DocumentRef::from("Talk:Page"),
            )
            .unwrap();

        let (id, comment) = thread.comments().first().unwrap();
        assert_eq!(comment.author(), "alice");
        assert_eq!(comment.timestamp().timestamp(), 1_700_000_000);
        assert!(body.as_markup().unwrap().contains(&format!("ajaxcomments-{}", id)));
        assert!(thread.is_dirty());
    }

    #[test]
    fn test_source_of_unknown_comment_fails() {
        let store = Arc::new(MemoryDocumentStore::new());
        let service = service(store, Viewer::member("alice"));
        let mut thread = Thread::new();

        let err = service
            .apply(
                &mut thread,
                &CommentCommand::Source {
                    id: CommentId::from("missing"),
                },
                &Viewer::member("alice"),
                &DocumentRef::from("Talk:Page"),
            )
            .unwrap_err();

        assert!(err.is_unknown_comment());
    }

    #[test]
    fn test_view_does_not_write() {
        let store = Arc::new(MemoryDocumentStore::new());
        let service = service(store.clone(), Viewer::anonymous("10.0.0.1"));
        let doc = DocumentRef::from("Talk:Empty");

        let response = service.handle(&doc, CommentCommand::View).unwrap();

        assert!(!response.written);
        assert_eq!(store.document_count(), 0);
        let markup = response.body.as_markup().unwrap();
        assert!(markup.starts_with("<h2>Comments</h2>"));
        assert!(markup.contains("ajaxcomments-none"));
    }

    #[test]
    fn test_source_payload_is_json() {
        let body = ResponseBody::Source(CommentSource {
            user: "alice".to_string(),
            date: 5,
            text: "Hi".to_string(),
        });
        assert_eq!(body.content_type(), "application/json");
        assert_eq!(
            body.into_payload().unwrap(),
            r#"{"user":"alice","date":5,"text":"Hi"}"#
        );
    }
}
