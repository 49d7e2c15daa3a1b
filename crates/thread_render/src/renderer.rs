//! Thread renderer
//!
//! Produces the markup for one comment (with all of its replies nested
//! inside it) or for the whole thread. Markup shape per comment:
//!
//! ```text
//! <div class="ajaxcomment" id="ajaxcomments-{id}">
//! <div class="ajaxcomment-sig">{signature}</div>
//! <div class="ajaxcomment-text">{body}</div>
//! <ul class="ajaxcomment-links">{actions}</ul>{replies}</div>
//! ```
//!
//! The actions list is left out entirely for viewers who cannot comment.

use crate::{escape_html, Messages, RenderError, RenderOptions, Result, RichText};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use thread_model::{Comment, CommentId, DocumentRef, Thread, Viewer};

/// Renders threads for one document
pub struct ThreadRenderer<'a> {
    rich_text: &'a dyn RichText,
    messages: &'a Messages,
    options: &'a RenderOptions,
}

impl<'a> ThreadRenderer<'a> {
    pub fn new(
        rich_text: &'a dyn RichText,
        messages: &'a Messages,
        options: &'a RenderOptions,
    ) -> Self {
        Self {
            rich_text,
            messages,
            options,
        }
    }

    /// Heading shown above the full thread view
    pub fn heading(&self) -> String {
        format!("<h2>{}</h2>\n", escape_html(&self.messages.heading))
    }

    /// Placeholder shown when a thread has no comments
    pub fn no_comments(&self) -> String {
        format!(
            "<i id=\"ajaxcomments-none\">{}</i>",
            escape_html(&self.messages.none)
        )
    }

    /// Render every top-level comment, most recently added first
    ///
    /// Viewers who may comment get an add link above the list; everyone else
    /// gets the must-log-in notice instead.
    pub fn render_thread(&self, thread: &Thread, viewer: &Viewer, context: &DocumentRef) -> String {
        let mut comments = String::new();
        for id in thread.roots_newest_first() {
            comments.push_str(&self.subtree(thread, id, viewer, context));
        }
        if comments.is_empty() {
            comments = format!("{}<br />", self.no_comments());
        }

        let header = if viewer.can_author {
            format!(
                "<ul class=\"ajaxcomment-links\"><li id=\"ajaxcomment-add\">\
                 <a href=\"javascript:ajaxcomment_add()\">{}</a></li>\n</ul>\n",
                escape_html(&self.messages.add)
            )
        } else {
            format!(
                "<i id=\"ajaxcomments-anon\">{}</i><br />",
                escape_html(&self.messages.anonymous)
            )
        };

        header + &comments
    }

    /// Render one comment with all of its replies
    pub fn render_comment(
        &self,
        thread: &Thread,
        id: &CommentId,
        viewer: &Viewer,
        context: &DocumentRef,
    ) -> Result<String> {
        if !thread.contains(id) {
            return Err(RenderError::UnknownComment(id.clone()));
        }
        Ok(self.subtree(thread, id, viewer, context))
    }

    /// Markup for `root` and its descendants
    ///
    /// Replies are rendered before their parent using an explicit stack, so
    /// deep threads do not grow the call stack. Replies keep their stored
    /// order, which is already newest first. Unknown reply ids are skipped
    /// and a comment reachable twice is only rendered once.
    fn subtree(&self, thread: &Thread, root: &CommentId, viewer: &Viewer, context: &DocumentRef) -> String {
        let mut rendered: HashMap<&CommentId, String> = HashMap::new();
        let mut seen = HashSet::new();
        let mut stack = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            let Some(comment) = thread.get(id) else {
                continue;
            };
            if expanded {
                let replies: String = comment
                    .replies()
                    .iter()
                    .filter_map(|reply| rendered.remove(reply))
                    .collect();
                let markup = self.single(id, comment, &replies, viewer, context);
                rendered.insert(id, markup);
                continue;
            }
            if !seen.insert(id) {
                continue;
            }
            stack.push((id, true));
            stack.extend(comment.replies().iter().map(|reply| (reply, false)));
        }

        rendered.remove(root).unwrap_or_default()
    }

    fn single(
        &self,
        id: &CommentId,
        comment: &Comment,
        replies: &str,
        viewer: &Viewer,
        context: &DocumentRef,
    ) -> String {
        let id = escape_html(id.as_str());
        let mut html = format!(
            "<div class=\"ajaxcomment\" id=\"ajaxcomments-{id}\">\n\
             <div class=\"ajaxcomment-sig\">{}</div>\n\
             <div class=\"ajaxcomment-text\">{}</div>\n",
            self.signature(comment),
            self.body(comment, context),
        );

        if viewer.can_reply() {
            html.push_str("<ul class=\"ajaxcomment-links\">");
            html.push_str(&self.action("reply", &id, &self.messages.reply));
            if viewer.can_modify(comment) {
                html.push_str(&self.action("edit", &id, &self.messages.edit));
                html.push_str(&self.action("del", &id, &self.messages.delete));
            }
            html.push_str("</ul>");
        }

        html.push_str(replies);
        html.push_str("</div>\n");
        html
    }

    fn action(&self, name: &str, id: &str, label: &str) -> String {
        format!(
            "<li class=\"ajaxcomment-{name}\"><a href=\"javascript:ajaxcomment_{name}('{id}')\">{}</a></li>\n",
            escape_html(label)
        )
    }

    fn signature(&self, comment: &Comment) -> String {
        self.messages
            .signature
            .replace("{date}", &escape_html(&self.format_date(comment.timestamp())))
            .replace("{author}", &escape_html(comment.author()))
    }

    fn format_date(&self, timestamp: DateTime<Utc>) -> String {
        let mut out = String::new();
        if write!(out, "{}", timestamp.format(&self.options.date_format)).is_err() {
            tracing::warn!(
                "Invalid date format {:?}, falling back to RFC 3339",
                self.options.date_format
            );
            return timestamp.to_rfc3339();
        }
        out
    }

    fn body(&self, comment: &Comment, context: &DocumentRef) -> String {
        match self.rich_text.render(comment.body(), context) {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!("Rendering comment body as plain text: {}", e);
                escape_html(comment.body())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlainText;
    use chrono::TimeZone;

    struct FailingText;

    impl RichText for FailingText {
        fn render(&self, _body: &str, _context: &DocumentRef) -> Result<String> {
            Err(RenderError::Transform("parser exploded".to_string()))
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn context() -> DocumentRef {
        DocumentRef::from("Talk:Main Page")
    }

    fn render_with<'a>(
        rich_text: &'a dyn RichText,
        messages: &'a Messages,
        options: &'a RenderOptions,
    ) -> ThreadRenderer<'a> {
        ThreadRenderer::new(rich_text, messages, options)
    }

    #[test]
    fn test_empty_thread_shows_placeholder_and_add_link() {
        let (messages, options) = (Messages::default(), RenderOptions::default());
        let renderer = render_with(&PlainText, &messages, &options);

        let html = renderer.render_thread(&Thread::new(), &Viewer::member("Alice"), &context());

        assert!(html.contains("id=\"ajaxcomment-add\""));
        assert!(html.contains("<i id=\"ajaxcomments-none\">There are no comments on this page.</i><br />"));
    }

    #[test]
    fn test_anonymous_sees_notice_and_existing_comments() {
        let (messages, options) = (Messages::default(), RenderOptions::default());
        let renderer = render_with(&PlainText, &messages, &options);
        let mut thread = Thread::new();
        let root = thread.add("visible", "Alice", at(0));
        thread.reply(&root, "nested reply", "Bob", at(1)).unwrap();

        let html = renderer.render_thread(&thread, &Viewer::anonymous("10.0.0.1"), &context());

        assert!(html.starts_with("<i id=\"ajaxcomments-anon\">"));
        assert!(!html.contains("ajaxcomment-add"));
        assert!(!html.contains("ajaxcomment-links"));
        assert!(html.contains("visible"));
        assert!(html.contains("nested reply"));
    }

    #[test]
    fn test_newest_root_rendered_first() {
        let (messages, options) = (Messages::default(), RenderOptions::default());
        let renderer = render_with(&PlainText, &messages, &options);
        let mut thread = Thread::new();
        let x = thread.add("x", "Alice", at(0));
        let y = thread.add("y", "Alice", at(0));

        let html = renderer.render_thread(&thread, &Viewer::member("Alice"), &context());

        let x_pos = html.find(&format!("ajaxcomments-{x}")).unwrap();
        let y_pos = html.find(&format!("ajaxcomments-{y}")).unwrap();
        assert!(y_pos < x_pos);
    }

    #[test]
    fn test_replies_nest_inside_parent_newest_first() {
        let (messages, options) = (Messages::default(), RenderOptions::default());
        let renderer = render_with(&PlainText, &messages, &options);
        let mut thread = Thread::new();
        let root = thread.add("root", "Alice", at(0));
        let first = thread.reply(&root, "first", "Bob", at(1)).unwrap();
        let second = thread.reply(&root, "second", "Carol", at(2)).unwrap();

        let html = renderer
            .render_comment(&thread, &root, &Viewer::member("Dave"), &context())
            .unwrap();

        let first_pos = html.find(&format!("ajaxcomments-{first}")).unwrap();
        let second_pos = html.find(&format!("ajaxcomments-{second}")).unwrap();
        assert!(second_pos < first_pos);
        assert!(html.starts_with(&format!("<div class=\"ajaxcomment\" id=\"ajaxcomments-{root}\">")));
        assert!(html.ends_with("</div>\n</div>\n"));
    }

    #[test]
    fn test_action_gating() {
        let (messages, options) = (Messages::default(), RenderOptions::default());
        let renderer = render_with(&PlainText, &messages, &options);
        let mut thread = Thread::new();
        let id = thread.add("mine", "Alice", at(0));

        let own = renderer
            .render_comment(&thread, &id, &Viewer::member("Alice"), &context())
            .unwrap();
        assert!(own.contains("ajaxcomment_reply("));
        assert!(own.contains("ajaxcomment_edit("));
        assert!(own.contains("ajaxcomment_del("));

        let other = renderer
            .render_comment(&thread, &id, &Viewer::member("Bob"), &context())
            .unwrap();
        assert!(other.contains("ajaxcomment_reply("));
        assert!(!other.contains("ajaxcomment_edit("));

        thread.reply(&id, "me again", "Alice", at(1)).unwrap();
        let root_only = |html: &str| html[..html.find("</ul>").unwrap()].to_string();

        let own_after = renderer
            .render_comment(&thread, &id, &Viewer::member("Alice"), &context())
            .unwrap();
        assert!(!root_only(&own_after).contains("ajaxcomment_edit("));
        assert!(!root_only(&own_after).contains("ajaxcomment_del("));

        let moderator = renderer
            .render_comment(&thread, &id, &Viewer::moderator("Mod"), &context())
            .unwrap();
        assert!(root_only(&moderator).contains("ajaxcomment_edit("));
        assert!(root_only(&moderator).contains("ajaxcomment_del("));
    }

    #[test]
    fn test_signature_and_escaping() {
        let messages = Messages::default();
        let options = RenderOptions {
            date_format: "%Y-%m-%d".to_string(),
        };
        let renderer = render_with(&PlainText, &messages, &options);
        let mut thread = Thread::new();
        let id = thread.add("<script>", "<Eve>", at(1_340_668_800));

        let html = renderer
            .render_comment(&thread, &id, &Viewer::anonymous(""), &context())
            .unwrap();

        assert!(html.contains("Posted by &lt;Eve&gt; at 2012-06-26"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_invalid_date_format_falls_back() {
        let messages = Messages::default();
        let options = RenderOptions {
            date_format: "%Q broken".to_string(),
        };
        let renderer = render_with(&PlainText, &messages, &options);
        let mut thread = Thread::new();
        let id = thread.add("hi", "Alice", at(0));

        let html = renderer
            .render_comment(&thread, &id, &Viewer::member("Alice"), &context())
            .unwrap();

        assert!(html.contains("1970-01-01T00:00:00+00:00"));
    }

    #[test]
    fn test_transform_failure_degrades_to_escaped_body() {
        let (messages, options) = (Messages::default(), RenderOptions::default());
        let renderer = render_with(&FailingText, &messages, &options);
        let mut thread = Thread::new();
        thread.add("a < b", "Alice", at(0));
        thread.add("second", "Bob", at(0));

        let html = renderer.render_thread(&thread, &Viewer::member("Alice"), &context());

        assert!(html.contains("<div class=\"ajaxcomment-text\">a &lt; b</div>"));
        assert!(html.contains("<div class=\"ajaxcomment-text\">second</div>"));
    }

    #[test]
    fn test_unknown_comment_is_an_error() {
        let (messages, options) = (Messages::default(), RenderOptions::default());
        let renderer = render_with(&PlainText, &messages, &options);
        let missing = CommentId::from("missing");

        let err = renderer
            .render_comment(&Thread::new(), &missing, &Viewer::member("A"), &context())
            .unwrap_err();

        assert_eq!(err, RenderError::UnknownComment(missing));
    }

    #[test]
    fn test_deep_thread_renders_without_recursion() {
        let (messages, options) = (Messages::default(), RenderOptions::default());
        let renderer = render_with(&PlainText, &messages, &options);
        let mut thread = Thread::new();
        let root = thread.add("0", "Alice", at(0));
        let mut tip = root.clone();
        for i in 1..1_000 {
            tip = thread.reply(&tip, i.to_string(), "Alice", at(0)).unwrap();
        }

        let html = renderer
            .render_comment(&thread, &root, &Viewer::anonymous(""), &context())
            .unwrap();

        assert_eq!(html.matches("class=\"ajaxcomment\"").count(), 1_000);
    }
}
