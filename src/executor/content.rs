//! Rendering of MCP tool results to plain text.
//!
//! `Content` in rmcp is `Annotated<RawContent>` which derefs to
//! `RawContent`. Tool results can mix text with images and resource
//! references; everything non-textual renders to a placeholder so the
//! result can be stored as one `tool`-role message.

/// One item of a tool result, reduced to what the chat transcript can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolContent {
    Text { text: String },
    Image { mime_type: String },
    Resource { uri: String, name: Option<String> },
}

/// Convert an rmcp `Content` item to a [`ToolContent`].
pub fn from_rmcp_content(content: &rmcp::model::Content) -> ToolContent {
    use rmcp::model::RawContent;
    match &content.raw {
        RawContent::Text(text_content) => ToolContent::Text {
            text: text_content.text.clone(),
        },
        RawContent::Image(image_content) => ToolContent::Image {
            mime_type: image_content.mime_type.clone(),
        },
        RawContent::Audio(audio) => ToolContent::Image {
            mime_type: audio.mime_type.clone(),
        },
        RawContent::Resource(embedded) => {
            let uri = match &embedded.resource {
                rmcp::model::ResourceContents::TextResourceContents { uri, .. }
                | rmcp::model::ResourceContents::BlobResourceContents { uri, .. } => uri.clone(),
            };
            ToolContent::Resource { uri, name: None }
        }
        RawContent::ResourceLink(link) => ToolContent::Resource {
            uri: link.uri.clone(),
            name: Some(link.name.clone()),
        },
    }
}

/// Render a tool result to the text stored in history. Text items are
/// concatenated with newlines; media and resources become placeholders.
pub fn render_contents(contents: &[rmcp::model::Content]) -> String {
    contents
        .iter()
        .map(from_rmcp_content)
        .map(|item| match item {
            ToolContent::Text { text } => text,
            ToolContent::Image { mime_type } => format!("[media: {mime_type}]"),
            ToolContent::Resource { uri, name } => match name {
                Some(name) => format!("[resource: {name} ({uri})]"),
                None => format!("[resource: {uri}]"),
            },
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{ToolContent, from_rmcp_content, render_contents};

    #[test]
    fn text_content_maps_to_text() {
        let content = rmcp::model::Content::text("hello world");
        assert_eq!(
            from_rmcp_content(&content),
            ToolContent::Text {
                text: "hello world".to_string()
            }
        );
    }

    #[test]
    fn image_content_maps_to_media_placeholder() {
        let content = rmcp::model::Content::image("aGVsbG8=", "image/png");
        assert_eq!(render_contents(&[content]), "[media: image/png]");
    }

    #[test]
    fn embedded_resource_renders_uri() {
        let resource = rmcp::model::ResourceContents::text("notes", "file:///notes.txt");
        let content = rmcp::model::Content::resource(resource);
        assert_eq!(render_contents(&[content]), "[resource: file:///notes.txt]");
    }

    #[test]
    fn mixed_items_join_with_newlines() {
        let items = vec![
            rmcp::model::Content::text("Result:"),
            rmcp::model::Content::image("abc", "image/jpeg"),
            rmcp::model::Content::text("done"),
        ];
        assert_eq!(
            render_contents(&items),
            "Result:\n[media: image/jpeg]\ndone"
        );
    }

    #[test]
    fn empty_result_renders_empty_string() {
        assert_eq!(render_contents(&[]), "");
    }
}
