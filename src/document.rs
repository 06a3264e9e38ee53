//! The uniform text unit handed to the summarizer, whatever the source.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn video(title: &str, uploader: &str, body: &str) -> Self {
        Self {
            text: format!("Video Title: {title}\nUploader: {uploader}\n\nContent:\n{body}"),
        }
    }

    pub fn page(title: &str, url: &str, content: &str) -> Self {
        Self {
            text: format!("Title: {title}\nURL: {url}\n\nContent:\n{content}"),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
