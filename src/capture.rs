//! Input capture: the single not-yet-submitted user input.
//!
//! The pending input is either typed text or a selected image, never both.
//! Selecting an image clears any typed text and typing clears any selected
//! image. Submitting hands the input over and resets to empty.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::conversation::UserInput;

/// Command prefix that attaches an image instead of sending text.
pub const IMAGE_COMMAND: &str = "/image ";

/// An image loaded into memory, ready to be uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageHandle {
    /// File name sent with the upload and shown in the conversation.
    pub file_name: String,
    /// MIME type guessed from the file extension.
    pub mime: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHandle")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Errors that can occur when loading an image from disk.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0} is empty")]
    Empty(PathBuf),
}

impl ImageHandle {
    /// Create a handle from in-memory bytes, guessing the MIME type from the name.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    /// Load an image file. A leading `~/` is expanded to the home directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ImageLoadError> {
        let path = expand_home(path.as_ref());
        let bytes = std::fs::read(&path).map_err(|source| ImageLoadError::Read {
            path: path.clone(),
            source,
        })?;

        if bytes.is_empty() {
            return Err(ImageLoadError::Empty(path));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        tracing::info!(file = %file_name, bytes = bytes.len(), "Image loaded");
        Ok(Self::from_bytes(file_name, bytes))
    }

    /// Size of the image in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the image has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

/// What the pending input currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingState {
    Empty,
    TextEntered,
    ImageSelected,
}

/// A submitted input, handed to the conversation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Text(String),
    Image(ImageHandle),
}

impl Submission {
    /// The display record kept in the conversation log.
    pub fn user_input(&self) -> UserInput {
        match self {
            Submission::Text(text) => UserInput::Text(text.clone()),
            Submission::Image(image) => UserInput::Image {
                file_name: image.file_name.clone(),
                byte_len: image.len(),
            },
        }
    }
}

/// Pending input state with a character-indexed cursor.
#[derive(Debug, Default)]
pub struct InputCapture {
    text: String,
    /// Cursor position, in characters
    cursor: usize,
    image: Option<ImageHandle>,
}

impl InputCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current typed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Currently selected image, if any.
    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    pub fn state(&self) -> PendingState {
        if self.image.is_some() {
            PendingState::ImageSelected
        } else if self.text.trim().is_empty() {
            PendingState::Empty
        } else {
            PendingState::TextEntered
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state() == PendingState::Empty
    }

    /// Replace the typed text. Clears any selected image.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.image = None;
        self.text = text.into();
        self.cursor = self.text.chars().count();
    }

    /// Select an image. Clears any typed text.
    pub fn set_image(&mut self, image: ImageHandle) {
        self.clear_text();
        self.image = Some(image);
    }

    /// Drop the selected image without submitting.
    pub fn remove_image(&mut self) -> Option<ImageHandle> {
        self.image.take()
    }

    /// Insert a character at the cursor. Clears any selected image.
    pub fn handle_char(&mut self, c: char) {
        self.image = None;
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.text.remove(at);
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.text.chars().count() {
            self.cursor += 1;
        }
    }

    /// The path argument if the typed text is an `/image <path>` command.
    pub fn image_command(&self) -> Option<&str> {
        self.text
            .trim_start()
            .strip_prefix(IMAGE_COMMAND)
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }

    /// Hand over the pending input and reset to empty.
    ///
    /// Returns `None` (and changes nothing) when there is neither text nor an
    /// image. An image always wins over text.
    pub fn submit(&mut self) -> Option<Submission> {
        if let Some(image) = self.image.take() {
            self.clear_text();
            return Some(Submission::Image(image));
        }

        let text = self.text.trim();
        if text.is_empty() {
            return None;
        }

        let submission = Submission::Text(text.to_string());
        self.clear_text();
        Some(submission)
    }

    fn clear_text(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> ImageHandle {
        ImageHandle::from_bytes("page.jpg", vec![0xFF, 0xD8, 0xFF])
    }

    #[test]
    fn test_from_bytes_guesses_mime() {
        assert_eq!(sample_image().mime, "image/jpeg");
        assert_eq!(ImageHandle::from_bytes("scan.png", vec![1]).mime, "image/png");
        assert_eq!(
            ImageHandle::from_bytes("noext", vec![1]).mime,
            "application/octet-stream"
        );
    }

    #[test]
    fn test_debug_hides_bytes() {
        let debug = format!("{:?}", sample_image());
        assert!(debug.contains("page.jpg"));
        assert!(debug.contains("len: 3"));
    }

    #[test]
    fn test_handle_char_unicode_cursor() {
        let mut capture = InputCapture::new();
        for c in "héllo".chars() {
            capture.handle_char(c);
        }
        capture.move_cursor_left();
        capture.move_cursor_left();
        capture.handle_backspace();
        assert_eq!(capture.text(), "hélo");
        assert_eq!(capture.cursor(), 2);
    }

    #[test]
    fn test_cursor_bounds() {
        let mut capture = InputCapture::new();
        capture.move_cursor_left();
        assert_eq!(capture.cursor(), 0);
        capture.set_text("ab");
        capture.move_cursor_right();
        assert_eq!(capture.cursor(), 2);
    }

    #[test]
    fn test_typing_clears_image() {
        let mut capture = InputCapture::new();
        capture.set_image(sample_image());
        capture.handle_char('x');
        assert!(capture.image().is_none());
        assert_eq!(capture.state(), PendingState::TextEntered);
    }

    #[test]
    fn test_image_command() {
        let mut capture = InputCapture::new();
        capture.set_text("/image ~/scans/page.jpg ");
        assert_eq!(capture.image_command(), Some("~/scans/page.jpg"));

        capture.set_text("/image   ");
        assert_eq!(capture.image_command(), None);

        capture.set_text("an image of a whale");
        assert_eq!(capture.image_command(), None);
    }

    #[test]
    fn test_submission_user_input() {
        let input = Submission::Image(sample_image()).user_input();
        assert_eq!(
            input,
            UserInput::Image {
                file_name: "page.jpg".to_string(),
                byte_len: 3
            }
        );
    }
}
