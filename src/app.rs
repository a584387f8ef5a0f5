use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::client::{QueryClient, QueryError, QueryReply};
use crate::state::{error_content, ConversationLog, Message};

pub type QueryTask = JoinHandle<Result<QueryReply, QueryError>>;

pub struct App {
    pub should_quit: bool,

    // Pending input
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Conversation
    pub log: ConversationLog,
    pub busy: bool,
    pub query_task: Option<QueryTask>,

    // Chat view
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for page scrolling
    pub follow_bottom: bool, // Pin the view to the newest line on next render

    // Animation state
    pub animation_frame: u8,

    pub client: QueryClient,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

impl App {
    pub fn new(client: QueryClient) -> Self {
        Self {
            should_quit: false,
            input: String::new(),
            cursor: 0,
            log: ConversationLog::new(),
            busy: false,
            query_task: None,
            chat_scroll: 0,
            chat_height: 0,
            follow_bottom: true,
            animation_frame: 0,
            client,
        }
    }

    /// Start a submission if one is allowed.
    ///
    /// Returns the raw text to send, or `None` when the input is blank or a
    /// request is already in flight. A rejected submission changes nothing.
    pub fn begin_submission(&mut self) -> Option<String> {
        if self.busy || self.input.trim().is_empty() {
            return None;
        }

        let text = self.input.clone();
        self.log.push(Message::user(text.clone()));
        self.busy = true;
        self.scroll_to_bottom();
        Some(text)
    }

    /// Submit the pending input, spawning the request in the background
    pub fn submit(&mut self) {
        let Some(text) = self.begin_submission() else {
            return;
        };

        info!(chars = text.chars().count(), "submitting query");
        let client = self.client.clone();
        self.query_task = Some(tokio::spawn(async move { client.query(&text).await }));
    }

    /// Record how a submission settled and return to the idle state
    pub fn apply_outcome(&mut self, outcome: Result<QueryReply, QueryError>) {
        match outcome {
            Ok(reply) => {
                self.log.push(Message::interpretation(reply.ai_understanding));
                self.log.push(Message::bot(reply.response));
            }
            Err(err) => {
                error!(error = %err, "query failed");
                self.log.push(Message::error(error_content(&err.to_string())));
            }
        }

        debug!(entries = self.log.len(), "query settled");
        self.busy = false;
        self.input.clear();
        self.cursor = 0;
        self.scroll_to_bottom();
    }

    /// Apply the in-flight request's result once it has finished
    pub async fn poll_query_task(&mut self) {
        let finished = self
            .query_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        if let Some(task) = self.query_task.take() {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(join_err) => Err(QueryError::Task(join_err.to_string())),
            };
            self.apply_outcome(outcome);
        }
    }

    /// Abort any in-flight request and stop the event loop
    pub fn quit(&mut self) {
        if let Some(task) = self.query_task.take() {
            task.abort();
        }
        self.should_quit = true;
    }

    // Input editing. The input is disabled while a request is in flight.

    pub fn insert_char(&mut self, c: char) {
        if self.busy {
            return;
        }
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.busy || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.remove(byte_pos);
    }

    pub fn delete_at_cursor(&mut self) {
        if self.busy {
            return;
        }
        if self.cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        if !self.busy {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    pub fn cursor_right(&mut self) {
        if !self.busy {
            self.cursor = (self.cursor + 1).min(self.input.chars().count());
        }
    }

    pub fn cursor_home(&mut self) {
        if !self.busy {
            self.cursor = 0;
        }
    }

    pub fn cursor_end(&mut self) {
        if !self.busy {
            self.cursor = self.input.chars().count();
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.follow_bottom = false;
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    /// Scrolling back down to the last line resumes following (see `ui::render_chat`)
    pub fn scroll_down(&mut self, lines: u16) {
        self.follow_bottom = false;
        self.chat_scroll = self.chat_scroll.saturating_add(lines);
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.busy {
            self.animation_frame = self.animation_frame.wrapping_add(1);
        }
    }

    /// Keep the newest entry (or the busy indicator) in view.
    /// The offset itself is computed at render time from the wrapped text.
    pub fn scroll_to_bottom(&mut self) {
        self.follow_bottom = true;
    }
}
