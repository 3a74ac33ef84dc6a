use crate::cli::Args;
use crate::models::chat::{ ChatResponse, Message, Role };
use crate::render;

use log::{ error, info };
use std::error::Error as StdError;

/// The two states of the input surface. While a request is in flight
/// the composer is locked, which is also what guarantees at most one
/// outstanding request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputState {
    Idle,
    Sending,
}

pub const ERROR_MESSAGE: &str =
    "Sorry, I encountered an error processing your request. \
     Please check that the webhook is reachable and try again.";

/// Owns the message list and the composer. Pure state: the event loop
/// feeds it key presses and request completions, the view reads it.
pub struct ChatState {
    pub assistant_name: String,
    messages: Vec<Message>,
    input: String,
    input_state: InputState,
    loading_id: Option<String>,
    example_queries: Vec<String>,
    examples_visible: bool,
    scroll_from_bottom: u16,
}

impl ChatState {
    pub fn new(args: &Args) -> Self {
        let mut messages = Vec::new();
        if !args.welcome_message.is_empty() {
            messages.push(Message::new(
                Role::Assistant,
                args.welcome_message.clone(),
                render::now_time(),
            ));
        }
        let example_queries: Vec<String> = args.example_queries
            .iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();
        Self {
            assistant_name: args.assistant_name.clone(),
            messages,
            input: String::new(),
            input_state: InputState::Idle,
            loading_id: None,
            examples_visible: !example_queries.is_empty(),
            example_queries,
            scroll_from_bottom: 0,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_sending(&self) -> bool {
        self.input_state == InputState::Sending
    }

    /// Example-query chips, shown until the first submission.
    pub fn example_queries(&self) -> Option<&[String]> {
        if self.examples_visible {
            Some(&self.example_queries)
        } else {
            None
        }
    }

    pub fn push_char(&mut self, c: char) {
        if self.input_state == InputState::Idle {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.input_state == InputState::Idle {
            self.input.pop();
        }
    }

    /// Submit the composer contents. Returns the query to send, or None
    /// when nothing should happen: empty/whitespace input and
    /// already-in-flight are both silently ignored.
    pub fn submit(&mut self) -> Option<String> {
        if self.input_state == InputState::Sending {
            return None;
        }
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return None;
        }

        self.messages.push(Message::new(Role::User, text.clone(), render::now_time()));
        self.input.clear();
        self.examples_visible = false;
        self.input_state = InputState::Sending;

        let placeholder = Message::loading_placeholder(render::now_time());
        self.loading_id = Some(placeholder.id.clone());
        self.messages.push(placeholder);
        self.scroll_from_bottom = 0;

        Some(text)
    }

    /// Submit the nth example chip as if the user had typed it.
    pub fn submit_example(&mut self, idx: usize) -> Option<String> {
        if self.input_state == InputState::Sending || !self.examples_visible {
            return None;
        }
        let query = self.example_queries.get(idx)?.clone();
        self.input = query;
        self.submit()
    }

    /// Apply the outcome of the in-flight request. Both arms remove the
    /// loading placeholder and unlock the composer, so the input surface
    /// always returns to Idle.
    pub fn on_completion(
        &mut self,
        result: Result<ChatResponse, Box<dyn StdError + Send + Sync>>
    ) {
        self.remove_loading_placeholder();
        match result {
            Ok(resp) => {
                info!("Webhook responded");
                self.messages.push(Message::from_response(resp, render::now_time()));
            }
            Err(e) => {
                error!("Webhook request failed: {}", e);
                self.messages.push(Message::new(
                    Role::SystemError,
                    ERROR_MESSAGE,
                    render::now_time(),
                ));
            }
        }
        self.input_state = InputState::Idle;
        self.scroll_from_bottom = 0;
    }

    fn remove_loading_placeholder(&mut self) {
        if let Some(id) = self.loading_id.take() {
            self.messages.retain(|m| m.id != id);
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    pub fn scroll_from_bottom(&self) -> u16 {
        self.scroll_from_bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_args() -> Args {
        use clap::Parser;
        Args::parse_from([
            "factory-chat",
            "--welcome-message", "",
            "--example-queries", "q one,q two",
        ])
    }

    fn state() -> ChatState {
        ChatState::new(&test_args())
    }

    fn roles(state: &ChatState) -> Vec<Role> {
        state.messages().iter().map(|m| m.role).collect()
    }

    #[test]
    fn empty_input_is_ignored() {
        let mut s = state();
        assert_eq!(s.submit(), None);
        assert!(s.messages().is_empty());
        assert!(!s.is_sending());
    }

    #[test]
    fn whitespace_input_is_ignored() {
        let mut s = state();
        for c in "   \t ".chars() {
            s.push_char(c);
        }
        assert_eq!(s.submit(), None);
        assert!(s.messages().is_empty());
    }

    #[test]
    fn submit_appends_user_message_and_placeholder() {
        let mut s = state();
        for c in "status of M1".chars() {
            s.push_char(c);
        }
        assert_eq!(s.submit(), Some("status of M1".to_string()));
        assert!(s.is_sending());
        assert_eq!(s.input(), "");
        assert_eq!(roles(&s), vec![Role::User, Role::Assistant]);
        assert!(s.messages()[1].loading);
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let mut s = state();
        s.push_char('a');
        assert!(s.submit().is_some());
        for c in "another".chars() {
            s.push_char(c);
        }
        assert_eq!(s.submit(), None);
        // only the first user message and its placeholder exist
        assert_eq!(s.messages().len(), 2);
    }

    #[test]
    fn typing_is_locked_while_sending() {
        let mut s = state();
        s.push_char('a');
        s.submit().unwrap();
        s.push_char('x');
        s.backspace();
        assert_eq!(s.input(), "");
    }

    #[test]
    fn success_replaces_placeholder_with_assistant_message() {
        let mut s = state();
        s.push_char('a');
        s.submit().unwrap();
        s.on_completion(Ok(ChatResponse {
            answer: Some("**42kg** total".into()),
            ..Default::default()
        }));
        assert!(!s.is_sending());
        assert_eq!(roles(&s), vec![Role::User, Role::Assistant]);
        assert!(!s.messages()[1].loading);
        assert_eq!(s.messages()[1].text, "**42kg** total");
    }

    #[test]
    fn failure_appends_exactly_one_error_and_unlocks_input() {
        let mut s = state();
        s.push_char('a');
        s.submit().unwrap();
        s.on_completion(Err("connection refused".into()));
        assert!(!s.is_sending());
        assert_eq!(roles(&s), vec![Role::User, Role::SystemError]);
        assert_eq!(s.messages()[1].text, ERROR_MESSAGE);
        // placeholder is gone and input works again
        assert!(s.messages().iter().all(|m| !m.loading));
        s.push_char('b');
        assert_eq!(s.input(), "b");
    }

    #[test]
    fn example_chips_hide_after_first_submission() {
        let mut s = state();
        assert_eq!(s.example_queries().map(<[String]>::len), Some(2));
        s.push_char('a');
        s.submit().unwrap();
        assert_eq!(s.example_queries(), None);
        s.on_completion(Ok(ChatResponse::default()));
        assert_eq!(s.example_queries(), None);
    }

    #[test]
    fn example_chip_submits_its_canned_text() {
        let mut s = state();
        assert_eq!(s.submit_example(1), Some("q two".to_string()));
        assert_eq!(s.messages()[0].text, "q two");
    }

    #[test]
    fn example_chip_out_of_range_is_ignored() {
        let mut s = state();
        assert_eq!(s.submit_example(5), None);
        assert!(s.messages().is_empty());
    }

    #[test]
    fn welcome_message_seeds_the_list() {
        use clap::Parser;
        let args = Args::parse_from(["factory-chat", "--welcome-message", "Hi there"]);
        let s = ChatState::new(&args);
        assert_eq!(roles(&s), vec![Role::Assistant]);
        assert_eq!(s.messages()[0].text, "Hi there");
    }
}
