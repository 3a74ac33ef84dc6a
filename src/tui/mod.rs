pub mod state;
pub mod view;

use crate::cli::Args;
use crate::models::chat::ChatResponse;
use crate::webhook::{ QueryBackend, WebhookClient };
use state::ChatState;

use crossterm::event::{ self, Event, KeyCode, KeyEventKind, KeyModifiers };
use crossterm::terminal::{
    disable_raw_mode,
    enable_raw_mode,
    EnterAlternateScreen,
    LeaveAlternateScreen,
};
use log::info;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::error::Error as StdError;
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

type BoxedError = Box<dyn StdError + Send + Sync>;
type Completion = Result<ChatResponse, BoxedError>;

pub async fn run(args: Args) -> Result<(), BoxedError> {
    let client = Arc::new(WebhookClient::new(args.webhook_url.clone()));
    info!("Chat client ready, endpoint: {}", client.endpoint());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = event_loop(&mut terminal, client, &args).await;

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    client: Arc<dyn QueryBackend>,
    args: &Args
) -> Result<(), BoxedError> {
    let mut chat = ChatState::new(args);
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();

    loop {
        terminal.draw(|f| view::render(f, &chat))?;

        // Apply settled requests before reading new input so the
        // composer unlocks as soon as the response lands.
        while let Ok(result) = rx.try_recv() {
            chat.on_completion(result);
        }

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.code == KeyCode::Esc
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL))
                {
                    break;
                }
                match key.code {
                    KeyCode::Enter => {
                        if let Some(query) = chat.submit() {
                            dispatch(&client, &tx, query);
                        }
                    }
                    KeyCode::Backspace => chat.backspace(),
                    KeyCode::Up => chat.scroll_up(1),
                    KeyCode::Down => chat.scroll_down(1),
                    KeyCode::PageUp => chat.scroll_up(10),
                    KeyCode::PageDown => chat.scroll_down(10),
                    KeyCode::Char(c) => {
                        // Digit keys double as example-query chips while
                        // the composer is still empty.
                        let chip = if chat.input().is_empty() {
                            c.to_digit(10)
                                .filter(|d| *d >= 1)
                                .and_then(|d| chat.submit_example(d as usize - 1))
                        } else {
                            None
                        };
                        match chip {
                            Some(query) => dispatch(&client, &tx, query),
                            None => chat.push_char(c),
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Spawn the single outstanding request. The task is infallible: it
/// reports success or failure over the channel and the controller does
/// the rest.
fn dispatch(
    client: &Arc<dyn QueryBackend>,
    tx: &mpsc::UnboundedSender<Completion>,
    query: String
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.query(&query).await;
        let _ = tx.send(result);
    });
}
