use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Webhook endpoint that answers chat queries (e.g. an n8n workflow URL)
    #[arg(long, env = "WEBHOOK_URL", default_value = "http://localhost:5678/webhook-test/chat")]
    pub webhook_url: String,

    /// Display name for the assistant in the message list.
    #[arg(long, env = "ASSISTANT_NAME", default_value = "Factory Assistant")]
    pub assistant_name: String,

    /// Greeting shown as the first assistant message on startup. Empty disables it.
    #[arg(
        long,
        env = "WELCOME_MESSAGE",
        default_value = "Hello! Ask me about machine waste, downtime, or production forecasts."
    )]
    pub welcome_message: String,

    /// Example queries offered as one-keystroke chips until the first send.
    /// Comma-separated; empty disables the chips.
    #[arg(
        long,
        env = "EXAMPLE_QUERIES",
        value_delimiter = ',',
        default_value = "Which machine produced the most waste last week?,Forecast total waste for the next 7 days,Show recent downtime causes"
    )]
    pub example_queries: Vec<String>,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_webhook() {
        let args = Args::parse_from(["factory-chat"]);
        assert_eq!(args.webhook_url, "http://localhost:5678/webhook-test/chat");
        assert_eq!(args.example_queries.len(), 3);
    }

    #[test]
    fn example_queries_split_on_commas() {
        let args = Args::parse_from(["factory-chat", "--example-queries", "a,b"]);
        assert_eq!(args.example_queries, vec!["a".to_string(), "b".to_string()]);
    }
}
