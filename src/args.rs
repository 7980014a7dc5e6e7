use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "site-chat")]
#[command(about = "Chat with an LLM about the content of a web page")]
#[command(version)]
pub struct Args {
    /// Website URL to load (prompted for when omitted)
    pub url: Option<String>,

    /// Google Gemini API key (prompted for when omitted)
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model identifier
    #[arg(long, env = "SITE_CHAT_MODEL")]
    pub model: Option<String>,

    /// Base URL of the Gemini API
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Page fetch timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}
