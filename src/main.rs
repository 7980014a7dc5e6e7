use clap::Parser;
use site_chat::Chatbot;
use site_chat::config::ChatbotConfig;
use site_chat::session::obtain_api_key;
use std::error::Error;
use std::io::{self, Write};

mod args;
use args::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            ::log::info!("Loading configuration from {}", path);
            ChatbotConfig::from_file(path)?
        }
        None => ChatbotConfig::default(),
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let Some(api_key) = obtain_api_key(args.api_key.clone(), &mut input, &mut output)? else {
        writeln!(output, "❌ Cannot proceed without API key.")?;
        return Ok(());
    };

    // Command-line flags override the configuration file
    let mut chatbot = Chatbot::new(api_key).with_config(config);
    if let Some(model) = args.model {
        chatbot = chatbot.with_model(model);
    }
    if let Some(base_url) = args.api_base_url {
        chatbot = chatbot.with_api_base_url(base_url);
    }
    if let Some(timeout) = args.timeout {
        chatbot = chatbot.with_fetch_timeout(timeout);
    }

    ::log::debug!("Effective configuration: {:?}", chatbot.config());

    let mut controller = chatbot.build(input, output)?;
    controller.run(args.url).await?;

    Ok(())
}
