use crate::error::Error;
use crate::extractor::Extractor;
use crate::history::History;
use crate::responder::Responder;
use crate::results::ContentRecord;
use crate::utils::{looks_like_google_api_key, normalize_url};
use std::io::{BufRead, Write};
use std::ops::ControlFlow;

const RULE: &str = "============================================================";

/// A line of user input, resolved once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Info,
    /// Switch pages, optionally with the URL given inline
    NewUrl(Option<String>),
    Quit,
    Empty,
    Ask(String),
}

impl Command {
    /// Case-insensitive, whitespace-tolerant command matching
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let lowered = trimmed.to_lowercase();

        match lowered.as_str() {
            "" => return Command::Empty,
            "quit" | "exit" | "bye" | "q" => return Command::Quit,
            "help" => return Command::Help,
            "info" => return Command::Info,
            _ => {}
        }

        if let Some(rest) = strip_prefix_ignore_case(trimmed, "new url") {
            if rest.is_empty() {
                return Command::NewUrl(None);
            }
            if rest.starts_with(char::is_whitespace) {
                return Command::NewUrl(Some(rest.trim().to_string()));
            }
        }

        Command::Ask(trimmed.to_string())
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Read one line, replacing bytes that are not UTF-8
///
/// Returns `None` at end of input.
fn read_console_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut buf = Vec::new();
    if input.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// State of one chat: the current page and the conversation about it
#[derive(Debug, Clone)]
pub struct Session {
    pub record: ContentRecord,
    pub history: History,
}

impl Session {
    pub fn new(record: ContentRecord) -> Self {
        Self {
            record,
            history: History::new(),
        }
    }

    /// Move to a different page, starting a fresh conversation
    pub fn replace_record(&mut self, record: ContentRecord) {
        self.record = record;
        self.history.clear();
    }
}

/// Read the API key from the command line/environment or ask for it
///
/// Returns `None` when no key was given.
pub fn obtain_api_key<R: BufRead, W: Write>(
    configured: Option<String>,
    input: &mut R,
    output: &mut W,
) -> Result<Option<String>, Error> {
    if let Some(key) = configured.filter(|key| !key.trim().is_empty()) {
        writeln!(output, "✅ Using configured Google Gemini API key.")?;
        return Ok(Some(key.trim().to_string()));
    }

    writeln!(output, "🔑 Google Gemini API Key Required")?;
    writeln!(
        output,
        "You can get your API key from: https://makersuite.google.com/app/apikey"
    )?;
    writeln!(output, "Or set the GOOGLE_API_KEY environment variable.")?;
    writeln!(output)?;
    write!(output, "Please enter your Google Gemini API key: ")?;
    output.flush()?;

    let line = read_console_line(input)?.unwrap_or_default();
    let key = line.trim();
    if key.is_empty() {
        return Ok(None);
    }
    if !looks_like_google_api_key(key) {
        writeln!(output, "⚠️  Warning: Google API key typically starts with 'AI'")?;
    }

    Ok(Some(key.to_string()))
}

/// Drives setup and the interactive loop over any line-based console
pub struct SessionController<R, W> {
    extractor: Extractor,
    responder: Responder,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> SessionController<R, W> {
    pub fn new(extractor: Extractor, responder: Responder, input: R, output: W) -> Self {
        Self {
            extractor,
            responder,
            input,
            output,
        }
    }

    /// Give back the console, e.g. to inspect what was written
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Setup followed by the chat loop
    pub async fn run(&mut self, initial_url: Option<String>) -> Result<(), Error> {
        writeln!(self.output, "{}", RULE)?;
        writeln!(self.output, "🤖 Website Content Chatbot (Powered by Google Gemini)")?;
        writeln!(self.output, "{}", RULE)?;
        writeln!(
            self.output,
            "This chatbot can answer questions about any website content!"
        )?;

        match self.setup(initial_url).await? {
            Some(mut session) => self.chat_loop(&mut session).await,
            None => {
                writeln!(self.output, "❌ Cannot proceed without website URL.")?;
                Ok(())
            }
        }
    }

    /// Extract the first page, asking again until one succeeds
    ///
    /// Returns `None` if the user gives up (empty URL or end of input).
    pub async fn setup(&mut self, initial_url: Option<String>) -> Result<Option<Session>, Error> {
        let mut next_url = initial_url;

        loop {
            let url = match next_url.take() {
                Some(url) => url,
                None => match self.prompt_url()? {
                    Some(url) => url,
                    None => return Ok(None),
                },
            };

            writeln!(self.output, "\n📥 Extracting website content...")?;
            match self.extractor.extract(&url).await {
                Ok(record) => {
                    writeln!(self.output, "✅ Website content extracted successfully!")?;
                    writeln!(self.output, "📄 Title: {}", record.title)?;
                    writeln!(
                        self.output,
                        "📝 Content length: {} characters",
                        record.content_length()
                    )?;
                    writeln!(self.output, "🔗 Found {} links", record.links.len())?;
                    writeln!(self.output, "📋 Found {} headings", record.headings.len())?;
                    return Ok(Some(Session::new(record)));
                }
                Err(e) => {
                    writeln!(self.output, "{}", e.user_message())?;
                    writeln!(self.output, "Please try a different URL.")?;
                }
            }
        }
    }

    /// Read lines until quit or end of input
    pub async fn chat_loop(&mut self, session: &mut Session) -> Result<(), Error> {
        writeln!(self.output, "\n{}", RULE)?;
        writeln!(
            self.output,
            "💬 Chat Started! Type 'quit', 'exit', or 'bye' to end the conversation."
        )?;
        writeln!(self.output, "🌐 Current website: {}", session.record.url)?;
        writeln!(self.output, "{}\n", RULE)?;

        loop {
            write!(self.output, "You: ")?;
            self.output.flush()?;

            let Some(line) = read_console_line(&mut self.input)? else {
                ::log::debug!("End of input, leaving chat loop");
                self.say_goodbye()?;
                return Ok(());
            };

            let command = Command::parse(&line);
            ::log::trace!("Dispatching {:?}", command);
            if self.dispatch(session, command).await?.is_break() {
                return Ok(());
            }
        }
    }

    /// Carry out one command against the session
    pub async fn dispatch(
        &mut self,
        session: &mut Session,
        command: Command,
    ) -> Result<ControlFlow<()>, Error> {
        match command {
            Command::Quit => {
                self.say_goodbye()?;
                return Ok(ControlFlow::Break(()));
            }
            Command::Empty => {}
            Command::Help => self.show_help()?,
            Command::Info => self.show_info(session)?,
            Command::NewUrl(url) => self.change_website(session, url).await?,
            Command::Ask(question) => {
                write!(self.output, "\n🤖 Bot: ")?;
                self.output.flush()?;
                match self
                    .responder
                    .respond(&session.record, &mut session.history, &question)
                    .await
                {
                    Ok(answer) => writeln!(self.output, "{}", answer)?,
                    Err(e) => writeln!(self.output, "{}", e.user_message())?,
                }
                writeln!(self.output)?;
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn show_help(&mut self) -> Result<(), Error> {
        writeln!(self.output, "\n📖 Available Commands:")?;
        writeln!(self.output, "• Type any question about the website content")?;
        writeln!(self.output, "• 'help' - Show this help message")?;
        writeln!(self.output, "• 'info' - Show current website information")?;
        writeln!(
            self.output,
            "• 'new url [address]' - Change to a different website"
        )?;
        writeln!(self.output, "• 'quit', 'exit', 'bye' - End the conversation")?;
        writeln!(self.output)?;
        Ok(())
    }

    fn show_info(&mut self, session: &Session) -> Result<(), Error> {
        let record = &session.record;
        let description = if record.meta_description.is_empty() {
            "No meta description found"
        } else {
            record.meta_description.as_str()
        };

        writeln!(self.output, "\n📋 Current Website Information:")?;
        writeln!(self.output, "🌐 URL: {}", record.url)?;
        writeln!(self.output, "📄 Title: {}", record.title)?;
        writeln!(self.output, "📝 Description: {}", description)?;
        writeln!(self.output, "🔗 Links found: {}", record.links.len())?;
        writeln!(self.output, "📋 Headings found: {}", record.headings.len())?;
        writeln!(
            self.output,
            "💬 Messages this conversation: {}",
            session.history.len()
        )?;
        writeln!(self.output)?;
        Ok(())
    }

    async fn change_website(
        &mut self,
        session: &mut Session,
        inline_url: Option<String>,
    ) -> Result<(), Error> {
        writeln!(self.output, "\n🔄 Changing website...")?;
        let url = match inline_url {
            Some(url) => Some(url),
            None => self.prompt_url()?,
        };

        if let Some(url) = url {
            writeln!(self.output, "📥 Extracting new website content...")?;
            match self.extractor.extract(&url).await {
                Ok(record) => {
                    ::log::info!("Switched session to {}", record.url);
                    writeln!(self.output, "✅ Website changed successfully!")?;
                    writeln!(self.output, "📄 New title: {}", record.title)?;
                    session.replace_record(record);
                }
                Err(e) => {
                    writeln!(self.output, "{}", e.user_message())?;
                    writeln!(self.output, "❌ Failed to extract content from new website.")?;
                }
            }
        }
        writeln!(self.output)?;
        Ok(())
    }

    /// Ask for a URL until a well-formed one is given
    fn prompt_url(&mut self) -> Result<Option<String>, Error> {
        writeln!(self.output, "\n🌐 Website URL Required")?;
        writeln!(
            self.output,
            "Enter the URL of the website you want the chatbot to learn about."
        )?;
        writeln!(self.output, "Example: https://www.example.com")?;
        writeln!(self.output)?;

        loop {
            write!(self.output, "Enter website URL: ")?;
            self.output.flush()?;

            let line = read_console_line(&mut self.input)?.unwrap_or_default();
            if line.trim().is_empty() {
                return Ok(None);
            }

            match normalize_url(&line) {
                Ok(url) => return Ok(Some(url.to_string())),
                Err(e) => writeln!(self.output, "{}", e.user_message())?,
            }
        }
    }

    fn say_goodbye(&mut self) -> Result<(), Error> {
        writeln!(
            self.output,
            "\n👋 Goodbye! Thanks for using the Website Content Chatbot!"
        )?;
        Ok(())
    }
}
