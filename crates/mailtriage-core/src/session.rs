//! The interactive triage session.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::batch::{Batch, Window, cyclic};
use crate::config::Prefs;
use crate::dispatch::{Defaults, Invocation, help_text, parse_line};
use crate::normalize::normalize;
use crate::render::{BATCH_COLUMNS, ColumnWidths, ORDER_COLUMNS, TableRenderer};
use crate::service::Mailbox;
use crate::triage::{Classifier, SenderRules};
use crate::{Error, Result};

const COMMAND_PROMPT: &str = "command: ";
const CONFIRM_PROMPT: &str = "Delete this batch? ";

/// Whether the session keeps reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Back to the command prompt.
    Continue,
    /// The operator asked to leave.
    Quit,
}

/// Settings fixed for the whole session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Sender rules.
    pub rules: SenderRules,
    /// Show and delete only probable spam unless `-all` is given.
    pub show_spam_only: bool,
    /// Default `cycle -size`.
    pub batch_size: u32,
    /// Column width overrides.
    pub column_widths: HashMap<String, usize>,
    /// Boolean cell width override.
    pub bool_width: Option<usize>,
    /// Print the table header in bold.
    pub styled: bool,
}

impl From<&Prefs> for SessionOptions {
    fn from(prefs: &Prefs) -> Self {
        Self {
            rules: prefs.rules(),
            show_spam_only: prefs.show_spam_only,
            batch_size: prefs.batch_size,
            column_widths: prefs.column_widths.clone(),
            bool_width: prefs.bool_width,
            styled: false,
        }
    }
}

/// One operator session against one mailbox.
///
/// Commands are read from `input` and run to completion, confirmation
/// included, before the next line is read. Tables and prompts go to
/// `output`.
pub struct Session<M, R, W> {
    mailbox: M,
    classifier: Classifier,
    renderer: TableRenderer,
    mailbox_size: u32,
    batch_size: u32,
    show_spam_only: bool,
    input: R,
    output: W,
}

impl<M, R, W> Session<M, R, W>
where
    M: Mailbox,
    R: BufRead,
    W: Write,
{
    /// Reads the mailbox size and prepares the session.
    ///
    /// # Errors
    ///
    /// Returns an error if a sender rule is invalid or the mailbox cannot
    /// be queried.
    pub async fn start(
        mut mailbox: M,
        options: &SessionOptions,
        input: R,
        mut output: W,
    ) -> Result<Self> {
        let classifier = Classifier::new(&options.rules)?;
        let mailbox_size = mailbox.message_count().await?;
        let widths = ColumnWidths::for_mailbox(mailbox_size)
            .with_overrides(&options.column_widths, options.bool_width);

        let (spam, safe) = classifier.rule_counts();
        info!("Session started: {mailbox_size} messages, {spam} spam rules, {safe} safe rules");
        writeln!(output, "total messages {mailbox_size}")?;

        Ok(Self {
            mailbox,
            classifier,
            renderer: TableRenderer::new(widths, options.styled),
            mailbox_size,
            batch_size: options.batch_size,
            show_spam_only: options.show_spam_only,
            input,
            output,
        })
    }

    /// Number of messages reported at login.
    #[must_use]
    pub const fn mailbox_size(&self) -> u32 {
        self.mailbox_size
    }

    /// Reads and executes commands until `quit` or end of input.
    ///
    /// Rejected command lines are reported and do not stop the loop.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error.
    pub async fn run(&mut self) -> Result<()> {
        let defaults = Defaults {
            batch_size: self.batch_size,
            mailbox_size: self.mailbox_size,
        };

        loop {
            let Some(line) = self.prompt(COMMAND_PROMPT)? else {
                debug!("End of input at the command prompt");
                return Ok(());
            };

            let invocation = match parse_line(&line, defaults) {
                Ok(Some(invocation)) => invocation,
                Ok(None) => continue,
                Err(e) => {
                    let err = Error::from(e);
                    debug!("Rejected {line:?}: {err}");
                    writeln!(self.output, "{err}")?;
                    continue;
                }
            };

            if self.execute(invocation).await? == Outcome::Quit {
                return Ok(());
            }
        }
    }

    /// Executes one validated command.
    ///
    /// # Errors
    ///
    /// Returns an error if the mailbox fails or output cannot be written.
    pub async fn execute(&mut self, invocation: Invocation) -> Result<Outcome> {
        match invocation {
            Invocation::Help => {
                write!(self.output, "{}", help_text())?;
                Ok(Outcome::Continue)
            }
            Invocation::Quit => Ok(Outcome::Quit),
            Invocation::Cycle { size, all } => self.cycle(size, self.spam_only(all)).await,
            Invocation::Range { from, to, all } => {
                let mut window = Window::range(from, to);
                if window.clamp_to(self.mailbox_size) {
                    warn!("Range start {from} is past the last message; using {}", window.from);
                    writeln!(
                        self.output,
                        "Only {} messages in the mailbox, starting at {}.",
                        self.mailbox_size, window.from
                    )?;
                }
                self.run_batch(window, self.spam_only(all)).await
            }
        }
    }

    const fn spam_only(&self, all: bool) -> bool {
        self.show_spam_only && !all
    }

    /// Walks the whole mailbox in windows of `size` messages.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of any batch.
    pub async fn cycle(&mut self, size: u32, spam_only: bool) -> Result<Outcome> {
        let windows = cyclic(self.mailbox_size, size);
        writeln!(self.output, "{} groups in total", windows.len())?;

        for window in windows {
            if self.run_batch(window, spam_only).await? == Outcome::Quit {
                return Ok(Outcome::Quit);
            }
        }
        Ok(Outcome::Continue)
    }

    /// Fetches, classifies and shows one window, then asks whether to delete
    /// the selected messages.
    ///
    /// Messages the store refuses to return are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the mailbox or the console fails.
    pub async fn run_batch(&mut self, window: Window, spam_only: bool) -> Result<Outcome> {
        writeln!(self.output, "batch from {} to {}", window.from, window.to)?;
        info!("Batch {window}: {} messages", window.len());

        let mut batch = Batch::default();
        for index in window.indices() {
            let raw = match self.mailbox.fetch_header(index).await {
                Ok(raw) => raw,
                Err(e) if !e.is_fatal() => {
                    warn!("Skipping message {index}: {e}");
                    batch.skipped.push(index);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let mut record = normalize(&raw);
            record.set_index(index);
            self.classifier.classify(&mut record);

            if batch.push(record, spam_only) {
                let is_first = batch.selected.len() == 1;
                if let Some(record) = batch.selected.last() {
                    if is_first {
                        self.renderer
                            .write_header(&mut self.output, &BATCH_COLUMNS, record)?;
                    }
                    self.renderer
                        .write_row(&mut self.output, &BATCH_COLUMNS, record)?;
                }
            }
        }

        self.renderer
            .write_table(&mut self.output, &ORDER_COLUMNS, &batch.orders)?;

        if batch.selected.is_empty() {
            writeln!(self.output, "No spam to delete")?;
            return Ok(Outcome::Continue);
        }

        self.confirm_and_delete(&batch).await
    }

    async fn confirm_and_delete(&mut self, batch: &Batch) -> Result<Outcome> {
        let Some(answer) = self.prompt(CONFIRM_PROMPT)? else {
            return Ok(Outcome::Quit);
        };

        match answer.to_lowercase().as_str() {
            "y" | "yes" => {}
            "quit" | "quit()" | "exit" => return Ok(Outcome::Quit),
            _ => {
                info!("Batch kept");
                return Ok(Outcome::Continue);
            }
        }

        let mut deleted = 0usize;
        for index in batch.delete_targets() {
            writeln!(self.output, "deleting {index}")?;
            match self.mailbox.delete_message(index).await {
                Ok(()) => deleted += 1,
                Err(e) if !e.is_fatal() => warn!("Could not delete message {index}: {e}"),
                Err(e) => return Err(e),
            }
        }
        info!("Marked {deleted} messages for deletion");
        Ok(Outcome::Continue)
    }

    /// Prints `text` and reads one trimmed line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Closes the mailbox, committing every confirmed deletion.
    ///
    /// # Errors
    ///
    /// Returns an error if the store does not acknowledge the close.
    pub async fn close(self) -> Result<()> {
        self.mailbox.close().await
    }

    /// Ends the session without closing the mailbox.
    pub fn into_mailbox(self) -> M {
        self.mailbox
    }
}
