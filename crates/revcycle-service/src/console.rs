//! Interactive console walkthrough of a single order.
//!
//! Each turn prints the current step with its documents and summary, then
//! reads one command. Workflow errors are printed and the same step is
//! offered again; only I/O and persistence failures end the walkthrough.

use revcycle_core::{SessionError, SessionStore, SimulatorSession};
use revcycle_types::{Decision, RenderedDocument, Step};
use std::path::PathBuf;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Errors that end a console walkthrough.
#[derive(Debug, Error)]
pub enum ConsoleError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
	#[error(transparent)]
	Session(#[from] SessionError),
}

const HELP: &str = "\
Commands:
  next (or Enter)   continue to the next step
  <option>          decide at steps 3, 4 and 5, by label or number
  reset             start the order over
  export            write the current documents as Markdown
  help              show this help
  quit              leave the simulator
";

/// A parsed line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	Next,
	Choose(String),
	Reset,
	Export,
	Help,
	Quit,
	Unknown(String),
}

/// Parses `line` in the context of `step`.
///
/// At a decision step any other word is taken as a decision label, and a
/// number selects the option at that position.
pub fn parse_command(line: &str, step: Step) -> Command {
	let line = line.trim();
	match line.to_ascii_lowercase().as_str() {
		"" | "next" | "n" => Command::Next,
		"reset" => Command::Reset,
		"export" => Command::Export,
		"help" | "?" => Command::Help,
		"quit" | "exit" | "q" => Command::Quit,
		_ if step.requires_decision() => {
			let options = Decision::options(step);
			let chosen = line
				.parse::<usize>()
				.ok()
				.and_then(|n| n.checked_sub(1))
				.and_then(|i| options.get(i));
			match chosen {
				Some(decision) => Command::Choose(decision.label().to_string()),
				None => Command::Choose(line.to_string()),
			}
		},
		_ => Command::Unknown(line.to_string()),
	}
}

/// Drives one session from console input to console output.
pub struct Console<R, W> {
	input: R,
	output: W,
	store: SessionStore,
	export_dir: PathBuf,
}

impl<R, W> Console<R, W>
where
	R: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
{
	pub fn new(input: R, output: W, store: SessionStore, export_dir: PathBuf) -> Self {
		Self {
			input,
			output,
			store,
			export_dir,
		}
	}

	/// Runs until `quit` or end of input and returns the session as left.
	pub async fn run(
		&mut self,
		mut session: SimulatorSession,
	) -> Result<SimulatorSession, ConsoleError> {
		self.store.save(&session).await?;
		self.print(&format!("Session {}\n", session.id())).await?;
		self.print("Type 'help' for commands.\n").await?;
		self.render(&session).await?;

		let mut lines = (&mut self.input).lines();
		loop {
			self.output.write_all(b"> ").await?;
			self.output.flush().await?;

			let Some(line) = lines.next_line().await? else {
				break;
			};

			let changed = match parse_command(&line, session.current_step()) {
				Command::Next => apply(&mut self.output, session.advance_with_label(None)).await?,
				Command::Choose(label) => {
					apply(&mut self.output, session.advance_with_label(Some(&label))).await?
				},
				Command::Reset => {
					apply(&mut self.output, session.reset().map(|s| s.current_step())).await?
				},
				Command::Export => {
					match session.export_current_documents(&self.export_dir).await {
						Ok(paths) => {
							for path in paths {
								let line = format!("Exported {}", path.display());
								write_line(&mut self.output, &line).await?;
							}
						},
						Err(e) => write_line(&mut self.output, &format!("Error: {}", e)).await?,
					}
					false
				},
				Command::Help => {
					self.output.write_all(HELP.as_bytes()).await?;
					false
				},
				Command::Quit => break,
				Command::Unknown(word) => {
					write_line(
						&mut self.output,
						&format!("Unknown command '{}'. Type 'help' for commands.", word),
					)
					.await?;
					false
				},
			};

			if changed {
				self.store.save(&session).await?;
				render(&mut self.output, &session).await?;
			}
		}

		self.output.flush().await?;
		Ok(session)
	}

	async fn render(&mut self, session: &SimulatorSession) -> Result<(), ConsoleError> {
		render(&mut self.output, session).await
	}

	async fn print(&mut self, text: &str) -> Result<(), ConsoleError> {
		self.output.write_all(text.as_bytes()).await?;
		Ok(())
	}
}

/// Reports the outcome of a state change; returns whether the session moved.
async fn apply<W, T>(
	output: &mut W,
	result: Result<T, revcycle_core::WorkflowError>,
) -> Result<bool, ConsoleError>
where
	W: AsyncWrite + Unpin,
{
	match result {
		Ok(_) => Ok(true),
		Err(e) => {
			tracing::debug!(error = %e, "Command rejected");
			write_line(output, &format!("Error: {}", e)).await?;
			Ok(false)
		},
	}
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), ConsoleError> {
	output.write_all(text.as_bytes()).await?;
	output.write_all(b"\n").await?;
	Ok(())
}

async fn render<W: AsyncWrite + Unpin>(
	output: &mut W,
	session: &SimulatorSession,
) -> Result<(), ConsoleError> {
	output.write_all(render_step(session).as_bytes()).await?;
	Ok(())
}

/// Text shown for the session's current step.
pub fn render_step(session: &SimulatorSession) -> String {
	let step = session.current_step();
	let mut text = format!(
		"\n==> {}\nRole: {}\nInput: {}\n",
		step,
		step.role(),
		step.scenario_input()
	);

	for document in session.current_documents() {
		text.push_str(&render_document(&document));
	}

	text.push('\n');
	text.push_str(&session.summary().to_string());

	let options = Decision::options(step);
	if !options.is_empty() {
		let listed = options
			.iter()
			.enumerate()
			.map(|(i, d)| format!("{}) {}", i + 1, d.label()))
			.collect::<Vec<_>>()
			.join("  ");
		text.push_str(&format!("Decision required: {}\n", listed));
	} else if step.is_terminal() {
		text.push_str("Order complete. Type 'reset' to run it again or 'quit' to leave.\n");
	}
	text
}

fn render_document(document: &RenderedDocument) -> String {
	let mut text = format!("\n--- {} ---\n", document.title);
	for field in &document.fields {
		text.push_str(&format!("  {}: {}\n", field.label, field.value));
	}
	text
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use revcycle_storage::implementations::memory::MemoryStorage;
	use revcycle_storage::StorageService;
	use revcycle_types::{DocumentKey, Scenario};
	use std::sync::Arc;
	use tempfile::TempDir;

	fn session() -> SimulatorSession {
		SimulatorSession::new(Scenario::bikeworld(
			NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
		))
		.unwrap()
	}

	fn store() -> SessionStore {
		SessionStore::new(Arc::new(StorageService::new(Box::new(MemoryStorage::new()))))
	}

	async fn run_script(
		script: &str,
		store: SessionStore,
		export_dir: PathBuf,
	) -> (SimulatorSession, String) {
		let mut output = Vec::new();
		let session = {
			let mut console = Console::new(script.as_bytes(), &mut output, store, export_dir);
			console.run(session()).await.unwrap()
		};
		(session, String::from_utf8(output).unwrap())
	}

	#[test]
	fn test_parse_command() {
		assert_eq!(parse_command("", Step::Inquiry), Command::Next);
		assert_eq!(parse_command(" NEXT ", Step::Inquiry), Command::Next);
		assert_eq!(parse_command("quit", Step::Billing), Command::Quit);
		assert_eq!(
			parse_command("2", Step::Inventory),
			Command::Choose("Out of Stock".to_string())
		);
		assert_eq!(
			parse_command("Not Available", Step::BackOrder),
			Command::Choose("Not Available".to_string())
		);
		assert_eq!(
			parse_command("9", Step::CreditCheck),
			Command::Choose("9".to_string())
		);
		assert_eq!(
			parse_command("approve", Step::Shipping),
			Command::Unknown("approve".to_string())
		);
	}

	#[tokio::test]
	async fn test_walkthrough_to_collections() {
		let store = store();
		let temp_dir = TempDir::new().unwrap();
		let (session, output) = run_script(
			"\nnext\n1\nIn Stock\n\n\nquit\n",
			store.clone(),
			temp_dir.path().to_path_buf(),
		)
		.await;

		assert_eq!(session.current_step(), Step::Collections);
		assert!(output.contains("==> 10. Collections"));
		assert!(output.contains("Order complete"));

		let saved = store.load(&session.id()).await.unwrap();
		assert_eq!(saved.current_step(), Step::Collections);
	}

	#[tokio::test]
	async fn test_rejected_input_reprompts() {
		let temp_dir = TempDir::new().unwrap();
		let (session, output) = run_script(
			"dance\n\n\nMaybe\n\n",
			store(),
			temp_dir.path().to_path_buf(),
		)
		.await;

		assert!(output.contains("Unknown command 'dance'"));
		assert!(output.contains("Error: Invalid decision at step 3. Credit Check"));
		assert!(output.contains("Decision required: 1) Approve  2) Reject"));
		assert_eq!(session.current_step(), Step::CreditCheck);
	}

	#[tokio::test]
	async fn test_reject_then_reset() {
		let temp_dir = TempDir::new().unwrap();
		let (session, output) = run_script(
			"\n\nReject\nreset\nquit\n",
			store(),
			temp_dir.path().to_path_buf(),
		)
		.await;

		assert!(output.contains("--- Rejected Order Notification ---"));
		assert_eq!(session.current_step(), Step::Inquiry);
		assert!(session
			.state()
			.document(DocumentKey::RejectionNotice)
			.is_none());
	}

	#[tokio::test]
	async fn test_export_writes_current_documents() {
		let temp_dir = TempDir::new().unwrap();
		let export_dir = temp_dir.path().join("exports");
		let (_, output) = run_script("export\n", store(), export_dir.clone()).await;

		assert!(output.contains("Exported"));
		assert_eq!(export_dir.read_dir().unwrap().count(), 1);
	}
}
