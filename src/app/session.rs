use crate::app::screen::{render, Affordance, Locale, Screen};
use crate::core::flow::CaptureAndClassifyFlow;
use crate::domain::model::{Phase, Verdict};
use crate::domain::ports::{Camera, PermissionGate, Recognizer};
use crate::utils::error::{Result, RiceError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Grant,
    Toggle,
    Capture,
    Clear,
    Help,
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "grant" | "g" => Some(Command::Grant),
            "toggle" | "t" => Some(Command::Toggle),
            "capture" | "check" | "c" => Some(Command::Capture),
            "again" | "clear" | "r" => Some(Command::Clear),
            "help" | "h" | "?" => Some(Command::Help),
            "quit" | "exit" | "q" => Some(Command::Quit),
            _ => None,
        }
    }

    pub fn affordance(self) -> Option<Affordance> {
        match self {
            Command::Grant => Some(Affordance::GrantPermission),
            Command::Toggle => Some(Affordance::ToggleFacing),
            Command::Capture => Some(Affordance::Capture),
            Command::Clear => Some(Affordance::Clear),
            Command::Help | Command::Quit => None,
        }
    }
}

const HELP: &str = "commands: grant | toggle | capture | again | help | quit\n";

/// Terminal front-end for the flow: one command per line, screen redrawn after each.
pub struct Session<C: Camera, R: Recognizer, P: PermissionGate> {
    flow: CaptureAndClassifyFlow<C, R, P>,
    locale: Locale,
}

impl<C: Camera, R: Recognizer, P: PermissionGate> Session<C, R, P> {
    pub fn new(flow: CaptureAndClassifyFlow<C, R, P>, locale: Locale) -> Self {
        Self { flow, locale }
    }

    pub fn flow(&self) -> &CaptureAndClassifyFlow<C, R, P> {
        &self.flow
    }

    pub fn screen(&self) -> Screen {
        Screen::from_snapshot(&self.flow.snapshot())
    }

    pub async fn run<I, O>(&mut self, input: I, mut output: O) -> Result<()>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin,
    {
        self.draw(&mut output).await?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let Some(command) = Command::parse(&line) else {
                output.write_all(HELP.as_bytes()).await?;
                continue;
            };

            match command {
                Command::Quit => break,
                Command::Help => {
                    output.write_all(HELP.as_bytes()).await?;
                    continue;
                }
                _ => {}
            }

            if let Some(affordance) = command.affordance() {
                if !self.screen().allows(affordance) {
                    let refusal = format!("{}\n", self.locale.not_available_text());
                    output.write_all(refusal.as_bytes()).await?;
                    continue;
                }
            }

            match self.execute(command, &mut output).await {
                Ok(()) => {}
                Err(RiceError::IoError(e)) => return Err(e.into()),
                Err(e) => tracing::debug!("command {:?} failed: {}", command, e),
            }
            self.draw(&mut output).await?;
        }

        output.flush().await?;
        Ok(())
    }

    /// Single check: make sure permission is there, capture once, print the result.
    pub async fn run_once<O: AsyncWrite + Unpin>(&mut self, mut output: O) -> Result<Verdict> {
        if self.flow.snapshot().phase == Phase::PermissionRequired
            && !self.flow.request_camera_permission().await.is_granted()
        {
            self.draw(&mut output).await?;
            return Err(RiceError::PermissionDenied);
        }

        let outcome = self.check(&mut output).await;
        self.draw(&mut output).await?;
        output.flush().await?;
        outcome
    }

    async fn execute<O: AsyncWrite + Unpin>(&mut self, command: Command, output: &mut O) -> Result<()> {
        match command {
            Command::Grant => {
                self.flow.request_camera_permission().await;
            }
            Command::Toggle => {
                self.flow.toggle_facing();
            }
            Command::Capture => {
                self.check(output).await?;
            }
            Command::Clear => self.flow.clear(),
            Command::Help | Command::Quit => {}
        }
        Ok(())
    }

    /// The loading line goes out before the capture so it is on screen while
    /// the upload is in flight.
    async fn check<O: AsyncWrite + Unpin>(&mut self, output: &mut O) -> Result<Verdict> {
        let loading = format!("{}\n", self.locale.analyzing_text());
        output.write_all(loading.as_bytes()).await?;
        output.flush().await?;
        self.flow.capture_photo().await
    }

    async fn draw<O: AsyncWrite + Unpin>(&self, output: &mut O) -> Result<()> {
        let text = render(&self.flow.snapshot(), self.locale);
        output.write_all(text.as_bytes()).await?;
        Ok(())
    }
}
