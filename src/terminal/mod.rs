//! Terminal front-end: splash, hero, the chat loop and the report page,
//! rendered with rustyline and colored.

mod helper;

use std::sync::Arc;

use anyhow::Result;
use colored::{ColoredString, Colorize};
use rustyline::error::ReadlineError;
use rustyline::Editor;

use crate::chat::{ChatMessage, ChatRole, ChatService, Conversation, TriageApiClient, TurnOutcome};
use crate::config::AppConfig;
use crate::error::ChatError;
use crate::presentation::{
    triage_carousel, Carousel, SplashSequence, SplashStage, TriageSlide, FEATURES, HERO,
    PRODUCT_NAME, TAGLINE,
};
use crate::report::{ReportView, Route};
use helper::ChatHelper;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashCommand {
    Report,
    Reset,
    Levels,
    Status,
    Help,
    Quit,
}

impl SlashCommand {
    pub const ALL: [SlashCommand; 6] = [
        SlashCommand::Report,
        SlashCommand::Reset,
        SlashCommand::Levels,
        SlashCommand::Status,
        SlashCommand::Help,
        SlashCommand::Quit,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            SlashCommand::Report => "/report",
            SlashCommand::Reset => "/reset",
            SlashCommand::Levels => "/levels",
            SlashCommand::Status => "/status",
            SlashCommand::Help => "/help",
            SlashCommand::Quit => "/quit",
        }
    }

    fn description(self) -> &'static str {
        match self {
            SlashCommand::Report => "open the full report (once the assessment is complete)",
            SlashCommand::Reset => "start a new conversation",
            SlashCommand::Levels => "explain the five triage levels",
            SlashCommand::Status => "show what the assistant has collected so far",
            SlashCommand::Help => "list commands",
            SlashCommand::Quit => "leave",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(SlashCommand),
    UnknownCommand(String),
    Message(String),
    Blank,
}

pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Blank;
    }
    if trimmed == "quit" || trimmed == "exit" {
        return Input::Command(SlashCommand::Quit);
    }
    if trimmed.starts_with('/') {
        let word = trimmed.split_whitespace().next().unwrap_or(trimmed);
        return SlashCommand::ALL
            .into_iter()
            .find(|c| c.keyword() == word)
            .map(Input::Command)
            .unwrap_or_else(|| Input::UnknownCommand(word.to_string()));
    }
    Input::Message(trimmed.to_string())
}

pub struct TerminalApp {
    config: AppConfig,
    api: Arc<TriageApiClient>,
    service: ChatService,
}

impl TerminalApp {
    pub fn new(config: AppConfig) -> Result<Self> {
        let api = Arc::new(TriageApiClient::from_config(&config.api)?);
        let conversation = Conversation::new(config.ui.greeting.clone(), config.api.max_input_length);
        let service = ChatService::new(api.clone(), conversation);
        Ok(Self { config, api, service })
    }

    pub async fn run(&self, skip_splash: bool) -> Result<()> {
        if !skip_splash {
            play_splash(&SplashSequence::from_config(&self.config.ui)).await;
        }
        print_hero();
        tracing::info!(backend = %self.api.base_url(), "chat started");

        let mut rl = Editor::new()?;
        rl.set_helper(Some(ChatHelper::new()));

        for message in self.service.snapshot().await.messages {
            print_message(&message);
        }

        loop {
            let snapshot = self.service.snapshot().await;
            let prompt = if snapshot.report_ready {
                "[Enter] view report, /reset to start over > "
            } else {
                "you > "
            };

            let line = match rl.readline(prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("{}", format!("Error: {:?}", err).red());
                    break;
                }
            };

            match parse_input(&line) {
                Input::Blank if snapshot.report_ready => self.show_report().await,
                Input::Blank => {}
                Input::Command(SlashCommand::Quit) => break,
                Input::Command(SlashCommand::Help) => print_help(),
                Input::Command(SlashCommand::Levels) => print_levels(&triage_carousel()),
                Input::Command(SlashCommand::Report) => self.show_report().await,
                Input::Command(SlashCommand::Status) => self.show_status().await,
                Input::Command(SlashCommand::Reset) => {
                    let snapshot = self.service.reset().await;
                    println!("{}", "-- new conversation --".bright_black());
                    for message in &snapshot.messages {
                        print_message(message);
                    }
                }
                Input::UnknownCommand(word) => {
                    println!("{}", format!("Unknown command {word}. Try /help.").bright_black());
                }
                Input::Message(text) => {
                    let _ = rl.add_history_entry(&text);
                    self.send(&text).await;
                }
            }
        }

        println!("{}", "Take care!".bright_green());
        Ok(())
    }

    async fn send(&self, text: &str) {
        println!("{}", "IntelliCare is typing...".bright_black().italic());

        match self.service.send(text).await {
            Ok(TurnOutcome::Reply(message)) => print_message(&message),
            Ok(TurnOutcome::Completed(message)) => {
                print_message(&message);
                println!(
                    "{}",
                    "Your assessment is ready. Press Enter to view the full report.".bright_green()
                );
            }
            Ok(TurnOutcome::Failed(message)) => print_message(&message),
            Ok(TurnOutcome::Discarded) => {}
            Err(e) if e.is_rejected_input() => {
                println!("{}", e.to_string().yellow());
            }
            Err(e) => {
                println!("{}", e.to_string().red());
                if let Some(fallback) = self.service.snapshot().await.messages.last() {
                    print_message(fallback);
                }
            }
        }
    }

    async fn show_report(&self) {
        let route = match self.service.open_report().await {
            Ok(route) => route,
            Err(e) => {
                println!("{}", e.to_string().yellow());
                return;
            }
        };
        tracing::debug!(path = route.path(), "navigating");

        match self.service.mount_report_view() {
            Route::Report(bundle) => {
                println!();
                println!("{}", ReportView::from_bundle(&bundle));
                println!();
            }
            _ => println!("{}", "No report to show.".yellow()),
        }
    }

    async fn show_status(&self) {
        let snapshot = self.service.snapshot().await;
        println!(
            "  {} message(s) sent, state {:?}",
            snapshot.user_turns, snapshot.state
        );
        let Some(session_id) = snapshot.session_id else {
            println!("{}", "No active session yet.".bright_black());
            return;
        };

        match self.api.session_info(&session_id).await {
            Ok(info) => {
                println!("{}", format!("Session {}", info.session_id).bright_magenta());
                println!("  turns:     {}", info.turn_count);
                println!("  symptoms:  {}", join_or_dash(&info.symptoms_collected));
                println!("  collected: {}", join_or_dash(&info.info_collected));
                println!("  skipped:   {}", join_or_dash(&info.info_skipped));
            }
            Err(ChatError::Server { status: 404, .. }) => {
                println!("{}", "The backend no longer holds this session.".bright_black());
            }
            Err(e) => println!("{}", e.to_string().red()),
        }
    }
}

async fn play_splash(splash: &SplashSequence) {
    let mut stage = SplashStage::Logo;
    while let Some(duration) = splash.duration_of(stage) {
        match stage {
            SplashStage::Logo => println!("\n  {}\n", PRODUCT_NAME.bright_cyan().bold()),
            SplashStage::Tagline => println!("  {}\n", TAGLINE.bright_black()),
            SplashStage::Hero => {}
        }
        tokio::time::sleep(duration).await;
        stage = stage.next();
    }
}

fn print_hero() {
    println!("{}", HERO.headline.bold());
    println!("{}", HERO.subheadline);
    println!();
    for feature in FEATURES {
        println!("  {} {}: {}", "*".bright_cyan(), feature.title.bold(), feature.blurb);
    }
    println!();
    println!("{}", format!("{} below. Type /help for commands.", HERO.call_to_action).bright_black());
    println!();
}

fn print_help() {
    for command in SlashCommand::ALL {
        println!("  {} {}", format!("{:<9}", command.keyword()).bright_cyan(), command.description());
    }
}

fn print_message(message: &ChatMessage) {
    match message.role {
        ChatRole::User => println!("{}", format!("> {}", message.text).green()),
        ChatRole::Bot => {
            for line in message.text.lines() {
                println!("{}", line.bright_blue());
            }
            println!();
        }
    }
}

fn level_color(slide: &TriageSlide, text: &str) -> ColoredString {
    match slide.level {
        1 => text.bright_red().bold(),
        2 => text.red(),
        3 => text.yellow(),
        4 => text.blue(),
        _ => text.green(),
    }
}

pub fn print_slide(slide: &TriageSlide) {
    println!(
        "{}",
        level_color(slide, &format!("Level {}: {}", slide.level, slide.name))
    );
    println!("  {}", slide.description);
    println!("  Action: {}", slide.action);
    println!("  e.g. {}", slide.examples.join(", ").bright_black());
}

pub fn print_levels(carousel: &Carousel<TriageSlide>) {
    for slide in carousel.slides() {
        print_slide(slide);
        println!();
    }
}

/// Steps through the triage explainer one slide at a time: n, p, a number, q.
pub fn browse_levels() -> Result<()> {
    let mut carousel = triage_carousel();
    let mut rl = Editor::<(), _>::new()?;

    print_slide(carousel.current());
    loop {
        let line = match rl.readline("[n]ext [p]revious [1-5] [q]uit > ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        let slide = match line.trim() {
            "q" | "quit" => break,
            "p" | "prev" | "previous" => carousel.previous(),
            "" | "n" | "next" => carousel.next(),
            other => match other.parse::<usize>() {
                Ok(level) if (1..=carousel.len()).contains(&level) => carousel.go_to(level - 1),
                _ => continue,
            },
        };
        println!();
        print_slide(slide);
    }
    Ok(())
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands_and_messages() {
        assert_eq!(parse_input("  "), Input::Blank);
        assert_eq!(parse_input("/report"), Input::Command(SlashCommand::Report));
        assert_eq!(parse_input("/reset now"), Input::Command(SlashCommand::Reset));
        assert_eq!(parse_input("exit"), Input::Command(SlashCommand::Quit));
        assert_eq!(parse_input("/nope"), Input::UnknownCommand("/nope".to_string()));
        assert_eq!(
            parse_input("  my throat hurts "),
            Input::Message("my throat hurts".to_string())
        );
    }

    #[test]
    fn test_every_command_round_trips_through_parser() {
        for command in SlashCommand::ALL {
            assert_eq!(parse_input(command.keyword()), Input::Command(command));
        }
    }

    #[test]
    fn test_join_or_dash() {
        assert_eq!(join_or_dash(&[]), "-");
        assert_eq!(join_or_dash(&["cough".to_string(), "fever".to_string()]), "cough, fever");
    }
}
