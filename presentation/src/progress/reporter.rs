//! Progress reporting for conversation runs

use crate::output::console::ConsoleFormatter;
use colloquy_application::ports::progress::ConversationProgress;
use colloquy_domain::{
    ConversationSettings, ConversationStatus, SpeakerDefinition, SpeakerRoster, Transcript, Turn,
};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Reports progress with an overall turn bar and a spinner for the active speaker
pub struct ProgressReporter {
    multi: MultiProgress,
    turns_bar: Mutex<Option<ProgressBar>>,
    speaker_spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            turns_bar: Mutex::new(None),
            speaker_spinner: Mutex::new(None),
        }
    }

    fn turns_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn lock(slot: &Mutex<Option<ProgressBar>>) -> MutexGuard<'_, Option<ProgressBar>> {
        slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn clear_spinner(&self) {
        if let Some(spinner) = Self::lock(&self.speaker_spinner).take() {
            spinner.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationProgress for ProgressReporter {
    fn on_conversation_start(&self, settings: &ConversationSettings, _roster: &SpeakerRoster) {
        let bar = self.multi.add(ProgressBar::new(u64::from(settings.num_turns)));
        bar.set_style(Self::turns_style());
        bar.set_prefix("Turns");
        bar.set_message(settings.topic.clone());
        *Self::lock(&self.turns_bar) = Some(bar);
    }

    fn on_turn_start(&self, turn_number: u32, total_turns: u32, speaker: &SpeakerDefinition) {
        self.clear_spinner();

        let spinner = self.multi.add(ProgressBar::new_spinner());
        spinner.set_style(Self::spinner_style());
        spinner.set_prefix(format!("Turn {}/{}", turn_number, total_turns));
        spinner.set_message(format!(
            "{} is thinking ({})",
            speaker.display_name(),
            speaker.model
        ));
        spinner.enable_steady_tick(Duration::from_millis(100));
        *Self::lock(&self.speaker_spinner) = Some(spinner);
    }

    fn on_turn_complete(&self, turn: &Turn, speaker: &SpeakerDefinition, elapsed: Duration) {
        self.clear_spinner();

        let mark = if turn.is_placeholder() {
            "x".red()
        } else {
            "v".green()
        };
        if let Some(bar) = Self::lock(&self.turns_bar).as_ref() {
            bar.set_message(format!(
                "{} {} ({:.1}s)",
                mark,
                speaker.display_name(),
                elapsed.as_secs_f64()
            ));
            bar.inc(1);
        }
    }

    fn on_turn_failed(&self, turn_number: u32, speaker: &SpeakerDefinition, error: &str) {
        self.clear_spinner();
        let _ = self.multi.println(format!(
            "{} turn {} by {} failed: {}",
            "x".red(),
            turn_number,
            speaker.display_name(),
            error
        ));
    }

    fn on_delay(&self, delay: Duration) {
        if let Some(bar) = Self::lock(&self.turns_bar).as_ref() {
            bar.set_message(format!("waiting {}ms", delay.as_millis()));
        }
    }

    fn on_conversation_end(&self, status: ConversationStatus, transcript: &Transcript) {
        self.clear_spinner();
        if let Some(bar) = Self::lock(&self.turns_bar).take() {
            let message = match status {
                ConversationStatus::Completed => "complete!".green(),
                ConversationStatus::Cancelled => "cancelled".yellow(),
                _ => status.as_str().red(),
            };
            bar.finish_with_message(format!("{} turns {}", transcript.len(), message));
        }
    }
}

/// Plain line-per-event progress (no fancy UI)
pub struct SimpleProgress;

impl ConversationProgress for SimpleProgress {
    fn on_conversation_start(&self, settings: &ConversationSettings, roster: &SpeakerRoster) {
        println!(
            "{} {} ({} turns, {} speakers)",
            "->".cyan(),
            settings.topic.bold(),
            settings.num_turns,
            roster.len()
        );
    }

    fn on_turn_start(&self, turn_number: u32, total_turns: u32, speaker: &SpeakerDefinition) {
        println!(
            "  {} turn {}/{}: {}",
            "..".dimmed(),
            turn_number,
            total_turns,
            speaker.display_name()
        );
    }

    fn on_turn_complete(&self, turn: &Turn, speaker: &SpeakerDefinition, elapsed: Duration) {
        println!(
            "  {} ({:.1}s)",
            ConsoleFormatter::turn_line(speaker.display_name(), turn),
            elapsed.as_secs_f64()
        );
    }

    fn on_turn_failed(&self, turn_number: u32, speaker: &SpeakerDefinition, error: &str) {
        println!(
            "  {} turn {} by {} failed: {}",
            "x".red(),
            turn_number,
            speaker.display_name(),
            error
        );
    }

    fn on_conversation_end(&self, status: ConversationStatus, transcript: &Transcript) {
        println!("{} {} after {} turns", "->".cyan(), status, transcript.len());
        println!();
    }
}
