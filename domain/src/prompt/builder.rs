//! Builds the user prompt for the next turn from the transcript so far

use crate::conversation::turn::Turn;
use crate::speaker::entities::SpeakerId;
use crate::speaker::roster::SpeakerRoster;

/// Derives each turn's prompt from the topic and history
///
/// Pure: the same speaker, history and topic always give the same string.
/// The speaker's persona travels separately as the system prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder<'a> {
    roster: &'a SpeakerRoster,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(roster: &'a SpeakerRoster) -> Self {
        Self { roster }
    }

    /// Prompt for `speaker` given every turn taken so far.
    ///
    /// With history, the speaker is asked to answer the author of the
    /// latest turn. With two speakers that author is always the speaker's
    /// rotation partner.
    pub fn build(&self, speaker: &SpeakerId, history: &[Turn], topic: &str) -> String {
        let mut prompt = format!("The topic of conversation is: \"{}\"\n\n", topic);

        let Some(last) = history.last() else {
            prompt.push_str(&format!(
                "You are starting the conversation on the topic \"{}\". \
                 Introduce your perspective on this topic.",
                topic
            ));
            return prompt;
        };

        prompt.push_str("Previous conversation:\n");
        for turn in history {
            prompt.push_str(&format!(
                "{}: {}\n",
                self.roster.display_name(turn.speaker_id()),
                turn.response()
            ));
        }
        prompt.push('\n');

        let addressee = self.addressee(speaker, last);
        prompt.push_str(&format!(
            "Continue the conversation by responding to {}'s last message.",
            addressee
        ));
        prompt
    }

    fn addressee<'s>(&self, speaker: &SpeakerId, last: &'s Turn) -> &'s str
    where
        'a: 's,
    {
        if last.speaker_id() != speaker {
            return self.roster.display_name(last.speaker_id());
        }
        // Only reachable when a caller replays a speaker twice in a row.
        self.roster
            .next_after(speaker)
            .map(|s| s.display_name())
            .unwrap_or_else(|_| self.roster.first().display_name())
    }
}
