use crate::api::abilities::AbilityClient;
use crate::error::AppError;
use crate::model::{Ability, SkillOrder, Slot};
use crate::scrape::skill_order::SkillOrderClient;
use crate::trivia::edit_distance::is_correct_guess;
use regex::RegexBuilder;
use std::thread;

const MASK: &str = "???";

#[derive(Debug, Clone)]
pub struct Challenge {
    pub champion: String,
    pub abilities: Vec<Ability>,
    pub skill_order: SkillOrder,
}

impl Challenge {
    /// Ability description with the champion's own name blanked out.
    pub fn ability_clue(&self, slot: Slot) -> Option<String> {
        let ability = self.abilities.iter().find(|a| a.slot == slot)?;
        let masked = RegexBuilder::new(&regex::escape(&self.champion))
            .case_insensitive(true)
            .build()
            .map(|re| re.replace_all(&ability.description, MASK).into_owned())
            .unwrap_or_else(|_| ability.description.clone());
        Some(masked)
    }

    pub fn check(&self, guess: &str) -> bool {
        is_correct_guess(guess, &self.champion)
    }

    /// Something to show the player: abilities or a skill order.
    pub fn is_playable(&self) -> bool {
        !self.abilities.is_empty() || !self.skill_order.is_empty()
    }
}

pub struct ChallengeBuilder<'a> {
    abilities: &'a AbilityClient,
    skill_orders: &'a SkillOrderClient,
}

impl<'a> ChallengeBuilder<'a> {
    pub fn new(abilities: &'a AbilityClient, skill_orders: &'a SkillOrderClient) -> Self {
        ChallengeBuilder {
            abilities,
            skill_orders,
        }
    }

    /// Fetches abilities and skill order side by side and waits for both.
    pub fn build(&self, champion: &str) -> Result<Challenge, AppError> {
        let champion = champion.trim();

        let (abilities, skill_order) = thread::scope(|scope| {
            let skill_order = scope.spawn(|| self.skill_orders.get_skill_order(champion, false));
            let abilities = self.abilities.get_abilities(champion);
            let skill_order = skill_order.join().unwrap_or_else(|_| {
                tracing::error!(champion, "skill order fetch panicked");
                SkillOrder::empty()
            });
            (abilities, skill_order)
        });

        Ok(Challenge {
            champion: champion.to_string(),
            abilities: abilities?,
            skill_order,
        })
    }
}
