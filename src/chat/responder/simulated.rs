//! Simulated assistant responder with canned acknowledgements.

use std::time::Duration;

use rand::Rng;

use crate::chat::core::config::ReplyConfig;
use crate::chat::responder::Responder;

/// Fixed pool of acknowledgement phrases, one chosen uniformly per reply.
pub const ACKNOWLEDGEMENTS: [&str; 8] = [
    "C'est une excellente question ! Laissez-moi y réfléchir...",
    "Je comprends votre point de vue. Voici ce que je pense...",
    "Intéressant ! Basé sur les informations que vous avez partagées...",
    "Merci pour cette information. Je peux vous aider avec cela...",
    "C'est un sujet fascinant ! D'après mon expérience...",
    "Je vois ce que vous voulez dire. Une approche possible serait...",
    "Excellente observation ! Cela me rappelle...",
    "C'est une perspective intéressante. Permettez-moi d'ajouter...",
];

/// Production responder: random acknowledgement, echo of the user text,
/// and a uniformly random delay within the configured bounds.
pub struct SimulatedResponder {
    config: ReplyConfig,
}

impl SimulatedResponder {
    /// Create a responder with the given reply settings.
    #[must_use]
    pub const fn new(config: ReplyConfig) -> Self {
        Self { config }
    }
}

impl Responder for SimulatedResponder {
    fn compose_reply(&self, user_text: &str) -> String {
        let mut rng = rand::thread_rng();
        let idx = rng.gen_range(0..ACKNOWLEDGEMENTS.len());
        let phrase = ACKNOWLEDGEMENTS[idx];
        format!(
            "{phrase} En ce qui concerne \"{user_text}\", je pense que cela mérite une attention particulière. Que pensez-vous de cette approche ?"
        )
    }

    fn reply_delay(&self) -> Duration {
        let mut rng = rand::thread_rng();
        let millis = rng.gen_range(self.config.min_delay_ms..=self.config.max_delay_ms);
        Duration::from_millis(millis)
    }
}
