//! Keyword-scripted local gateway.
//!
//! Answers without any network access by matching the latest user message
//! against a fixed set of travel topics. Unmatched messages get one of a small
//! pool of prompts, picked with an injected random source so tests can seed it.

use crate::error::Result;
use crate::llm::{CompletionConfig, LlmGateway, LlmGatewayResponse, LlmMessage, MessageRole};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use regex::Regex;
use std::sync::Mutex;
use tracing::debug;

const TOPICS: &[(&str, &str)] = &[
    (
        r"add place|add location|markers?|pins?",
        "To add a place: Click 'Add Place' → click on the map to auto-fill name and coordinates → \
add notes/category on the left → 'Add to Log'.",
    ),
    (
        r"hello|hi|hey",
        "Hello! I'm WanderBot, your travel companion. I can help you discover amazing places, \
plan your trips, and answer questions about destinations around the world. \
What would you like to explore today?",
    ),
    (
        r"places near me|nearby",
        "I'd love to help you find places nearby! However, I'll need your location to provide \
specific recommendations. Some popular categories to explore include:\n\n\
• Restaurants and cafes\n• Historical landmarks\n• Parks and nature spots\n\
• Museums and galleries\n• Shopping areas\n\nWhat type of places are you most interested in?",
    ),
    (
        r"manali",
        "Manali is a beautiful hill station in Himachal Pradesh, India! Here are some must-visit places:\n\n\
🏔️ **Rohtang Pass** - Stunning mountain views\n\
🏛️ **Hadimba Temple** - Ancient cedar wood temple\n\
🌊 **Beas River** - Perfect for riverside walks\n\
🎿 **Solang Valley** - Adventure sports hub\n\
🏘️ **Old Manali** - Charming cafes and local culture\n\n\
Best time to visit: March to June for pleasant weather, December to February for snow activities!",
    ),
    (
        r"paris",
        "Paris, the City of Light! ✨ Here are the essentials:\n\n\
🗼 **Eiffel Tower** - Iconic landmark\n\
🎨 **Louvre Museum** - World's largest art museum\n\
⛪ **Notre-Dame Cathedral** - Gothic masterpiece\n\
🛍️ **Champs-Élysées** - Famous shopping street\n\
🏛️ **Arc de Triomphe** - Historical monument\n\n\
Pro tip: Get a Museum Pass for skip-the-line access to major attractions!",
    ),
    (
        r"tokyo",
        "Tokyo is an incredible blend of tradition and modernity! 🇯🇵\n\n\
🏯 **Senso-ji Temple** - Ancient Buddhist temple\n\
🌸 **Shibuya Crossing** - World's busiest intersection\n\
🍣 **Tsukiji Outer Market** - Fresh sushi and street food\n\
🏮 **Asakusa** - Traditional district\n\
🌆 **Tokyo Skytree** - Panoramic city views\n\n\
Don't miss trying authentic ramen and visiting during cherry blossom season (March-May)!",
    ),
    (
        r"budget|cheap|affordable",
        "Great question! Here are some budget-friendly travel tips:\n\n\
💰 **Accommodation**: Consider hostels, guesthouses, or Airbnb\n\
🍜 **Food**: Try local street food and markets\n\
🚌 **Transport**: Use public transportation\n\
🎫 **Activities**: Look for free walking tours and museums\n\
📱 **Apps**: Use travel apps for deals and discounts\n\n\
Would you like specific budget recommendations for a particular destination?",
    ),
    (
        r"weather|climate|best time",
        "Weather can make or break a trip! Here's what to consider:\n\n\
☀️ **Research seasonal patterns** for your destination\n\
🌡️ **Pack accordingly** - layers are your friend\n\
🌧️ **Check forecasts** before departure\n\
❄️ **Consider off-season travel** for better prices\n\n\
Which destination are you planning to visit? I can give you specific weather insights!",
    ),
    (
        r"itinerary|itineraries|plan|planning|days",
        "I can help plan an itinerary! Tell me: destination, number of days, and your travel style \
(culture, food, nature, nightlife). I'll suggest a day-by-day plan.",
    ),
    (
        r"visas?|passports?|entry",
        "Visa requirements vary by nationality and destination. Check your destination country's \
official immigration website or IATA Travel Centre. Tell me your nationality and destination, \
and I'll point you to the right resource.",
    ),
    (
        r"safety|safe|scams?",
        "General safety tips: keep valuables minimal, use registered taxis, avoid poorly lit areas \
late at night, and keep digital copies of documents. For destination-specific advice, tell me \
where you're going.",
    ),
    (
        r"food|restaurants?|cafes?|eat",
        "I'd love to recommend food spots! Let me know your destination and cuisine preference \
(local, vegetarian, street food, cafes, fine dining).",
    ),
];

/// Replies for messages that match no topic.
pub const DEFAULT_REPLIES: &[&str] = &[
    "I can help with itineraries, tips, and destination ideas. Tell me your destination and how many days you have.",
    "What destination are you considering? I can suggest must-see spots, local food, and the best time to visit.",
    "Share your travel style (adventure, culture, food, chill), and I'll tailor recommendations.",
    "Ask about visas, budgets, packing, or safety—happy to help you plan a smooth trip!",
];

struct Topic {
    pattern: Regex,
    reply: &'static str,
}

/// A network-free [`LlmGateway`] with canned travel answers.
pub struct ScriptedGateway {
    topics: Vec<Topic>,
    rng: Mutex<StdRng>,
}

impl ScriptedGateway {
    /// Create a gateway drawing default replies from `rng`.
    pub fn new(rng: StdRng) -> Self {
        let topics = TOPICS
            .iter()
            .map(|(keywords, reply)| Topic {
                pattern: Regex::new(&format!(r"(?i)\b(?:{})\b", keywords))
                    .expect("Invalid topic regex"),
                reply: *reply,
            })
            .collect();

        Self {
            topics,
            rng: Mutex::new(rng),
        }
    }

    /// Create a gateway with a fixed seed, for reproducible default replies.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// The canned reply for `message`.
    pub fn reply_to(&self, message: &str) -> String {
        if let Some(topic) = self.topics.iter().find(|t| t.pattern.is_match(message)) {
            return topic.reply.to_string();
        }

        let reply = match self.rng.lock() {
            Ok(mut rng) => DEFAULT_REPLIES.choose(&mut *rng).copied(),
            // A poisoned rng is still a usable rng
            Err(poisoned) => DEFAULT_REPLIES.choose(&mut *poisoned.into_inner()).copied(),
        };
        reply.unwrap_or(DEFAULT_REPLIES[0]).to_string()
    }
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn complete(
        &self,
        _model: &str,
        messages: &[LlmMessage],
        _config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or("");

        debug!(length = last_user.len(), "Scripted reply");
        Ok(LlmGatewayResponse::text(self.reply_to(last_user)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_help_takes_priority() {
        let gateway = ScriptedGateway::seeded(1);
        let reply = gateway.reply_to("Hi! How do I add place markers in Paris?");
        assert!(reply.starts_with("To add a place"));
    }

    #[test]
    fn test_destination_topics() {
        let gateway = ScriptedGateway::seeded(1);
        assert!(gateway.reply_to("Tell me about PARIS").starts_with("Paris, the City of Light"));
        assert!(gateway.reply_to("tokyo food").starts_with("Tokyo is an incredible"));
        assert!(gateway.reply_to("Is Manali nice?").starts_with("Manali is a beautiful"));
    }

    #[test]
    fn test_keywords_match_whole_words_only() {
        let gateway = ScriptedGateway::seeded(7);
        // "this" contains "hi" and "spinach" contains "pin", neither is a keyword hit
        let reply = gateway.reply_to("this spinach");
        assert!(DEFAULT_REPLIES.contains(&reply.as_str()));
    }

    #[test]
    fn test_default_reply_is_reproducible_with_seed() {
        let a = ScriptedGateway::seeded(42);
        let b = ScriptedGateway::seeded(42);

        let from_a: Vec<String> = (0..5).map(|_| a.reply_to("xyz")).collect();
        let from_b: Vec<String> = (0..5).map(|_| b.reply_to("xyz")).collect();

        assert_eq!(from_a, from_b);
        assert!(from_a.iter().all(|r| DEFAULT_REPLIES.contains(&r.as_str())));
    }

    #[tokio::test]
    async fn test_complete_answers_latest_user_message() {
        let gateway = ScriptedGateway::seeded(3);
        let messages = vec![
            LlmMessage::system("persona"),
            LlmMessage::user("Paris"),
            LlmMessage::assistant("Paris, the City of Light!"),
            LlmMessage::user("Any visa rules?"),
        ];

        let response = gateway.complete("scripted", &messages, &CompletionConfig::default()).await;

        let content = response.unwrap().content.unwrap();
        assert!(content.starts_with("Visa requirements vary"));
    }
}
