//! Fixed WanderBot texts: persona, greeting and the canned fallbacks.

/// Persona and scope sent as the first message of every provider request.
pub const SYSTEM_PROMPT: &str = "You are WanderBot, an expert travel companion and advisor. \
You provide detailed, accurate travel information including:\n\
- Destination recommendations with specific places, activities, and hidden gems\n\
- Practical travel tips (visas, budgets, safety, best times to visit)\n\
- Cultural insights and local customs\n\
- Food and restaurant recommendations\n\
- Itinerary planning with day-by-day suggestions\n\
- App-specific help for adding places to travel logs\n\n\
Be conversational, enthusiastic, and concise. Use emojis sparingly for visual appeal. \
When users ask complex questions, provide comprehensive answers with multiple perspectives. \
Format longer responses with clear sections and bullet points for readability.";

/// One-time session greeting, appended when a session opens with no history.
pub const GREETING: &str = "Hello! I'm WanderBot, your travel companion. Ask me about \
destinations, itineraries, budgets, or app help (like adding places to your log). \
Where are you headed?";

/// Returned for every message when no provider credential is configured.
pub const OFFLINE_GUIDANCE: &str = "I'm running in demo mode. Add an OpenRouter API key to \
enable real AI responses.\n\n\
Meanwhile, here are some helpful tips:\n\
• Tell me a destination and your trip length for a quick itinerary.\n\
• Ask for budget tips, best time to visit, or food recommendations.\n\
• App help: Click 'Add Place', then click the map to autofill name & coordinates; add notes and save.";

/// Returned when every configured provider failed.
pub const CONNECTIVITY_FALLBACK: &str = "I had trouble connecting to the AI service. \
Please try again shortly.\n\n\
Quick help:\n\
• Add a place: Click 'Add Place' → click the map → edit details in the sidebar → Add to Log.\n\
• Share a destination + number of days for a mini itinerary.";

/// Returned when a provider answered but the reply had no text.
pub const EMPTY_REPLY_FALLBACK: &str =
    "I couldn't generate a response right now. Please try again.";
